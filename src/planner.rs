//! UI-independent planner state: the task list and the edits applied to it.
use crate::{
    ChartEvent, IconRef, Task,
    store::{SavedState, clamp_interval},
    task::clamp_axis,
};

/// What a mutation means for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Change {
    /// Nothing changed.
    None,
    /// The list changed; the next autosave picks it up.
    Deferred,
    /// The list changed and should be written out now.
    Persist,
}

impl Change {
    pub fn should_persist(self) -> bool {
        self == Change::Persist
    }
}

/// Which axis an inline numeric edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Urgency,
    Importance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Planner {
    tasks: Vec<Task>,
    auto_save_interval: u64,
    revision: u64,
    editing: Option<usize>,
    icon_editing: Option<usize>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::from_saved(SavedState::default())
    }
}

impl Planner {
    pub fn from_saved(state: SavedState) -> Self {
        Self {
            tasks: state.tasks,
            auto_save_interval: clamp_interval(state.auto_save_interval),
            revision: 0,
            editing: None,
            icon_editing: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Bumped on every mutation of the task list.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn auto_save_interval(&self) -> u64 {
        self.auto_save_interval
    }

    /// Task open in the inline editor.
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Task open in the icon editor.
    pub fn icon_editing(&self) -> Option<usize> {
        self.icon_editing
    }

    pub fn snapshot(&self) -> SavedState {
        SavedState {
            tasks: self.tasks.clone(),
            auto_save_interval: self.auto_save_interval,
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Append a placeholder task and open it for editing.
    pub fn add_task(&mut self) -> Change {
        self.tasks.push(Task::placeholder());
        self.editing = Some(self.tasks.len() - 1);
        self.icon_editing = None;
        self.touch();
        Change::Persist
    }

    pub fn delete_task(&mut self, index: usize) -> Change {
        if index >= self.tasks.len() {
            return Change::None;
        }
        self.tasks.remove(index);
        self.editing = shift_after_removal(self.editing, index);
        self.icon_editing = shift_after_removal(self.icon_editing, index);
        self.touch();
        Change::Persist
    }

    pub fn select(&mut self, index: usize) {
        if index < self.tasks.len() {
            self.editing = Some(index);
        }
    }

    pub fn activate_secondary(&mut self, index: usize) {
        if index < self.tasks.len() {
            self.icon_editing = Some(index);
        }
    }

    pub fn edit_title(&mut self, index: usize, title: String) -> Change {
        let Some(task) = self.tasks.get_mut(index) else {
            return Change::None;
        };
        task.title = title;
        self.touch();
        Change::Deferred
    }

    /// Parse and apply a numeric edit. Unparsable input leaves the value unchanged.
    pub fn edit_axis(&mut self, index: usize, axis: Axis, raw: &str) -> Change {
        let Ok(value) = raw.trim().parse::<f64>() else {
            return Change::None;
        };
        let Some(task) = self.tasks.get_mut(index) else {
            return Change::None;
        };
        let value = clamp_axis(value);
        match axis {
            Axis::Urgency => task.urgency = value,
            Axis::Importance => task.importance = value,
        }
        self.touch();
        Change::Deferred
    }

    /// Close both editors.
    pub fn commit_edit(&mut self) -> Change {
        self.editing = None;
        self.icon_editing = None;
        Change::Persist
    }

    /// Write a drag update. Values are clamped again here.
    pub fn apply_drag(&mut self, index: usize, urgency: f64, importance: f64) -> Change {
        let Some(task) = self.tasks.get_mut(index) else {
            return Change::None;
        };
        task.urgency = clamp_axis(urgency);
        task.importance = clamp_axis(importance);
        self.touch();
        Change::Persist
    }

    /// Replace the whole list, e.g. after an import.
    pub fn replace_all(&mut self, tasks: Vec<Task>) -> Change {
        self.tasks = tasks;
        self.editing = None;
        self.icon_editing = None;
        self.touch();
        Change::Persist
    }

    pub fn set_icon(&mut self, index: usize, icon: IconRef) -> Change {
        let Some(task) = self.tasks.get_mut(index) else {
            return Change::None;
        };
        task.icon = icon;
        self.touch();
        Change::Persist
    }

    pub fn set_auto_save_interval(&mut self, secs: u64) {
        self.auto_save_interval = clamp_interval(secs);
    }

    /// Route an event reported by the chart.
    pub fn apply_chart_event(&mut self, event: ChartEvent) -> Change {
        match event {
            ChartEvent::Select(index) => {
                self.select(index);
                Change::None
            }
            ChartEvent::ActivateSecondary(index) => {
                self.activate_secondary(index);
                Change::None
            }
            ChartEvent::DragUpdate {
                index,
                urgency,
                importance,
            } => self.apply_drag(index, urgency, importance),
        }
    }
}

fn shift_after_removal(open: Option<usize>, removed: usize) -> Option<usize> {
    match open {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::BuiltinShape;

    fn planner(titles: &[&str]) -> Planner {
        Planner::from_saved(SavedState {
            tasks: titles
                .iter()
                .map(|t| Task::new(*t, 3.0, 4.0, IconRef::default()))
                .collect(),
            auto_save_interval: 30,
        })
    }

    #[test]
    fn add_task_appends_placeholder_and_opens_editor() {
        let mut p = planner(&["a"]);
        assert!(p.add_task().should_persist());
        assert_eq!(p.tasks().last(), Some(&Task::placeholder()));
        assert_eq!(p.editing(), Some(1));
        assert_eq!(p.revision(), 1);
    }

    #[test]
    fn delete_shifts_open_editors() {
        let mut p = planner(&["a", "b", "c"]);
        p.select(2);
        p.activate_secondary(0);
        assert!(p.delete_task(0).should_persist());
        assert_eq!(p.editing(), Some(1));
        assert_eq!(p.icon_editing(), None);
        assert_eq!(p.delete_task(7), Change::None);
    }

    #[test]
    fn numeric_edits_parse_and_clamp() {
        let mut p = planner(&["a"]);
        assert_eq!(p.edit_axis(0, Axis::Urgency, "12"), Change::Deferred);
        assert_eq!(p.edit_axis(0, Axis::Importance, " 2.5 "), Change::Deferred);
        assert_eq!(p.edit_axis(0, Axis::Importance, "abc"), Change::None);
        let task = &p.tasks()[0];
        assert_eq!((task.urgency, task.importance), (10.0, 2.5));
    }

    #[test]
    fn drag_updates_are_clamped_and_persisted() {
        let mut p = planner(&["Draft report"]);
        let change = p.apply_chart_event(ChartEvent::DragUpdate {
            index: 0,
            urgency: 12.3,
            importance: -1.0,
        });
        assert_eq!(change, Change::Persist);
        assert_eq!((p.tasks()[0].urgency, p.tasks()[0].importance), (10.0, 0.0));
        assert_eq!(
            p.apply_chart_event(ChartEvent::DragUpdate {
                index: 4,
                urgency: 1.0,
                importance: 1.0
            }),
            Change::None
        );
    }

    #[test]
    fn chart_clicks_open_editors() {
        let mut p = planner(&["a", "b"]);
        assert_eq!(p.apply_chart_event(ChartEvent::Select(1)), Change::None);
        assert_eq!(p.editing(), Some(1));
        let _ = p.apply_chart_event(ChartEvent::ActivateSecondary(0));
        assert_eq!(p.icon_editing(), Some(0));
        assert!(p.commit_edit().should_persist());
        assert_eq!((p.editing(), p.icon_editing()), (None, None));
    }

    #[test]
    fn replace_all_resets_editors() {
        let mut p = planner(&["a"]);
        p.select(0);
        let before = p.revision();
        assert!(p.replace_all(vec![Task::placeholder(), Task::placeholder()]).should_persist());
        assert_eq!(p.tasks().len(), 2);
        assert_eq!(p.editing(), None);
        assert!(p.revision() > before);
    }

    #[test]
    fn set_icon_and_interval() {
        let mut p = planner(&["a"]);
        let star = IconRef::Builtin(BuiltinShape::Star);
        assert!(p.set_icon(0, star.clone()).should_persist());
        assert_eq!(p.tasks()[0].icon, star);
        p.set_auto_save_interval(1);
        assert_eq!(p.auto_save_interval(), 5);
        assert_eq!(p.snapshot().auto_save_interval, 5);
    }
}
