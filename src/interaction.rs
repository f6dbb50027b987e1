//! Pointer interaction with the chart: selection, icon activation and drag-to-edit.
use glam::DVec2;
use iced::time::Instant;

use crate::{
    ChartControls, ChartEvent, PointerId, PointerInput, Task,
    layout::RenderedPoints,
    mapper::CoordinateMapper,
    picking,
    task::clamp_axis,
};

/// Drag session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A task marker is held by `pointer` and follows it.
    Dragging { index: usize, pointer: PointerId },
}

/// Turns pointer inputs into [`ChartEvent`]s.
///
/// Hit-testing queries the renderer's painted positions. Drag updates invert the pointer
/// position with the controller's own mapper, which must be refreshed whenever the plot
/// area changes.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: DragState,
    controls: ChartControls,
    mapper: Option<CoordinateMapper>,
}

impl InteractionController {
    pub fn new(controls: ChartControls) -> Self {
        Self {
            state: DragState::Idle,
            controls,
            mapper: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn controls(&self) -> ChartControls {
        self.controls
    }

    /// Replace the controls. Turning quick edit off ends any drag session.
    pub fn set_controls(&mut self, controls: ChartControls) {
        if !controls.quick_edit {
            self.state = DragState::Idle;
        }
        self.controls = controls;
    }

    /// Refresh the inverse mapping used for drag updates.
    pub fn set_mapper(&mut self, mapper: Option<CoordinateMapper>) {
        self.mapper = mapper;
    }

    /// Feed one pointer input through the state machine.
    pub fn handle<P>(&mut self, input: PointerInput, tasks: &[Task], points: &P) -> Option<ChartEvent>
    where
        P: RenderedPoints + ?Sized,
    {
        match input {
            PointerInput::Down { pointer, position } => {
                if self.state == DragState::Idle
                    && self.controls.quick_edit
                    && let Some(index) = picking::hit_test(points, tasks, position)
                {
                    tracing::debug!(index, ?pointer, "drag session started");
                    self.state = DragState::Dragging { index, pointer };
                }
                None
            }
            PointerInput::Move { pointer, position } => {
                let DragState::Dragging { index, pointer: owner } = self.state else {
                    return None;
                };
                if pointer != owner {
                    return None;
                }
                if index >= tasks.len() {
                    // The task went away under the pointer.
                    self.state = DragState::Idle;
                    return None;
                }
                let data = self.mapper?.screen_to_data(position);
                Some(ChartEvent::DragUpdate {
                    index,
                    urgency: clamp_axis(data.x),
                    importance: clamp_axis(data.y),
                })
            }
            PointerInput::Up { pointer } => {
                if let DragState::Dragging { index, pointer: owner } = self.state
                    && pointer == owner
                {
                    tracing::debug!(index, "drag session ended");
                    self.state = DragState::Idle;
                }
                None
            }
            PointerInput::Click { position } => {
                if !self.controls.click_to_select {
                    return None;
                }
                picking::hit_test(points, tasks, position).map(ChartEvent::Select)
            }
            PointerInput::DoubleClick { position } => {
                if !self.controls.double_click_to_activate {
                    return None;
                }
                picking::hit_test(points, tasks, position).map(ChartEvent::ActivateSecondary)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    pointer: PointerId,
    origin: DVec2,
    travelled: bool,
}

/// Recognizes clicks and double clicks from raw press/move/release events.
///
/// A press that travels further than the click slop is a drag and never becomes a click.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    press: Option<Press>,
    last_click: Option<(Instant, DVec2)>,
}

impl GestureRecognizer {
    /// Record a press. Ignored while another pointer is held.
    pub fn press(&mut self, pointer: PointerId, position: DVec2) {
        if self.press.is_none() {
            self.press = Some(Press {
                pointer,
                origin: position,
                travelled: false,
            });
        }
    }

    /// Record pointer movement.
    pub fn track(&mut self, pointer: PointerId, position: DVec2, slop_px: f64) {
        if let Some(press) = &mut self.press
            && press.pointer == pointer
            && press.origin.distance(position) > slop_px
        {
            press.travelled = true;
        }
    }

    /// Record a release and return the click it completes, if any.
    ///
    /// A click is a double click only when it lands within the click slop of the previous one.
    pub fn release(
        &mut self,
        pointer: PointerId,
        now: Instant,
        controls: &ChartControls,
    ) -> Option<PointerInput> {
        let press = self.press.filter(|p| p.pointer == pointer)?;
        self.press = None;
        if press.travelled {
            return None;
        }

        let double = self.last_click.is_some_and(|(at, origin)| {
            now.duration_since(at) < controls.double_click_window
                && origin.distance(press.origin) <= controls.click_slop_px
        });
        if double {
            self.last_click = None;
            Some(PointerInput::DoubleClick {
                position: press.origin,
            })
        } else {
            self.last_click = Some((now, press.origin));
            Some(PointerInput::Click {
                position: press.origin,
            })
        }
    }

    /// Forget any held press, e.g. when the pointer leaves the window.
    pub fn cancel(&mut self) {
        self.press = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::IconRef;

    const FINGER_A: PointerId = PointerId::Finger(1);
    const FINGER_B: PointerId = PointerId::Finger(2);

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(DVec2::new(0.0, 0.0), DVec2::new(100.0, 100.0)).unwrap()
    }

    fn setup(quick_edit: bool) -> (InteractionController, Vec<Task>, Vec<Option<DVec2>>) {
        let mut controller =
            InteractionController::new(ChartControls::default().with_quick_edit(quick_edit));
        controller.set_mapper(Some(mapper()));
        let tasks = vec![
            Task::new("a", 2.0, 8.0, IconRef::default()),
            Task::new("b", 8.0, 2.0, IconRef::default()),
        ];
        let m = mapper();
        let points = tasks
            .iter()
            .map(|t| Some(m.data_to_screen(DVec2::new(t.urgency, t.importance))))
            .collect();
        (controller, tasks, points)
    }

    fn down(pointer: PointerId, x: f64, y: f64) -> PointerInput {
        PointerInput::Down {
            pointer,
            position: DVec2::new(x, y),
        }
    }

    fn mv(pointer: PointerId, x: f64, y: f64) -> PointerInput {
        PointerInput::Move {
            pointer,
            position: DVec2::new(x, y),
        }
    }

    #[test]
    fn press_on_marker_starts_drag() {
        let (mut c, tasks, points) = setup(true);
        assert_eq!(c.handle(down(PointerId::Mouse, 80.0, 80.0), &tasks, &points), None);
        assert_eq!(
            c.state(),
            DragState::Dragging {
                index: 1,
                pointer: PointerId::Mouse
            }
        );
    }

    #[test]
    fn press_on_empty_space_stays_idle() {
        let (mut c, tasks, points) = setup(true);
        c.handle(down(PointerId::Mouse, 50.0, 50.0), &tasks, &points);
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.handle(mv(PointerId::Mouse, 60.0, 60.0), &tasks, &points), None);
    }

    #[test]
    fn moves_emit_clamped_updates() {
        let (mut c, tasks, points) = setup(true);
        c.handle(down(PointerId::Mouse, 20.0, 20.0), &tasks, &points);
        assert_eq!(
            c.handle(mv(PointerId::Mouse, 25.0, 50.0), &tasks, &points),
            Some(ChartEvent::DragUpdate {
                index: 0,
                urgency: 2.5,
                importance: 5.0
            })
        );
        assert_eq!(
            c.handle(mv(PointerId::Mouse, -50.0, 250.0), &tasks, &points),
            Some(ChartEvent::DragUpdate {
                index: 0,
                urgency: 0.0,
                importance: 0.0
            })
        );
        assert_eq!(
            c.handle(mv(PointerId::Mouse, 500.0, -1.0), &tasks, &points),
            Some(ChartEvent::DragUpdate {
                index: 0,
                urgency: 10.0,
                importance: 10.0
            })
        );
    }

    #[test]
    fn release_ends_session() {
        let (mut c, tasks, points) = setup(true);
        c.handle(down(PointerId::Mouse, 20.0, 20.0), &tasks, &points);
        assert_eq!(
            c.handle(PointerInput::Up { pointer: PointerId::Mouse }, &tasks, &points),
            None
        );
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.handle(mv(PointerId::Mouse, 30.0, 30.0), &tasks, &points), None);
    }

    #[test]
    fn second_touch_does_not_steal_session() {
        let (mut c, tasks, points) = setup(true);
        c.handle(down(FINGER_A, 20.0, 20.0), &tasks, &points);
        c.handle(down(FINGER_B, 80.0, 80.0), &tasks, &points);
        assert_eq!(
            c.state(),
            DragState::Dragging {
                index: 0,
                pointer: FINGER_A
            }
        );
        // Foreign moves and releases are ignored.
        assert_eq!(c.handle(mv(FINGER_B, 90.0, 90.0), &tasks, &points), None);
        c.handle(PointerInput::Up { pointer: FINGER_B }, &tasks, &points);
        assert!(c.is_dragging());
        assert!(matches!(
            c.handle(mv(FINGER_A, 10.0, 10.0), &tasks, &points),
            Some(ChartEvent::DragUpdate { index: 0, .. })
        ));
    }

    #[test]
    fn drag_requires_quick_edit() {
        let (mut c, tasks, points) = setup(false);
        c.handle(down(PointerId::Mouse, 20.0, 20.0), &tasks, &points);
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(
            c.handle(
                PointerInput::Click {
                    position: DVec2::new(20.0, 20.0)
                },
                &tasks,
                &points
            ),
            Some(ChartEvent::Select(0))
        );
        assert_eq!(
            c.handle(
                PointerInput::DoubleClick {
                    position: DVec2::new(80.0, 80.0)
                },
                &tasks,
                &points
            ),
            Some(ChartEvent::ActivateSecondary(1))
        );
    }

    #[test]
    fn disabling_quick_edit_cancels_drag() {
        let (mut c, tasks, points) = setup(true);
        c.handle(down(PointerId::Mouse, 20.0, 20.0), &tasks, &points);
        c.set_controls(ChartControls::default());
        assert_eq!(c.state(), DragState::Idle);
    }

    #[test]
    fn removed_task_ends_session() {
        let (mut c, mut tasks, points) = setup(true);
        c.handle(down(PointerId::Mouse, 80.0, 80.0), &tasks, &points);
        tasks.truncate(1);
        assert_eq!(c.handle(mv(PointerId::Mouse, 50.0, 50.0), &tasks, &points), None);
        assert_eq!(c.state(), DragState::Idle);
    }

    #[test]
    fn missing_mapper_drops_moves() {
        let (mut c, tasks, points) = setup(true);
        c.handle(down(PointerId::Mouse, 20.0, 20.0), &tasks, &points);
        c.set_mapper(None);
        assert_eq!(c.handle(mv(PointerId::Mouse, 30.0, 30.0), &tasks, &points), None);
        assert!(c.is_dragging());
    }

    #[test]
    fn recognizer_tells_clicks_from_drags() {
        let controls = ChartControls::default();
        let t0 = Instant::now();
        let mut g = GestureRecognizer::default();

        g.press(PointerId::Mouse, DVec2::new(10.0, 10.0));
        g.track(PointerId::Mouse, DVec2::new(12.0, 11.0), 4.0);
        assert_eq!(
            g.release(PointerId::Mouse, t0, &controls),
            Some(PointerInput::Click {
                position: DVec2::new(10.0, 10.0)
            })
        );

        g.press(PointerId::Mouse, DVec2::new(10.0, 10.0));
        assert_eq!(
            g.release(PointerId::Mouse, t0 + Duration::from_millis(200), &controls),
            Some(PointerInput::DoubleClick {
                position: DVec2::new(10.0, 10.0)
            })
        );

        g.press(PointerId::Mouse, DVec2::new(10.0, 10.0));
        g.track(PointerId::Mouse, DVec2::new(40.0, 10.0), 4.0);
        assert_eq!(g.release(PointerId::Mouse, t0 + Duration::from_secs(2), &controls), None);
    }

    #[test]
    fn slow_second_click_is_single() {
        let controls = ChartControls::default();
        let t0 = Instant::now();
        let mut g = GestureRecognizer::default();
        g.press(PointerId::Mouse, DVec2::ZERO);
        g.release(PointerId::Mouse, t0, &controls);
        g.press(PointerId::Mouse, DVec2::ZERO);
        assert!(matches!(
            g.release(PointerId::Mouse, t0 + Duration::from_millis(800), &controls),
            Some(PointerInput::Click { .. })
        ));
    }

    #[test]
    fn release_of_other_pointer_is_ignored() {
        let mut g = GestureRecognizer::default();
        g.press(FINGER_A, DVec2::ZERO);
        g.press(FINGER_B, DVec2::ONE);
        assert_eq!(
            g.release(FINGER_B, Instant::now(), &ChartControls::default()),
            None
        );
        assert!(g.release(FINGER_A, Instant::now(), &ChartControls::default()).is_some());
    }

    #[test]
    fn quick_clicks_on_different_spots_stay_single() {
        let controls = ChartControls::default();
        let t0 = Instant::now();
        let mut g = GestureRecognizer::default();
        g.press(PointerId::Mouse, DVec2::new(20.0, 20.0));
        g.release(PointerId::Mouse, t0, &controls);
        g.press(PointerId::Mouse, DVec2::new(80.0, 80.0));
        assert_eq!(
            g.release(PointerId::Mouse, t0 + Duration::from_millis(100), &controls),
            Some(PointerInput::Click {
                position: DVec2::new(80.0, 80.0)
            })
        );
        g.press(PointerId::Mouse, DVec2::new(81.0, 82.0));
        assert_eq!(
            g.release(PointerId::Mouse, t0 + Duration::from_millis(200), &controls),
            Some(PointerInput::DoubleClick {
                position: DVec2::new(81.0, 82.0)
            })
        );
    }
}
