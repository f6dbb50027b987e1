//! Task table, inline editors and the planning hints panel.
use std::{fmt, path::Path};

use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input};
use iced::{Color, Element, Length};

use crate::{
    IconRef, Task, advice,
    icon::{BuiltinShape, IconError},
    planner::{Axis, Planner},
};

#[derive(Debug, Clone)]
pub enum TableMessage {
    Select(usize),
    Delete(usize),
    EditTitle(usize, String),
    EditAxis(usize, Axis, String),
    Commit,
    OpenIconEditor(usize),
    IconSourceChanged(IconSourceKind),
    IconShapeChanged(BuiltinShape),
    IconInputChanged(String),
    ApplyIcon,
    CancelIcon,
}

/// Raw text of the numeric fields of the row being edited.
///
/// The task only changes when the text parses, so half-typed numbers survive here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDraft {
    pub urgency: String,
    pub importance: String,
}

impl RowDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            urgency: format_level(task.urgency),
            importance: format_level(task.importance),
        }
    }

    pub fn set(&mut self, axis: Axis, raw: String) {
        match axis {
            Axis::Urgency => self.urgency = raw,
            Axis::Importance => self.importance = raw,
        }
    }
}

fn format_level(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Where a new icon comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSourceKind {
    #[default]
    Builtin,
    ImageFile,
    ImageUrl,
    SvgMarkup,
}

impl IconSourceKind {
    pub const ALL: [IconSourceKind; 4] = [
        IconSourceKind::Builtin,
        IconSourceKind::ImageFile,
        IconSourceKind::ImageUrl,
        IconSourceKind::SvgMarkup,
    ];
}

impl fmt::Display for IconSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IconSourceKind::Builtin => "Built-in shape",
            IconSourceKind::ImageFile => "Image file",
            IconSourceKind::ImageUrl => "Image URL",
            IconSourceKind::SvgMarkup => "SVG markup",
        })
    }
}

/// State of the icon editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconDraft {
    pub source: IconSourceKind,
    pub shape: BuiltinShape,
    pub input: String,
    pub error: Option<String>,
}

impl IconDraft {
    /// Start from the task's current icon.
    pub fn from_icon(icon: &IconRef) -> Self {
        match icon {
            IconRef::Builtin(shape) => Self {
                shape: *shape,
                ..Self::default()
            },
            IconRef::Remote(url) => Self {
                source: IconSourceKind::ImageUrl,
                input: url.clone(),
                ..Self::default()
            },
            IconRef::InlineVector(_) => Self {
                source: IconSourceKind::SvgMarkup,
                input: icon.svg_markup().unwrap_or_default(),
                ..Self::default()
            },
            IconRef::Embedded { .. } => Self {
                source: IconSourceKind::ImageFile,
                ..Self::default()
            },
        }
    }

    /// Build the icon the draft describes. Image files are read and embedded.
    pub fn resolve(&self) -> Result<IconRef, IconError> {
        let input = self.input.trim();
        if self.source != IconSourceKind::Builtin && input.is_empty() {
            return Err(IconError::EmptySource);
        }
        match self.source {
            IconSourceKind::Builtin => Ok(IconRef::Builtin(self.shape)),
            IconSourceKind::ImageFile => IconRef::from_image_file(Path::new(input)),
            IconSourceKind::ImageUrl => Ok(IconRef::Remote(input.to_string())),
            IconSourceKind::SvgMarkup => Ok(IconRef::from_svg_markup(input)),
        }
    }
}

/// The task table. The row open in the inline editor shows input fields.
pub fn task_table<'a>(planner: &'a Planner, draft: &'a RowDraft) -> Element<'a, TableMessage> {
    let header = row![
        text("Title").width(Length::FillPortion(4)),
        text("Urgency").width(Length::FillPortion(2)),
        text("Importance").width(Length::FillPortion(2)),
        text("Icon").width(Length::FillPortion(2)),
        text("").width(Length::FillPortion(3)),
    ]
    .spacing(8);

    let mut rows = column![header].spacing(6);
    for (index, task) in planner.tasks().iter().enumerate() {
        let row = if planner.editing() == Some(index) {
            editing_row(index, task, draft)
        } else {
            display_row(index, task)
        };
        rows = rows.push(row);
    }
    scrollable(rows).height(Length::Fill).into()
}

fn display_row(index: usize, task: &Task) -> Element<'_, TableMessage> {
    row![
        text(&task.title).width(Length::FillPortion(4)),
        text(task.urgency_label()).width(Length::FillPortion(2)),
        text(task.importance_label()).width(Length::FillPortion(2)),
        text(task.icon.kind_description()).width(Length::FillPortion(2)),
        row![
            button(text("Edit").size(12)).on_press(TableMessage::Select(index)),
            button(text("Icon").size(12)).on_press(TableMessage::OpenIconEditor(index)),
            button(text("Delete").size(12))
                .style(button::danger)
                .on_press(TableMessage::Delete(index)),
        ]
        .spacing(4)
        .width(Length::FillPortion(3)),
    ]
    .spacing(8)
    .into()
}

fn editing_row<'a>(index: usize, task: &'a Task, draft: &'a RowDraft) -> Element<'a, TableMessage> {
    row![
        text_input("Title", &task.title)
            .on_input(move |v| TableMessage::EditTitle(index, v))
            .on_submit(TableMessage::Commit)
            .width(Length::FillPortion(4)),
        text_input("0-10", &draft.urgency)
            .on_input(move |v| TableMessage::EditAxis(index, Axis::Urgency, v))
            .on_submit(TableMessage::Commit)
            .width(Length::FillPortion(2)),
        text_input("0-10", &draft.importance)
            .on_input(move |v| TableMessage::EditAxis(index, Axis::Importance, v))
            .on_submit(TableMessage::Commit)
            .width(Length::FillPortion(2)),
        text(task.icon.kind_description()).width(Length::FillPortion(2)),
        row![
            button(text("Done").size(12)).on_press(TableMessage::Commit),
            button(text("Icon").size(12)).on_press(TableMessage::OpenIconEditor(index)),
        ]
        .spacing(4)
        .width(Length::FillPortion(3)),
    ]
    .spacing(8)
    .into()
}

/// Icon editor for the task at `index`.
pub fn icon_editor<'a>(index: usize, task: &'a Task, draft: &'a IconDraft) -> Element<'a, TableMessage> {
    let source = pick_list(
        IconSourceKind::ALL,
        Some(draft.source),
        TableMessage::IconSourceChanged,
    );

    let input: Element<'a, TableMessage> = match draft.source {
        IconSourceKind::Builtin => pick_list(
            BuiltinShape::ALL,
            Some(draft.shape),
            TableMessage::IconShapeChanged,
        )
        .into(),
        IconSourceKind::ImageFile => text_input("/path/to/image.png", &draft.input)
            .on_input(TableMessage::IconInputChanged)
            .on_submit(TableMessage::ApplyIcon)
            .into(),
        IconSourceKind::ImageUrl => text_input("https://example.com/icon.png", &draft.input)
            .on_input(TableMessage::IconInputChanged)
            .on_submit(TableMessage::ApplyIcon)
            .into(),
        IconSourceKind::SvgMarkup => text_input("<circle cx='8' cy='8' r='6'/>", &draft.input)
            .on_input(TableMessage::IconInputChanged)
            .on_submit(TableMessage::ApplyIcon)
            .into(),
    };

    let mut content = column![
        text(format!("Icon for \"{}\" (#{})", task.title, index + 1)).size(14),
        row![source, input].spacing(8),
        row![
            button(text("Apply").size(12)).on_press(TableMessage::ApplyIcon),
            button(text("Cancel").size(12))
                .style(button::secondary)
                .on_press(TableMessage::CancelIcon),
        ]
        .spacing(8),
    ]
    .spacing(6);
    if let Some(error) = &draft.error {
        content = content.push(text(error).size(12).color(Color::from_rgb8(0xd3, 0x2f, 0x2f)));
    }
    container(content)
        .padding(8)
        .style(container::bordered_box)
        .into()
}

/// Per-task planning hints.
pub fn hint_panel<M: 'static>(tasks: &[Task]) -> Element<'_, M> {
    if tasks.is_empty() {
        return text("No tasks yet. Press \"Add task\" to start planning.").into();
    }
    let mut list = column![text("Plan").size(16)].spacing(10);
    for task in tasks {
        let title_size = 16.0 + (task.importance * 2.0).round() as f32;
        list = list.push(column![
            row![
                text(&task.title).size(title_size).color(task.color()),
                text(advice::summary(task))
                    .size(13)
                    .color(Color::from_rgb8(0x66, 0x66, 0x66)),
            ]
            .spacing(8),
            text(advice::plan_hint(task).text()).size(14),
        ]);
    }
    list.into()
}
