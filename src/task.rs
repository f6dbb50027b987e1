use iced::Color;
use serde::{Deserialize, Serialize};

use crate::icon::IconRef;

/// Lower bound of both task axes.
pub const AXIS_MIN: f64 = 0.0;
/// Upper bound of both task axes.
pub const AXIS_MAX: f64 = 10.0;

/// Marker radius (logical pixels) of a task with zero importance.
pub const BASE_RADIUS: f64 = 8.0;
/// Extra marker radius per unit of importance.
pub const RADIUS_PER_IMPORTANCE: f64 = 2.0;

/// Title given to freshly added tasks.
pub const NEW_TASK_TITLE: &str = "New task";

const URGENCY_LABELS: [&str; 11] = [
    "Lowest",
    "Very low",
    "Fairly low",
    "Low",
    "Moderate",
    "Elevated",
    "High",
    "Very high",
    "Extreme",
    "Urgent",
    "Most urgent",
];

const IMPORTANCE_LABELS: [&str; 11] = [
    "Trivial",
    "Very minor",
    "Fairly minor",
    "Minor",
    "Moderate",
    "Notable",
    "Important",
    "Very important",
    "Extremely important",
    "Key",
    "Most critical",
];

/// A single planned task.
///
/// Tasks have no identifier: their position in the owning list is their identity.
/// Deserialized tasks go through [`Task::new`], so stored values are clamped too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTask")]
pub struct Task {
    pub title: String,
    pub urgency: f64,
    pub importance: f64,
    pub icon: IconRef,
}

/// A task as it appears on disk. A missing or `null` icon means the default shape.
#[derive(Deserialize)]
struct StoredTask {
    title: String,
    urgency: f64,
    importance: f64,
    #[serde(default)]
    icon: Option<IconRef>,
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Self {
        Task::new(
            stored.title,
            stored.urgency,
            stored.importance,
            stored.icon.unwrap_or_default(),
        )
    }
}

impl Task {
    /// Create a task, clamping both attributes into the axis range.
    pub fn new(title: impl Into<String>, urgency: f64, importance: f64, icon: IconRef) -> Self {
        Self {
            title: title.into(),
            urgency: clamp_axis(urgency),
            importance: clamp_axis(importance),
            icon,
        }
    }

    /// The task appended by the "add task" action.
    pub fn placeholder() -> Self {
        Self::new(NEW_TASK_TITLE, 5.0, 5.0, IconRef::default())
    }

    /// Marker radius of this task on the chart.
    pub fn radius(&self) -> f64 {
        marker_radius(self.importance)
    }

    /// Fill color of this task on the chart.
    pub fn color(&self) -> Color {
        urgency_color(self.urgency)
    }

    pub fn urgency_label(&self) -> String {
        urgency_label(self.urgency)
    }

    pub fn importance_label(&self) -> String {
        importance_label(self.importance)
    }
}

/// Clamp a value into `[AXIS_MIN, AXIS_MAX]`. NaN collapses to the lower bound.
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        AXIS_MIN
    } else {
        value.clamp(AXIS_MIN, AXIS_MAX)
    }
}

/// Radius grows linearly with importance.
pub fn marker_radius(importance: f64) -> f64 {
    BASE_RADIUS + importance * RADIUS_PER_IMPORTANCE
}

/// Stepped palette keyed on urgency. Alpha is applied at draw time.
pub fn urgency_color(urgency: f64) -> Color {
    let (r, g, b) = if urgency >= 9.0 {
        (255, 0, 102)
    } else if urgency >= 8.0 {
        (255, 87, 34)
    } else if urgency >= 7.0 {
        (255, 193, 7)
    } else if urgency >= 6.0 {
        (76, 175, 80)
    } else if urgency >= 5.0 {
        (0, 188, 212)
    } else if urgency >= 4.0 {
        (33, 150, 243)
    } else if urgency >= 3.0 {
        (156, 39, 176)
    } else if urgency >= 2.0 {
        (121, 85, 72)
    } else {
        (158, 158, 158)
    };
    Color::from_rgb8(r, g, b)
}

/// The urgency bands of [`urgency_color`], highest first, for legends.
pub fn urgency_bands() -> [(f64, &'static str); 9] {
    [
        (9.0, "9 - 10"),
        (8.0, "8 - 9"),
        (7.0, "7 - 8"),
        (6.0, "6 - 7"),
        (5.0, "5 - 6"),
        (4.0, "4 - 5"),
        (3.0, "3 - 4"),
        (2.0, "2 - 3"),
        (0.0, "0 - 2"),
    ]
}

pub fn urgency_label(value: f64) -> String {
    level_label(&URGENCY_LABELS, value)
}

pub fn importance_label(value: f64) -> String {
    level_label(&IMPORTANCE_LABELS, value)
}

/// Label of the integer level nearest to `value`, or the number itself when
/// it falls outside the scale.
fn level_label(labels: &[&str; 11], value: f64) -> String {
    let rounded = value.round();
    if rounded >= 0.0 && rounded <= 10.0 {
        labels[rounded as usize].to_string()
    } else {
        format!("{value}")
    }
}
