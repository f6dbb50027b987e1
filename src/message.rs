use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Events the chart reports to the application.
pub enum ChartEvent {
    /// A task marker was clicked. Opens the inline editor.
    Select(usize),
    /// A task marker was double-clicked. Opens the icon editor.
    ActivateSecondary(usize),
    /// A dragged task moved. Values are already clamped to the axis range.
    DragUpdate {
        index: usize,
        urgency: f64,
        importance: f64,
    },
}

/// Source of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Finger(u64),
}

/// Discrete pointer inputs consumed by the interaction controller.
///
/// Positions are in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { pointer: PointerId, position: DVec2 },
    Move { pointer: PointerId, position: DVec2 },
    Up { pointer: PointerId },
    Click { position: DVec2 },
    DoubleClick { position: DVec2 },
}
