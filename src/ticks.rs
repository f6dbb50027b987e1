use std::sync::Arc;

use crate::{
    mapper::CoordinateMapper,
    task::{AXIS_MAX, AXIS_MIN, importance_label, urgency_label},
};

/// Visual weight of the grid line drawn at a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickWeight {
    /// Axis bounds and the quadrant split.
    Major,
    Minor,
}

/// A position along an axis where a grid line and tick label is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// The value at this tick in task units.
    pub value: f64,
    pub weight: TickWeight,
}

/// A tick with an assigned screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedTick {
    /// Screen position (x for urgency ticks, y for importance ticks)
    pub screen_pos: f32,
    pub tick: Tick,
    pub label: String,
}

/// A function which formats tick values into strings for display on the axis.
pub type TickFormatter = Arc<dyn Fn(Tick) -> String + Send + Sync>;

/// Value at which the chart splits into quadrants.
pub const QUADRANT_SPLIT: f64 = 5.0;

/// One tick per integer level.
pub fn level_ticks() -> Vec<Tick> {
    let (lo, hi) = (AXIS_MIN as i64, AXIS_MAX as i64);
    (lo..=hi)
        .map(|level| {
            let value = level as f64;
            let weight = if value == AXIS_MIN || value == AXIS_MAX || value == QUADRANT_SPLIT {
                TickWeight::Major
            } else {
                TickWeight::Minor
            };
            Tick { value, weight }
        })
        .collect()
}

pub fn urgency_formatter() -> TickFormatter {
    Arc::new(|tick| urgency_label(tick.value))
}

pub fn importance_formatter() -> TickFormatter {
    Arc::new(|tick| importance_label(tick.value))
}

/// Place urgency ticks along the x axis.
pub fn position_urgency(
    mapper: &CoordinateMapper,
    ticks: &[Tick],
    formatter: &TickFormatter,
) -> Vec<PositionedTick> {
    position(ticks, formatter, |v| mapper.urgency_to_x(v))
}

/// Place importance ticks along the y axis.
pub fn position_importance(
    mapper: &CoordinateMapper,
    ticks: &[Tick],
    formatter: &TickFormatter,
) -> Vec<PositionedTick> {
    position(ticks, formatter, |v| mapper.importance_to_y(v))
}

fn position(
    ticks: &[Tick],
    formatter: &TickFormatter,
    to_screen: impl Fn(f64) -> f64,
) -> Vec<PositionedTick> {
    ticks
        .iter()
        .map(|&tick| PositionedTick {
            screen_pos: to_screen(tick.value) as f32,
            tick,
            label: formatter(tick),
        })
        .collect()
}
