//! Painted positions of the chart's points.
use glam::DVec2;
use iced::Size;

use crate::{
    Task,
    mapper::{CoordinateMapper, Margins},
};

/// Read-only view of where the renderer last painted each task.
///
/// Interaction code queries this instead of re-deriving positions, so hit-testing always
/// agrees with what is on screen.
pub trait RenderedPoints {
    /// Pixel center of the task at `index`, if it has been painted.
    fn center(&self, index: usize) -> Option<DVec2>;
}

/// Positions of every task for one canvas size and one task revision.
#[derive(Debug, Clone)]
pub struct ChartLayout {
    mapper: Option<CoordinateMapper>,
    centers: Vec<DVec2>,
    size: Size,
    revision: Option<u64>,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            mapper: None,
            centers: Vec::new(),
            size: Size::ZERO,
            revision: None,
        }
    }
}

impl ChartLayout {
    /// Lay out `tasks` on a canvas of `size`.
    ///
    /// A canvas too small to hold a plot area yields a layout without positions.
    pub fn compute(tasks: &[Task], size: Size, margins: Margins, revision: u64) -> Self {
        let mapper = CoordinateMapper::from_canvas(size, margins);
        let centers = mapper
            .map(|m| {
                tasks
                    .iter()
                    .map(|t| m.data_to_screen(DVec2::new(t.urgency, t.importance)))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            mapper,
            centers,
            size,
            revision: Some(revision),
        }
    }

    /// Whether this layout was computed for the given canvas size and revision.
    pub fn is_current(&self, size: Size, revision: u64) -> bool {
        self.size == size && self.revision == Some(revision)
    }

    pub fn mapper(&self) -> Option<&CoordinateMapper> {
        self.mapper.as_ref()
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

impl RenderedPoints for ChartLayout {
    fn center(&self, index: usize) -> Option<DVec2> {
        self.centers.get(index).copied()
    }
}

impl RenderedPoints for [Option<DVec2>] {
    fn center(&self, index: usize) -> Option<DVec2> {
        self.get(index).copied().flatten()
    }
}

impl RenderedPoints for Vec<Option<DVec2>> {
    fn center(&self, index: usize) -> Option<DVec2> {
        self.as_slice().center(index)
    }
}
