use glam::DVec2;
use iced::Size;

use crate::task::{AXIS_MAX, AXIS_MIN};

const AXIS_SPAN: f64 = AXIS_MAX - AXIS_MIN;

/// Space reserved around the plot area for ticks and labels, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 14.0,
            right: 18.0,
            bottom: 30.0,
            left: 96.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Affine mapping between task space (urgency, importance) and canvas pixels.
///
/// Urgency grows to the right and importance grows upwards, so importance 0 sits on the
/// bottom edge of the plot area. Nothing is clamped here.
pub struct CoordinateMapper {
    /// Top-left corner of the plot area (pixels)
    origin: DVec2,
    /// Width and height of the plot area (pixels)
    extent: DVec2,
}

impl CoordinateMapper {
    /// Build a mapper for an explicit plot rectangle.
    ///
    /// Returns `None` when the rectangle has no area.
    pub fn new(origin: DVec2, extent: DVec2) -> Option<Self> {
        (extent.x > 0.0 && extent.y > 0.0 && extent.is_finite() && origin.is_finite())
            .then_some(Self { origin, extent })
    }

    /// Build a mapper for a canvas of the given size, leaving `margins` around the plot area.
    pub fn from_canvas(size: Size, margins: Margins) -> Option<Self> {
        let origin = DVec2::new(margins.left as f64, margins.top as f64);
        let extent = DVec2::new(
            (size.width - margins.left - margins.right) as f64,
            (size.height - margins.top - margins.bottom) as f64,
        );
        Self::new(origin, extent)
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn extent(&self) -> DVec2 {
        self.extent
    }

    fn bottom(&self) -> f64 {
        self.origin.y + self.extent.y
    }

    pub fn urgency_to_x(&self, urgency: f64) -> f64 {
        self.origin.x + ((urgency - AXIS_MIN) / AXIS_SPAN) * self.extent.x
    }

    pub fn importance_to_y(&self, importance: f64) -> f64 {
        self.bottom() - ((importance - AXIS_MIN) / AXIS_SPAN) * self.extent.y
    }

    pub fn x_to_urgency(&self, x: f64) -> f64 {
        AXIS_MIN + ((x - self.origin.x) / self.extent.x) * AXIS_SPAN
    }

    pub fn y_to_importance(&self, y: f64) -> f64 {
        AXIS_MIN + ((self.bottom() - y) / self.extent.y) * AXIS_SPAN
    }

    /// Convert task coordinates `(urgency, importance)` to a canvas pixel.
    pub fn data_to_screen(&self, data: DVec2) -> DVec2 {
        DVec2::new(self.urgency_to_x(data.x), self.importance_to_y(data.y))
    }

    /// Convert a canvas pixel to task coordinates `(urgency, importance)`.
    pub fn screen_to_data(&self, screen: DVec2) -> DVec2 {
        DVec2::new(self.x_to_urgency(screen.x), self.y_to_importance(screen.y))
    }

    /// Whether a canvas pixel lies inside the plot area.
    pub fn contains(&self, screen: DVec2) -> bool {
        let max = self.origin + self.extent;
        screen.x >= self.origin.x && screen.y >= self.origin.y && screen.x <= max.x && screen.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(DVec2::new(40.0, 20.0), DVec2::new(400.0, 300.0)).unwrap()
    }

    #[test]
    fn corners_map_to_plot_edges() {
        let m = mapper();
        assert_eq!(m.data_to_screen(DVec2::new(0.0, 0.0)), DVec2::new(40.0, 320.0));
        assert_eq!(m.data_to_screen(DVec2::new(10.0, 10.0)), DVec2::new(440.0, 20.0));
        assert_eq!(m.data_to_screen(DVec2::new(5.0, 5.0)), DVec2::new(240.0, 170.0));
    }

    #[test]
    fn round_trip_is_identity() {
        let m = CoordinateMapper::new(DVec2::new(13.7, 9.1), DVec2::new(613.3, 287.9)).unwrap();
        for i in 0..=1000 {
            let v = i as f64 / 100.0;
            let data = DVec2::new(v, 10.0 - v);
            let back = m.screen_to_data(m.data_to_screen(data));
            assert!((back - data).abs().max_element() < 1e-9, "{data} -> {back}");
        }
    }

    #[test]
    fn inverse_is_unclamped() {
        let m = mapper();
        let data = m.screen_to_data(DVec2::new(0.0, 400.0));
        assert!(data.x < 0.0);
        assert!(data.y < 0.0);
    }

    #[test]
    fn degenerate_canvas_has_no_mapper() {
        assert!(CoordinateMapper::from_canvas(Size::new(50.0, 400.0), Margins::default()).is_none());
        assert!(CoordinateMapper::from_canvas(Size::new(0.0, 0.0), Margins::default()).is_none());
        assert!(CoordinateMapper::from_canvas(Size::new(800.0, 600.0), Margins::default()).is_some());
    }

    #[test]
    fn contains_plot_area_only() {
        let m = mapper();
        assert!(m.contains(DVec2::new(40.0, 20.0)));
        assert!(m.contains(DVec2::new(440.0, 320.0)));
        assert!(!m.contains(DVec2::new(39.0, 100.0)));
    }
}
