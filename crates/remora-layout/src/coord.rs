//! Seam to the host's coordinate systems.
//!
//! Layout only needs a handful of conversions; cartesian/geo/calendar
//! systems live with the host and implement this trait there.

use crate::geom::{Point, Rect};

pub trait CoordinateSystem {
    /// Whether this is the plain drawing-plane ("view") system. Circular and
    /// force layout only run on view systems; the simple layout maps logical
    /// coordinates through everything else.
    fn is_view(&self) -> bool;

    fn bounding_rect(&self) -> Rect;

    /// Converts a logical coordinate to a drawing-plane point.
    fn data_to_point(&self, data: &[f64]) -> Point;

    /// Converts a drawing-plane point (e.g. a pointer position) back to data
    /// space.
    fn point_to_data(&self, point: Point) -> Point;

    fn zoom(&self) -> f64 {
        1.0
    }

    fn scale_x(&self) -> f64 {
        1.0
    }
}

/// The default view system: a bounding rect with identity conversions.
#[derive(Debug, Clone, Copy)]
pub struct ViewRect {
    pub rect: Rect,
    pub zoom: f64,
}

impl ViewRect {
    pub fn new(rect: Rect) -> Self {
        Self { rect, zoom: 1.0 }
    }
}

impl CoordinateSystem for ViewRect {
    fn is_view(&self) -> bool {
        true
    }

    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn data_to_point(&self, data: &[f64]) -> Point {
        Point::new(
            data.first().copied().unwrap_or(f64::NAN),
            data.get(1).copied().unwrap_or(f64::NAN),
        )
    }

    fn point_to_data(&self, point: Point) -> Point {
        point
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}
