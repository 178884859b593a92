use formats::BoundaryFeature;
use serde::Serialize;

/// Pointer position relative to the map container, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A move or click reported by the renderer, with the topmost boundary
/// feature under the pointer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent<'a> {
    pub position: ScreenPoint,
    pub feature: Option<&'a BoundaryFeature>,
}

impl<'a> PointerEvent<'a> {
    pub fn over(position: ScreenPoint, feature: &'a BoundaryFeature) -> Self {
        Self {
            position,
            feature: Some(feature),
        }
    }

    /// Pointer is on the map but not over any boundary.
    pub fn empty(position: ScreenPoint) -> Self {
        Self {
            position,
            feature: None,
        }
    }
}
