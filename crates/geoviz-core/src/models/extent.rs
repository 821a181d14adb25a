//! Axis-aligned bounding boxes.

use geo::{LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Bounding box in a CRS's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// From a `(min_x, min_y, max_x, max_y)` tuple
    pub fn from_tuple((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }

    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Closed rectangular ring: (x1, y1), (x2, y1), (x2, y2), (x1, y2), (x1, y1)
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(
            LineString::from(vec![
                [self.min_x, self.min_y],
                [self.max_x, self.min_y],
                [self.max_x, self.max_y],
                [self.min_x, self.max_y],
                [self.min_x, self.min_y],
            ]),
            vec![],
        )
    }
}

/// Numerical knobs of the extent reprojector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentOptions {
    /// Inward shrink applied to every side of the box
    pub tolerance: f64,
    /// Number of samples used when wrapping a cylindrical x range
    pub wrap_samples: usize,
}

impl Default for ExtentOptions {
    fn default() -> Self {
        Self { tolerance: 1e-6, wrap_samples: 10_000 }
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}
