//! Geometry models for geoviz-geo.
//!
//! This module re-exports canonical types from `geoviz-core` and adds the
//! geometry helpers that need `geo` algorithms.

use geo::orient::{Direction, Orient};
use geo::{BoundingRect, Winding};

// Re-export canonical types from geoviz-core
pub use geoviz_core::models::{
    BoundingBox, FeatureRecord, FeatureSource, FeatureTable, Geometry, GeometryKind,
    InvalidRingPolicy, Projection,
};

/// Reorient a polygon so its exterior ring winds counter-clockwise.
///
/// Other geometries are returned unchanged.
pub fn to_ccw(geom: Geometry) -> Geometry {
    match geom {
        Geometry::Polygon(p) if !p.exterior().is_ccw() => {
            Geometry::Polygon(p.orient(Direction::Default))
        }
        other => other,
    }
}

/// Whether the geometry is one of the Multi kinds
pub fn is_multi_geometry(geom: &Geometry) -> bool {
    geom.is_multi()
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Bounding box, `None` for an empty geometry
    fn bounds(&self) -> Option<BoundingBox>;
}

impl GeometryExt for Geometry {
    fn bounds(&self) -> Option<BoundingBox> {
        self.to_geo().bounding_rect().map(BoundingBox::from)
    }
}
