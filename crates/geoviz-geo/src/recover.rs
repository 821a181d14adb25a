//! Flattening geometries back into coordinate arrays.

use crate::segment::SENTINEL_ROW;
use geo::{LineString, Polygon};
use geoviz_core::models::{Geometry, Ring};

/// Coordinate rows of `geom`.
///
/// Polygons contribute their exterior ring only. Parts of a multi-geometry
/// are separated by a single sentinel row; there is never a leading or
/// trailing sentinel.
pub fn geom_to_array(geom: &Geometry) -> Vec<[f64; 2]> {
    match geom {
        Geometry::Point(p) => vec![[p.x(), p.y()]],
        Geometry::LineString(ls) | Geometry::LinearRing(ls) => line_rows(ls),
        Geometry::Polygon(p) => exterior_rows(p),
        Geometry::MultiPoint(mp) => join_parts(mp.iter().map(|p| vec![[p.x(), p.y()]])),
        Geometry::MultiLineString(mls) => join_parts(mls.iter().map(line_rows)),
        Geometry::MultiPolygon(mp) => join_parts(mp.iter().map(exterior_rows)),
    }
}

/// Hole rings of every part of `geom`, aligned with the parts of [`geom_to_array`].
///
/// Non-polygon parts have no holes.
pub fn geom_holes(geom: &Geometry) -> Vec<Vec<Ring>> {
    match geom {
        Geometry::Polygon(p) => vec![interior_rings(p)],
        Geometry::MultiPolygon(mp) => mp.iter().map(interior_rings).collect(),
        Geometry::MultiPoint(mp) => vec![Vec::new(); mp.0.len()],
        Geometry::MultiLineString(mls) => vec![Vec::new(); mls.0.len()],
        Geometry::Point(_) | Geometry::LineString(_) | Geometry::LinearRing(_) => {
            vec![Vec::new()]
        }
    }
}

fn line_rows(ls: &LineString) -> Vec<[f64; 2]> {
    ls.coords().map(|c| [c.x, c.y]).collect()
}

fn exterior_rows(p: &Polygon) -> Vec<[f64; 2]> {
    line_rows(p.exterior())
}

fn interior_rings(p: &Polygon) -> Vec<Ring> {
    p.interiors().iter().map(line_rows).collect()
}

fn join_parts(parts: impl Iterator<Item = Vec<[f64; 2]>>) -> Vec<[f64; 2]> {
    let mut rows = Vec::new();
    for (i, part) in parts.enumerate() {
        if i > 0 {
            rows.push(SENTINEL_ROW);
        }
        rows.extend(part);
    }
    rows
}
