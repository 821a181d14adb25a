//! Line and polygon builders.
//!
//! Both builders accept any [`FeatureSource`]. Columnar sources are split into
//! per-feature coordinate arrays and segmented on sentinel rows; sources that
//! already hold geometries are unwrapped into their line or polygon parts.

use crate::segment::split_on_sentinels;
use geo::{ConvexHull, LineString, MultiLineString, MultiPolygon, Polygon};
use geoviz_core::error::{GeovizError, Result};
use geoviz_core::models::{FeatureSource, Geometry, InvalidRingPolicy, Ring};

/// Fewest vertices a line part may have
pub const MIN_LINE_VERTICES: usize = 2;

/// Fewest vertices a polygon ring may have
pub const MIN_RING_VERTICES: usize = 3;

/// One feature of a source, resolved to its representation
pub(crate) enum SplitFeature<'a> {
    /// Coordinate rows plus the feature's hole rings, one list per part
    Array(Vec<[f64; 2]>, &'a [Vec<Ring>]),
    Geometry(&'a Geometry),
}

/// Resolve a source into per-feature coordinate arrays or geometries.
///
/// Records without geometry are left out.
pub(crate) fn split_features(source: &FeatureSource) -> Result<Vec<SplitFeature<'_>>> {
    match source {
        FeatureSource::Columnar(table) => Ok(table
            .split_arrays()?
            .into_iter()
            .enumerate()
            .map(|(index, coords)| SplitFeature::Array(coords, table.holes(index)))
            .collect()),
        FeatureSource::GeometryTable(records) | FeatureSource::GeomDicts(records) => Ok(records
            .iter()
            .filter_map(|record| record.geometry.as_ref())
            .map(SplitFeature::Geometry)
            .collect()),
    }
}

/// LineStrings for every part of `coords` with at least two vertices
pub fn lines_from_array(coords: &[[f64; 2]]) -> Vec<LineString> {
    split_on_sentinels(coords)
        .filter_map(|part| {
            if part.len() < MIN_LINE_VERTICES {
                tracing::debug!("Skipping line part with {} vertices", part.len());
                return None;
            }
            Some(LineString::from(part.to_vec()))
        })
        .collect()
}

/// Polygon parts of `coords`; short rings are dropped or kept as lines per `policy`.
///
/// Part `j` receives the rings of `holes[j]` as interiors, closed if needed.
/// Parts without an entry in `holes` have none.
pub fn polygons_from_array(
    coords: &[[f64; 2]],
    holes: &[Vec<Ring>],
    policy: InvalidRingPolicy,
) -> Vec<Geometry> {
    let mut parts = Vec::new();
    for (index, part) in split_on_sentinels(coords).enumerate() {
        if part.len() < MIN_RING_VERTICES {
            match policy {
                InvalidRingPolicy::Skip => {
                    tracing::debug!("Skipping ring with {} vertices", part.len());
                }
                InvalidRingPolicy::Degrade => {
                    tracing::debug!("Degrading ring with {} vertices to a line", part.len());
                    parts.push(Geometry::LineString(LineString::from(part.to_vec())));
                }
            }
            continue;
        }
        let interiors = holes.get(index).map(|rings| close_rings(rings)).unwrap_or_default();
        parts.push(Geometry::Polygon(Polygon::new(LineString::from(part.to_vec()), interiors)));
    }
    parts
}

fn close_rings(rings: &[Ring]) -> Vec<LineString> {
    rings
        .iter()
        .map(|ring| {
            let mut ring = LineString::from(ring.clone());
            ring.close();
            ring
        })
        .collect()
}

/// Line parts of an already built geometry.
///
/// Polygons contribute their exterior rings only.
pub fn lines_from_geometry(geom: &Geometry) -> Result<Vec<LineString>> {
    match geom {
        Geometry::MultiPolygon(mp) => Ok(mp.iter().map(|p| p.exterior().clone()).collect()),
        Geometry::Polygon(p) => Ok(vec![p.exterior().clone()]),
        Geometry::MultiLineString(mls) => Ok(mls.0.clone()),
        Geometry::LineString(ls) | Geometry::LinearRing(ls) => Ok(vec![ls.clone()]),
        Geometry::Point(_) | Geometry::MultiPoint(_) => Err(GeovizError::InvalidGeometry {
            reason: format!("{} has no line parts", geom.kind()),
        }),
    }
}

/// Polygon parts of an already built geometry.
///
/// Lines are replaced by their convex hull.
pub fn polygons_from_geometry(geom: &Geometry) -> Vec<Geometry> {
    match geom {
        Geometry::MultiLineString(mls) => {
            mls.iter().map(|ls| Geometry::Polygon(ls.convex_hull())).collect()
        }
        Geometry::MultiPolygon(mp) => mp.iter().cloned().map(Geometry::Polygon).collect(),
        Geometry::LineString(ls) => vec![Geometry::Polygon(ls.convex_hull())],
        Geometry::LinearRing(ring) => vec![Geometry::Polygon(Polygon::new(ring.clone(), vec![]))],
        other => vec![other.clone()],
    }
}

/// Every line part of every feature in `source`
pub fn path_to_lines(source: &FeatureSource) -> Result<Vec<LineString>> {
    let mut lines = Vec::new();
    for feature in split_features(source)? {
        match feature {
            SplitFeature::Array(coords, _) => lines.extend(lines_from_array(&coords)),
            SplitFeature::Geometry(geom) => lines.extend(lines_from_geometry(geom)?),
        }
    }
    Ok(lines)
}

/// All line parts of `source` as one MultiLineString, empty when none qualify
pub fn path_to_geom(source: &FeatureSource) -> Result<MultiLineString> {
    Ok(MultiLineString::new(path_to_lines(source)?))
}

/// Every polygon part of every feature in `source`.
///
/// With [`InvalidRingPolicy::Degrade`] the result may mix polygons and lines.
pub fn polygon_to_parts(source: &FeatureSource, policy: InvalidRingPolicy) -> Result<Vec<Geometry>> {
    let mut parts = Vec::new();
    for feature in split_features(source)? {
        match feature {
            SplitFeature::Array(coords, holes) => {
                parts.extend(polygons_from_array(&coords, holes, policy))
            }
            SplitFeature::Geometry(geom) => parts.extend(polygons_from_geometry(geom)),
        }
    }
    Ok(parts)
}

/// All polygon parts of `source` as one MultiPolygon.
///
/// Short rings are always skipped here since a MultiPolygon cannot hold lines.
pub fn polygon_to_geom(source: &FeatureSource) -> Result<MultiPolygon> {
    let polygons = polygon_to_parts(source, InvalidRingPolicy::Skip)?
        .into_iter()
        .map(|part| match part {
            Geometry::Polygon(p) => Ok(p),
            other => Err(GeovizError::InvalidGeometry {
                reason: format!("cannot collect a {} into a MultiPolygon", other.kind()),
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(MultiPolygon::new(polygons))
}

/// Single LineString for one part, MultiLineString for several, `None` for none
pub fn collapse_lines(mut lines: Vec<LineString>) -> Option<Geometry> {
    match lines.len() {
        0 => None,
        1 => lines.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(lines))),
    }
}

/// Single Polygon for one part, MultiPolygon for several, `None` for none
pub fn collapse_polygons(mut polygons: Vec<Polygon>) -> Option<Geometry> {
    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}
