//! Assembly of geometry records from feature sources.
//!
//! Every non-coordinate column of a columnar feature is carried over to the
//! emitted record unchanged. The caller's table is never modified.

use crate::builders::{collapse_lines, collapse_polygons, lines_from_array, polygons_from_array};
use geo::Polygon;
use geoviz_core::error::Result;
use geoviz_core::models::{
    FeatureRecord, FeatureSource, FeatureTable, Geometry, InvalidRingPolicy, Ring,
};

/// Convert a path source into one record per feature.
///
/// A feature with no valid line part keeps its attributes with no geometry.
pub fn path_to_geom_dicts(source: &FeatureSource) -> Result<Vec<FeatureRecord>> {
    let table = match source {
        FeatureSource::Columnar(table) => table,
        FeatureSource::GeometryTable(records) | FeatureSource::GeomDicts(records) => {
            return Ok(records.clone())
        }
    };

    let mut records = Vec::with_capacity(table.len());
    for columns in &table.features {
        let mut attributes = columns.clone();
        let coords = table.pop_coordinates(&mut attributes)?;
        let geometry = collapse_lines(lines_from_array(&coords));
        if geometry.is_none() {
            tracing::debug!("Path feature {} has no valid line parts", records.len());
        }
        records.push(FeatureRecord::new(attributes, geometry));
    }
    Ok(records)
}

/// Convert a polygon source into geometry records.
///
/// Holes are matched to parts by position: part `j` of feature `i` receives
/// `table.holes(i)[j]`. Features without any valid part are dropped. When a
/// short ring is degraded to a line, the feature is exploded into one record
/// per part instead of a single multi-part geometry.
pub fn polygons_to_geom_dicts(
    source: &FeatureSource,
    policy: InvalidRingPolicy,
) -> Result<Vec<FeatureRecord>> {
    let table = match source {
        FeatureSource::Columnar(table) => table,
        FeatureSource::GeometryTable(records) | FeatureSource::GeomDicts(records) => {
            return Ok(records.clone())
        }
    };

    let mut records = Vec::with_capacity(table.len());
    for (index, columns) in table.features.iter().enumerate() {
        let mut attributes = columns.clone();
        let coords = table.pop_coordinates(&mut attributes)?;
        let holes = feature_holes(table, index);

        let parts = polygons_from_array(&coords, holes, policy);
        let degraded = parts.iter().filter(|part| !matches!(part, Geometry::Polygon(_))).count();

        if degraded > 0 {
            tracing::debug!(
                "Exploding polygon feature {} into {} records ({} degraded parts)",
                index,
                parts.len(),
                degraded
            );
            records.extend(
                parts.into_iter().map(|part| FeatureRecord::new(attributes.clone(), Some(part))),
            );
            continue;
        }

        let polygons: Vec<Polygon> = parts
            .into_iter()
            .filter_map(|part| match part {
                Geometry::Polygon(p) => Some(p),
                _ => None,
            })
            .collect();
        match collapse_polygons(polygons) {
            Some(geometry) => records.push(FeatureRecord::new(attributes, Some(geometry))),
            None => tracing::debug!("Dropping polygon feature {} with no valid rings", index),
        }
    }
    Ok(records)
}

fn feature_holes(table: &FeatureTable, index: usize) -> &[Vec<Ring>] {
    if !table.has_holes() {
        return &[];
    }
    let holes = table.holes(index);
    if holes.is_empty() {
        tracing::debug!("No hole list for polygon feature {}", index);
    }
    holes
}
