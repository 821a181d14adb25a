//! Reading feature tables and geometries from JSON files

use anyhow::{Context, Result};
use geoviz_core::models::{Column, Columns, FeatureTable, Geometry, Ring};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// On-disk layout of a columnar feature table
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default = "default_x_dim")]
    x_dim: String,
    #[serde(default = "default_y_dim")]
    y_dim: String,
    features: Vec<serde_json::Map<String, Value>>,
    #[serde(default)]
    holes: Option<Vec<Vec<Vec<Ring>>>>,
}

fn default_x_dim() -> String {
    "x".to_string()
}

fn default_y_dim() -> String {
    "y".to_string()
}

/// Read a feature table.
///
/// Arrays of numbers and nulls become per-vertex columns with `null` read
/// as NaN, so a `null` in both coordinate columns marks a part boundary.
/// Every other value is carried through as an opaque column.
pub fn read_feature_table(path: &Path) -> Result<FeatureTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature table {}", path.display()))?;
    parse_feature_table(&content)
        .with_context(|| format!("Failed to parse feature table {}", path.display()))
}

pub fn parse_feature_table(content: &str) -> Result<FeatureTable> {
    let file: TableFile = serde_json::from_str(content)?;
    let features = file
        .features
        .into_iter()
        .map(|feature| {
            feature
                .into_iter()
                .fold(Columns::new(), |columns, (name, value)| columns.with(name, to_column(value)))
        })
        .collect();

    let table = FeatureTable::new(file.x_dim, file.y_dim, features);
    Ok(match file.holes {
        Some(holes) => table.with_holes(holes),
        None => table,
    })
}

fn to_column(value: Value) -> Column {
    let Value::Array(items) = &value else {
        return Column::Value(value);
    };
    let numeric: Option<Vec<f64>> = items
        .iter()
        .map(|item| match item {
            Value::Null => Some(f64::NAN),
            Value::Number(n) => n.as_f64(),
            _ => None,
        })
        .collect();
    match numeric {
        Some(values) => Column::Array(values),
        None => Column::Value(value),
    }
}

/// Read a GeoJSON geometry, or the geometry of a GeoJSON Feature
pub fn read_geometry(path: &Path) -> Result<Geometry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read geometry {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let geometry = match value.get("type").and_then(Value::as_str) {
        Some("Feature") => value.get("geometry").cloned().unwrap_or(Value::Null),
        _ => value,
    };
    Ok(Geometry::from_geojson(&geometry)?)
}
