//! Feature records and the tabular feature sources they are built from.

use crate::error::{GeovizError, Result};
use crate::models::geometry::{Geometry, Ring};
use serde::{Deserialize, Serialize};

/// How rings with fewer than three vertices are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRingPolicy {
    /// Drop the ring
    #[default]
    Skip,
    /// Keep the vertices as a LineString
    Degrade,
}

/// A single attribute column of a feature
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Per-vertex numeric values; NaN entries are allowed
    Array(Vec<f64>),
    /// Opaque value carried through unchanged
    Value(serde_json::Value),
}

impl Column {
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Column::Array(values) => Some(values),
            Column::Value(_) => None,
        }
    }

    /// JSON rendering; NaN array entries become `null`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Column::Array(values) => serde_json::Value::Array(
                values
                    .iter()
                    .map(|v| {
                        serde_json::Number::from_f64(*v)
                            .map(serde_json::Value::Number)
                            .unwrap_or(serde_json::Value::Null)
                    })
                    .collect(),
            ),
            Column::Value(value) => value.clone(),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Array(values)
    }
}

impl From<serde_json::Value> for Column {
    fn from(value: serde_json::Value) -> Self {
        Column::Value(value)
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Column::Value(serde_json::Value::String(value.to_string()))
    }
}

impl From<f64> for Column {
    fn from(value: f64) -> Self {
        Column::Value(serde_json::json!(value))
    }
}

/// Insertion-ordered mapping from column name to column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Columns(Vec<(String, Column)>);

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.insert(name, column);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert a column, replacing an existing one in place.
    ///
    /// Returns the replaced column, if any.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Option<Column> {
        let name = name.into();
        let column = column.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, column)),
            None => {
                self.0.push((name, column));
                None
            }
        }
    }

    /// Remove a column, keeping the order of the remaining ones
    pub fn remove(&mut self, name: &str) -> Option<Column> {
        let index = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.0.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// JSON object of all columns
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.iter().map(|(name, column)| (name.to_string(), column.to_json())).collect()
    }
}

impl FromIterator<(String, Column)> for Columns {
    fn from_iter<I: IntoIterator<Item = (String, Column)>>(iter: I) -> Self {
        let mut columns = Columns::new();
        for (name, column) in iter {
            columns.insert(name, column);
        }
        columns
    }
}

/// A feature's attribute values plus its geometry
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub attributes: Columns,
    pub geometry: Option<Geometry>,
}

impl FeatureRecord {
    pub fn new(attributes: Columns, geometry: Option<Geometry>) -> Self {
        Self { attributes, geometry }
    }

    /// Check if this feature has geometry
    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Render as a GeoJSON Feature
    pub fn to_geojson(&self) -> Result<serde_json::Value> {
        let geometry = match &self.geometry {
            Some(geom) => geom.to_geojson()?,
            None => serde_json::Value::Null,
        };
        Ok(serde_json::json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": self.attributes.to_json(),
        }))
    }
}

/// Columnar feature storage with named coordinate columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub x_dim: String,
    pub y_dim: String,
    pub features: Vec<Columns>,
    /// Hole rings per feature, per split part
    pub holes: Option<Vec<Vec<Vec<Ring>>>>,
}

impl FeatureTable {
    pub fn new(x_dim: impl Into<String>, y_dim: impl Into<String>, features: Vec<Columns>) -> Self {
        Self { x_dim: x_dim.into(), y_dim: y_dim.into(), features, holes: None }
    }

    /// Attach per-feature, per-part hole rings
    pub fn with_holes(mut self, holes: Vec<Vec<Vec<Ring>>>) -> Self {
        self.holes = Some(holes);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Per-feature copies of all columns
    pub fn split_columns(&self) -> Vec<Columns> {
        self.features.clone()
    }

    /// Per-feature stacked (x, y) coordinate arrays
    pub fn split_arrays(&self) -> Result<Vec<Vec<[f64; 2]>>> {
        self.features
            .iter()
            .map(|columns| {
                let xs = coordinate_column(columns.get(&self.x_dim), &self.x_dim)?;
                let ys = coordinate_column(columns.get(&self.y_dim), &self.y_dim)?;
                stack_columns(xs, ys)
            })
            .collect()
    }

    /// Remove the coordinate columns from `columns` and stack them
    pub fn pop_coordinates(&self, columns: &mut Columns) -> Result<Vec<[f64; 2]>> {
        let xs = columns.remove(&self.x_dim);
        let ys = columns.remove(&self.y_dim);
        let xs = coordinate_column(xs.as_ref(), &self.x_dim)?;
        let ys = coordinate_column(ys.as_ref(), &self.y_dim)?;
        stack_columns(xs, ys)
    }

    /// Whether any feature declares hole rings
    pub fn has_holes(&self) -> bool {
        self.holes
            .as_ref()
            .map(|holes| holes.iter().flatten().any(|part| !part.is_empty()))
            .unwrap_or(false)
    }

    /// Hole rings of feature `index`, one list per split part
    pub fn holes(&self, index: usize) -> &[Vec<Ring>] {
        self.holes
            .as_ref()
            .and_then(|holes| holes.get(index))
            .map(|parts| parts.as_slice())
            .unwrap_or(&[])
    }
}

fn coordinate_column<'a>(column: Option<&'a Column>, name: &str) -> Result<&'a [f64]> {
    match column {
        Some(Column::Array(values)) => Ok(values),
        Some(Column::Value(_)) => Err(GeovizError::InvalidGeometry {
            reason: format!("coordinate column {} is not a numeric array", name),
        }),
        None => Err(GeovizError::MissingColumn { name: name.to_string() }),
    }
}

/// Stack two equally long columns into (x, y) rows
pub fn stack_columns(xs: &[f64], ys: &[f64]) -> Result<Vec<[f64; 2]>> {
    if xs.len() != ys.len() {
        return Err(GeovizError::InvalidGeometry {
            reason: format!("coordinate columns differ in length ({} vs {})", xs.len(), ys.len()),
        });
    }
    Ok(xs.iter().zip(ys).map(|(x, y)| [*x, *y]).collect())
}

/// Input representations accepted by the conversion layer
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSource {
    /// Columnar arrays with named coordinate columns
    Columnar(FeatureTable),
    /// A table with a native geometry column
    GeometryTable(Vec<FeatureRecord>),
    /// Geometry dictionaries, passed through untouched
    GeomDicts(Vec<FeatureRecord>),
}

impl FeatureSource {
    pub fn len(&self) -> usize {
        match self {
            FeatureSource::Columnar(table) => table.len(),
            FeatureSource::GeometryTable(records) | FeatureSource::GeomDicts(records) => {
                records.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
