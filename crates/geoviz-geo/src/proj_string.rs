//! proj4 string parsing.
//!
//! A proj4 string is split on `+` into `key=value` tokens. Recognized keys
//! are sorted into projection parameters, globe parameters and standard
//! parallels, which are then assembled into a [`Projection`].

use geoviz_core::error::{GeovizError, Result};
use geoviz_core::models::{Globe, Projection, ProjectionKind, ProjectionParams};
use std::collections::BTreeMap;

/// proj4 keys that map onto projection parameters
const PROJECTION_KEYS: &[(&str, &str)] = &[
    ("lon_0", "central_longitude"),
    ("lat_0", "central_latitude"),
    ("x_0", "false_easting"),
    ("y_0", "false_northing"),
    ("k", "scale_factor"),
    ("zone", "zone"),
];

/// proj4 keys that map onto globe parameters
const GLOBE_KEYS: &[(&str, &str)] = &[("a", "semimajor_axis"), ("b", "semiminor_axis")];

const STANDARD_PARALLEL_KEYS: &[&str] = &["lat_1", "lat_2"];

/// A proj4 value: numeric when it parses as one, text otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum ProjValue {
    Number(f64),
    Text(String),
}

impl ProjValue {
    fn parse(raw: &str) -> Self {
        raw.parse::<f64>().map(ProjValue::Number).unwrap_or_else(|_| ProjValue::Text(raw.to_string()))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ProjValue::Number(v) => Some(*v),
            ProjValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ProjValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjValue::Number(v) => write!(f, "{}", v),
            ProjValue::Text(s) => f.write_str(s),
        }
    }
}

/// Classified tokens of a proj4 string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedProj4 {
    /// Raw value of the `proj` key
    pub proj: Option<String>,
    /// Projection parameters by keyword name
    pub projection: BTreeMap<&'static str, ProjValue>,
    /// Globe parameters by keyword name
    pub globe: BTreeMap<&'static str, ProjValue>,
    /// `lat_1` / `lat_2` values
    pub standard_parallels: BTreeMap<&'static str, ProjValue>,
}

/// Tokenize and classify a proj4 string.
///
/// Tokens without exactly one `=` (such as `+no_defs`) are ignored; later
/// occurrences of a key replace earlier ones.
pub fn parse_proj4(input: &str) -> ParsedProj4 {
    let mut parsed = ParsedProj4::default();
    for token in input.split('+') {
        let mut pieces = token.split('=');
        let (Some(key), Some(raw), None) = (pieces.next(), pieces.next(), pieces.next()) else {
            continue;
        };
        let key = key.trim();
        let raw = raw.trim();
        let value = ProjValue::parse(raw);

        if key == "proj" {
            parsed.proj = Some(raw.to_string());
        }
        if let Some((_, name)) = PROJECTION_KEYS.iter().find(|(k, _)| *k == key) {
            parsed.projection.insert(*name, value.clone());
        }
        if let Some((_, name)) = GLOBE_KEYS.iter().find(|(k, _)| *k == key) {
            parsed.globe.insert(*name, value.clone());
        }
        if let Some(name) = STANDARD_PARALLEL_KEYS.iter().find(|k| **k == key) {
            parsed.standard_parallels.insert(*name, value);
        }
    }
    parsed
}

impl ParsedProj4 {
    /// Projection kind selected by the `proj` key
    pub fn kind(&self) -> Result<ProjectionKind> {
        let name = self.proj.as_deref().unwrap_or_default();
        ProjectionKind::from_proj_name(name).ok_or_else(|| GeovizError::UnknownProjection {
            name: if name.is_empty() { "<missing proj>".to_string() } else { name.to_string() },
        })
    }

    /// Assemble the projection described by the parsed groups
    pub fn build(&self) -> Result<Projection> {
        let kind = self.kind()?;
        if kind == ProjectionKind::PlateCarree {
            return Ok(Projection::plate_carree());
        }

        let mut params = ProjectionParams {
            central_longitude: number(&self.projection, "central_longitude")?,
            central_latitude: number(&self.projection, "central_latitude")?,
            false_easting: number(&self.projection, "false_easting")?,
            false_northing: number(&self.projection, "false_northing")?,
            scale_factor: number(&self.projection, "scale_factor")?,
            zone: zone(&self.projection)?,
            southern_hemisphere: false,
            standard_parallels: None,
        };

        match (
            number(&self.standard_parallels, "lat_1")?,
            number(&self.standard_parallels, "lat_2")?,
        ) {
            (Some(lat_1), Some(lat_2)) => params.standard_parallels = Some((lat_1, lat_2)),
            (None, None) => {}
            _ => tracing::warn!("Ignoring standard parallel: both lat_1 and lat_2 are required"),
        }

        if kind == ProjectionKind::Mercator {
            params.false_easting = None;
            params.false_northing = None;
        }

        let globe = if self.globe.is_empty() {
            None
        } else {
            Some(Globe::new(
                number(&self.globe, "semimajor_axis")?,
                number(&self.globe, "semiminor_axis")?,
            ))
        };

        let projection = Projection::new(kind, params, globe);
        projection.validate()?;
        Ok(projection)
    }
}

/// Parse a proj4 string straight into a [`Projection`]
pub fn proj4_to_projection(input: &str) -> Result<Projection> {
    parse_proj4(input).build()
}

fn number(group: &BTreeMap<&'static str, ProjValue>, name: &str) -> Result<Option<f64>> {
    match group.get(name) {
        None => Ok(None),
        Some(ProjValue::Number(v)) => Ok(Some(*v)),
        Some(ProjValue::Text(text)) => Err(GeovizError::InvalidParameter {
            key: name.to_string(),
            reason: format!("expected a number, got '{}'", text),
        }),
    }
}

fn zone(group: &BTreeMap<&'static str, ProjValue>) -> Result<Option<u8>> {
    let Some(value) = number(group, "zone")? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || !(1.0..=60.0).contains(&value) {
        return Err(GeovizError::InvalidParameter {
            key: "zone".to_string(),
            reason: format!("{} is not a UTM zone", value),
        });
    }
    Ok(Some(value as u8))
}
