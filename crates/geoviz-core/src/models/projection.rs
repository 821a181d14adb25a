//! Projection model: kind, globe and projection-specific parameters.
//!
//! A `Projection` is a plain value. Domain limits, boundaries and the actual
//! coordinate transformation live in `geoviz-geo`.

use crate::error::{GeovizError, Result};
use serde::{Deserialize, Serialize};

/// Radius of the sphere that makes plate carrée coordinates come out in degrees
pub const DEGREE_SPHERE_RADIUS: f64 = 57.295_779_513_082_32;

/// WGS 84 semimajor axis in metres
pub const WGS84_SEMIMAJOR_AXIS: f64 = 6_378_137.0;

/// First eccentricity of the WGS 84 ellipsoid
pub const WGS84_ECCENTRICITY: f64 = 0.081_819_190_842_622;

/// Latitude range a Mercator projection is limited to
pub const MERCATOR_LATITUDE_LIMITS: (f64, f64) = (-80.0, 84.0);

/// Supported projection families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    PlateCarree,
    TransverseMercator,
    LambertConformal,
    Mercator,
    Utm,
}

impl ProjectionKind {
    /// Human-readable class name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::PlateCarree => "PlateCarree",
            ProjectionKind::TransverseMercator => "TransverseMercator",
            ProjectionKind::LambertConformal => "LambertConformal",
            ProjectionKind::Mercator => "Mercator",
            ProjectionKind::Utm => "UTM",
        }
    }

    /// Resolve the value of a proj4 `+proj=` token
    pub fn from_proj_name(name: &str) -> Option<Self> {
        match name {
            "tmerc" => Some(ProjectionKind::TransverseMercator),
            "lcc" => Some(ProjectionKind::LambertConformal),
            "merc" => Some(ProjectionKind::Mercator),
            "utm" => Some(ProjectionKind::Utm),
            "longlat" | "latlong" | "lonlat" | "latlon" => Some(ProjectionKind::PlateCarree),
            _ => None,
        }
    }

    /// Whether x is a periodic longitude axis
    pub fn is_cylindrical(&self) -> bool {
        matches!(self, ProjectionKind::PlateCarree)
    }
}

impl std::fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference ellipsoid; unset axes fall back to WGS 84
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Globe {
    pub semimajor_axis: Option<f64>,
    pub semiminor_axis: Option<f64>,
}

impl Globe {
    pub fn new(semimajor_axis: Option<f64>, semiminor_axis: Option<f64>) -> Self {
        Self { semimajor_axis, semiminor_axis }
    }

    /// A sphere of the given radius
    pub fn sphere(radius: f64) -> Self {
        Self::new(Some(radius), Some(radius))
    }

    /// Semimajor axis, defaulting to WGS 84
    pub fn semimajor(&self) -> f64 {
        self.semimajor_axis.unwrap_or(WGS84_SEMIMAJOR_AXIS)
    }

    /// First eccentricity; a lone semimajor axis describes a sphere
    pub fn eccentricity(&self) -> f64 {
        match (self.semimajor_axis, self.semiminor_axis) {
            (None, None) => WGS84_ECCENTRICITY,
            (Some(_), None) => 0.0,
            (a, Some(b)) => {
                let a = a.unwrap_or(WGS84_SEMIMAJOR_AXIS);
                (1.0 - (b * b) / (a * a)).max(0.0).sqrt()
            }
        }
    }

    fn proj4_terms(&self) -> String {
        match (self.semimajor_axis, self.semiminor_axis) {
            (None, None) => "+ellps=WGS84".to_string(),
            (Some(a), None) => format!("+a={}", a),
            (None, Some(b)) => format!("+a={} +b={}", WGS84_SEMIMAJOR_AXIS, b),
            (Some(a), Some(b)) => format!("+a={} +b={}", a, b),
        }
    }
}

/// Projection-specific parameters; `None` means the projection default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub central_longitude: Option<f64>,
    pub central_latitude: Option<f64>,
    pub false_easting: Option<f64>,
    pub false_northing: Option<f64>,
    pub scale_factor: Option<f64>,
    pub zone: Option<u8>,
    pub southern_hemisphere: bool,
    pub standard_parallels: Option<(f64, f64)>,
}

/// A projected coordinate reference system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub kind: ProjectionKind,
    pub params: ProjectionParams,
    pub globe: Option<Globe>,
}

impl Default for Projection {
    fn default() -> Self {
        Self::plate_carree()
    }
}

impl Projection {
    pub fn new(kind: ProjectionKind, params: ProjectionParams, globe: Option<Globe>) -> Self {
        Self { kind, params, globe }
    }

    /// Equirectangular projection in degree units (EPSG:4326 axes)
    pub fn plate_carree() -> Self {
        Self::new(ProjectionKind::PlateCarree, ProjectionParams::default(), None)
    }

    pub fn transverse_mercator() -> Self {
        Self::new(ProjectionKind::TransverseMercator, ProjectionParams::default(), None)
    }

    pub fn lambert_conformal() -> Self {
        Self::new(ProjectionKind::LambertConformal, ProjectionParams::default(), None)
    }

    pub fn mercator() -> Self {
        Self::new(ProjectionKind::Mercator, ProjectionParams::default(), None)
    }

    /// Spherical Mercator as used by web tile maps (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::new(
            ProjectionKind::Mercator,
            ProjectionParams::default(),
            Some(Globe::sphere(WGS84_SEMIMAJOR_AXIS)),
        )
    }

    pub fn utm(zone: u8, southern_hemisphere: bool) -> Self {
        let params =
            ProjectionParams { zone: Some(zone), southern_hemisphere, ..Default::default() };
        Self::new(ProjectionKind::Utm, params, None)
    }

    pub fn with_central_longitude(mut self, longitude: f64) -> Self {
        self.params.central_longitude = Some(longitude);
        self
    }

    pub fn with_globe(mut self, globe: Globe) -> Self {
        self.globe = Some(globe);
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn globe(&self) -> Globe {
        self.globe.unwrap_or_default()
    }

    pub fn central_longitude(&self) -> f64 {
        if let (ProjectionKind::Utm, Some(zone)) = (self.kind, self.params.zone) {
            return -183.0 + 6.0 * f64::from(zone);
        }
        self.params.central_longitude.unwrap_or(match self.kind {
            ProjectionKind::LambertConformal => -96.0,
            _ => 0.0,
        })
    }

    pub fn central_latitude(&self) -> f64 {
        self.params.central_latitude.unwrap_or(match self.kind {
            ProjectionKind::LambertConformal => 39.0,
            _ => 0.0,
        })
    }

    pub fn false_easting(&self) -> f64 {
        match self.kind {
            ProjectionKind::Utm => 500_000.0,
            _ => self.params.false_easting.unwrap_or(0.0),
        }
    }

    pub fn false_northing(&self) -> f64 {
        match self.kind {
            ProjectionKind::Utm if self.params.southern_hemisphere => 10_000_000.0,
            ProjectionKind::Utm => 0.0,
            _ => self.params.false_northing.unwrap_or(0.0),
        }
    }

    pub fn scale_factor(&self) -> f64 {
        match self.kind {
            ProjectionKind::Utm => 0.9996,
            _ => self.params.scale_factor.unwrap_or(1.0),
        }
    }

    pub fn standard_parallels(&self) -> (f64, f64) {
        self.params.standard_parallels.unwrap_or((33.0, 45.0))
    }

    /// Check that the parameters describe a constructible projection
    pub fn validate(&self) -> Result<()> {
        if self.kind == ProjectionKind::Utm {
            match self.params.zone {
                Some(zone) if (1..=60).contains(&zone) => {}
                Some(zone) => {
                    return Err(GeovizError::InvalidParameter {
                        key: "zone".to_string(),
                        reason: format!("UTM zone {} is outside 1..=60", zone),
                    })
                }
                None => {
                    return Err(GeovizError::InvalidParameter {
                        key: "zone".to_string(),
                        reason: "UTM requires a zone".to_string(),
                    })
                }
            }
        }
        if let Some((lat_1, lat_2)) = self.params.standard_parallels {
            if !(-90.0..=90.0).contains(&lat_1) || !(-90.0..=90.0).contains(&lat_2) {
                return Err(GeovizError::InvalidParameter {
                    key: "standard_parallels".to_string(),
                    reason: format!("({}, {}) are not valid latitudes", lat_1, lat_2),
                });
            }
            if self.kind == ProjectionKind::LambertConformal && lat_1 == -lat_2 {
                return Err(GeovizError::InvalidParameter {
                    key: "standard_parallels".to_string(),
                    reason: "parallels symmetric about the equator do not define a cone"
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// PROJ definition of this CRS
    pub fn to_proj4(&self) -> String {
        let body = match self.kind {
            ProjectionKind::PlateCarree => format!(
                "+proj=eqc +lat_ts=0 +lat_0=0 +lon_0={} +x_0=0 +y_0=0 +a={r} +b={r} +units=m",
                self.central_longitude(),
                r = DEGREE_SPHERE_RADIUS,
            ),
            ProjectionKind::TransverseMercator => format!(
                "+proj=tmerc +lon_0={} +lat_0={} +k={} +x_0={} +y_0={} {} +units=m",
                self.central_longitude(),
                self.central_latitude(),
                self.scale_factor(),
                self.false_easting(),
                self.false_northing(),
                self.globe().proj4_terms(),
            ),
            ProjectionKind::LambertConformal => {
                let (lat_1, lat_2) = self.standard_parallels();
                format!(
                    "+proj=lcc +lon_0={} +lat_0={} +lat_1={} +lat_2={} +x_0={} +y_0={} {} +units=m",
                    self.central_longitude(),
                    self.central_latitude(),
                    lat_1,
                    lat_2,
                    self.false_easting(),
                    self.false_northing(),
                    self.globe().proj4_terms(),
                )
            }
            ProjectionKind::Mercator => format!(
                "+proj=merc +lon_0={} +k={} +x_0={} +y_0={} {} +units=m",
                self.central_longitude(),
                self.scale_factor(),
                self.false_easting(),
                self.false_northing(),
                self.globe().proj4_terms(),
            ),
            ProjectionKind::Utm => format!(
                "+proj=utm +zone={}{} {} +units=m",
                self.params.zone.unwrap_or(0),
                if self.params.southern_hemisphere { " +south" } else { "" },
                self.globe().proj4_terms(),
            ),
        };
        format!("{} +no_defs +type=crs", body)
    }
}
