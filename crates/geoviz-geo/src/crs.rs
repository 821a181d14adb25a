//! Coordinate reference system capability and CRS dispatch.
//!
//! The extent reprojector only needs a handful of facts about a CRS: its
//! valid x/y ranges, a boundary polygon, an erosion threshold and a way to
//! project geometries into it. [`CoordinateSystem`] captures exactly that and
//! [`Projection`] implements it on top of PROJ.

use crate::proj_string::proj4_to_projection;
use geo::orient::{Direction, Orient};
use geo::{
    Coord, Densify, Euclidean, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use geoviz_core::error::{GeovizError, Result};
use geoviz_core::models::projection::MERCATOR_LATITUDE_LIMITS;
use geoviz_core::models::{Geometry, Projection, ProjectionKind};
use proj::Proj;
use std::f64::consts::{FRAC_PI_4, PI};

/// Latitude at which a Lambert conformal boundary is cut off
const LAMBERT_CUTOFF: f64 = -30.0;

/// Samples along the cut-off parallel of a Lambert conformal boundary
const LAMBERT_PARALLEL_SAMPLES: usize = 181;

const TRANSVERSE_MERCATOR_LIMITS: ((f64, f64), (f64, f64)) = ((-2e7, 2e7), (-1e7, 1e7));
const UTM_LIMITS: ((f64, f64), (f64, f64)) = ((-250_000.0, 1_250_000.0), (-10_000.0, 25_000_000.0));

const UNBOUNDED: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

/// Capabilities the extent reprojector needs from a CRS
pub trait CoordinateSystem {
    /// Class name used in error messages
    fn kind_name(&self) -> &str;

    fn x_limits(&self) -> (f64, f64);

    fn y_limits(&self) -> (f64, f64);

    /// Polygon enclosing the valid domain
    fn boundary(&self) -> Result<Polygon>;

    /// Distance the boundary is eroded by before intersecting with it
    fn threshold(&self) -> f64;

    /// Whether x is a periodic longitude axis
    fn is_cylindrical(&self) -> bool;

    /// Transform `geometry` from `source` coordinates into this CRS
    fn project_geometry(&self, geometry: &Geometry, source: &Self) -> Result<Geometry>;
}

impl CoordinateSystem for Projection {
    fn kind_name(&self) -> &str {
        self.name()
    }

    fn x_limits(&self) -> (f64, f64) {
        domain(self).map(|d| d.x).unwrap_or(UNBOUNDED)
    }

    fn y_limits(&self) -> (f64, f64) {
        domain(self).map(|d| d.y).unwrap_or(UNBOUNDED)
    }

    fn boundary(&self) -> Result<Polygon> {
        let domain = domain(self)?;
        Ok(Polygon::new(LineString::new(domain.ring), vec![]).orient(Direction::Default))
    }

    fn threshold(&self) -> f64 {
        match self.kind {
            ProjectionKind::PlateCarree => 0.5,
            ProjectionKind::TransverseMercator => 1e4,
            ProjectionKind::LambertConformal => 1e5,
            ProjectionKind::Utm => 1e2,
            ProjectionKind::Mercator => {
                let (x0, x1) = mercator_domain(self).x;
                (x1 - x0) / 720.0
            }
        }
    }

    fn is_cylindrical(&self) -> bool {
        self.kind.is_cylindrical()
    }

    fn project_geometry(&self, geometry: &Geometry, source: &Self) -> Result<Geometry> {
        if source == self {
            return Ok(geometry.clone());
        }

        let failed = |reason: String| GeovizError::ProjectionFailed {
            source_kind: source.name().to_string(),
            dest_kind: self.name().to_string(),
            reason,
        };

        let from = source.to_proj4();
        let to = self.to_proj4();
        let proj = Proj::new_known_crs(&from, &to, None)
            .map_err(|e| failed(format!("Failed to create transformation: {}", e)))?;

        let convert = |coord: Coord| -> Result<Coord> {
            let (x, y) = proj
                .convert((coord.x, coord.y))
                .map_err(|e| failed(format!("({}, {}): {}", coord.x, coord.y, e)))?;
            if !x.is_finite() || !y.is_finite() {
                return Err(failed(format!("({}, {}) has no finite image", coord.x, coord.y)));
            }
            Ok(Coord { x, y })
        };

        // Straight source edges become curves, so sample them before moving vertices
        let densified = densify_geometry(geometry, source.threshold());
        transform_geometry(&densified, &convert)
    }
}

/// Valid region of a projection in its own coordinates
struct Domain {
    x: (f64, f64),
    y: (f64, f64),
    ring: Vec<Coord>,
}

impl Domain {
    fn rect((x0, x1): (f64, f64), (y0, y1): (f64, f64)) -> Self {
        let ring = vec![
            Coord { x: x0, y: y0 },
            Coord { x: x1, y: y0 },
            Coord { x: x1, y: y1 },
            Coord { x: x0, y: y1 },
            Coord { x: x0, y: y0 },
        ];
        Self { x: (x0, x1), y: (y0, y1), ring }
    }

    fn from_ring(ring: Vec<Coord>) -> Self {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for c in &ring {
            x = (x.0.min(c.x), x.1.max(c.x));
            y = (y.0.min(c.y), y.1.max(c.y));
        }
        Self { x, y, ring }
    }
}

fn domain(projection: &Projection) -> Result<Domain> {
    match projection.kind {
        ProjectionKind::PlateCarree => Ok(Domain::rect((-180.0, 180.0), (-90.0, 90.0))),
        ProjectionKind::TransverseMercator => {
            Ok(Domain::rect(TRANSVERSE_MERCATOR_LIMITS.0, TRANSVERSE_MERCATOR_LIMITS.1))
        }
        ProjectionKind::Utm => {
            projection.validate()?;
            Ok(Domain::rect(UTM_LIMITS.0, UTM_LIMITS.1))
        }
        ProjectionKind::Mercator => Ok(mercator_domain(projection)),
        ProjectionKind::LambertConformal => lambert_domain(projection),
    }
}

fn mercator_domain(projection: &Projection) -> Domain {
    let globe = projection.globe();
    let a = globe.semimajor() * projection.scale_factor();
    let e = globe.eccentricity();

    let half_width = PI * a;
    let x0 = projection.false_easting();
    let y0 = projection.false_northing();
    let (lat_min, lat_max) = MERCATOR_LATITUDE_LIMITS;

    Domain::rect(
        (x0 - half_width, x0 + half_width),
        (y0 + mercator_y(lat_min, a, e), y0 + mercator_y(lat_max, a, e)),
    )
}

fn mercator_y(latitude: f64, a: f64, e: f64) -> f64 {
    let phi = latitude.to_radians();
    let esin = e * phi.sin();
    a * ((FRAC_PI_4 + phi / 2.0).tan() * ((1.0 - esin) / (1.0 + esin)).powf(e / 2.0)).ln()
}

/// Cone bounded by the cut-off parallel, closed at the pole
fn lambert_domain(projection: &Projection) -> Result<Domain> {
    projection.validate()?;

    let globe = projection.globe();
    let a = globe.semimajor();
    let e = globe.eccentricity();
    let (lat_1, lat_2) = projection.standard_parallels();
    let (phi_1, phi_2) = (lat_1.to_radians(), lat_2.to_radians());

    let m = |phi: f64| phi.cos() / (1.0 - (e * phi.sin()).powi(2)).sqrt();
    let t = |phi: f64| {
        let esin = e * phi.sin();
        (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - esin) / (1.0 + esin)).powf(e / 2.0)
    };

    let n = if (phi_1 - phi_2).abs() < 1e-10 {
        phi_1.sin()
    } else {
        (m(phi_1).ln() - m(phi_2).ln()) / (t(phi_1).ln() - t(phi_2).ln())
    };
    let f = m(phi_1) / (n * t(phi_1).powf(n));
    let rho = |phi: f64| a * f * t(phi).powf(n);
    let rho_0 = rho(projection.central_latitude().to_radians());

    let cutoff = if n < 0.0 { -LAMBERT_CUTOFF } else { LAMBERT_CUTOFF };
    let rho_cut = rho(cutoff.to_radians());

    let x0 = projection.false_easting();
    let y0 = projection.false_northing();
    let pole = Coord { x: x0, y: y0 + rho_0 };

    let mut ring = Vec::with_capacity(LAMBERT_PARALLEL_SAMPLES + 2);
    ring.push(pole);
    for i in 0..LAMBERT_PARALLEL_SAMPLES {
        let offset = -180.0 + 360.0 * i as f64 / (LAMBERT_PARALLEL_SAMPLES - 1) as f64;
        let theta = n * offset.to_radians();
        ring.push(Coord { x: x0 + rho_cut * theta.sin(), y: y0 + rho_0 - rho_cut * theta.cos() });
    }
    ring.push(pole);

    Ok(Domain::from_ring(ring))
}

/// Insert vertices so that no edge is longer than `max_segment_length`
pub fn densify_geometry(geometry: &Geometry, max_segment_length: f64) -> Geometry {
    if !(max_segment_length.is_finite() && max_segment_length > 0.0) {
        return geometry.clone();
    }
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
        Geometry::LineString(ls) => Geometry::LineString(Euclidean.densify(ls, max_segment_length)),
        Geometry::LinearRing(ls) => Geometry::LinearRing(Euclidean.densify(ls, max_segment_length)),
        Geometry::Polygon(p) => Geometry::Polygon(Euclidean.densify(p, max_segment_length)),
        Geometry::MultiLineString(mls) => {
            Geometry::MultiLineString(Euclidean.densify(mls, max_segment_length))
        }
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(Euclidean.densify(mp, max_segment_length)),
    }
}

fn transform_line<F>(line: &LineString, convert: &F) -> Result<LineString>
where
    F: Fn(Coord) -> Result<Coord>,
{
    line.coords().map(|c| convert(*c)).collect::<Result<Vec<_>>>().map(LineString::new)
}

fn transform_polygon<F>(polygon: &Polygon, convert: &F) -> Result<Polygon>
where
    F: Fn(Coord) -> Result<Coord>,
{
    let exterior = transform_line(polygon.exterior(), convert)?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| transform_line(ring, convert))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Apply `convert` to every vertex of `geometry`
pub fn transform_geometry<F>(geometry: &Geometry, convert: &F) -> Result<Geometry>
where
    F: Fn(Coord) -> Result<Coord>,
{
    let transformed = match geometry {
        Geometry::Point(p) => Geometry::Point(Point::from(convert(p.0)?)),
        Geometry::LineString(ls) => Geometry::LineString(transform_line(ls, convert)?),
        Geometry::LinearRing(ls) => Geometry::LinearRing(transform_line(ls, convert)?),
        Geometry::Polygon(p) => Geometry::Polygon(transform_polygon(p, convert)?),
        Geometry::MultiPoint(mp) => Geometry::MultiPoint(MultiPoint::new(
            mp.iter().map(|p| convert(p.0).map(Point::from)).collect::<Result<Vec<_>>>()?,
        )),
        Geometry::MultiLineString(mls) => Geometry::MultiLineString(MultiLineString::new(
            mls.iter().map(|ls| transform_line(ls, convert)).collect::<Result<Vec<_>>>()?,
        )),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon::new(
            mp.iter().map(|p| transform_polygon(p, convert)).collect::<Result<Vec<_>>>()?,
        )),
    };
    Ok(transformed)
}

/// The representations a CRS may be given in
#[derive(Debug, Clone, PartialEq)]
pub enum CrsInput {
    /// No CRS given; plate carrée
    Default,
    Epsg(u32),
    /// `"EPSG:<code>"` or a proj4 string
    Text(String),
    Projection(Projection),
}

impl From<&str> for CrsInput {
    fn from(text: &str) -> Self {
        CrsInput::Text(text.to_string())
    }
}

impl From<u32> for CrsInput {
    fn from(code: u32) -> Self {
        CrsInput::Epsg(code)
    }
}

impl From<Projection> for CrsInput {
    fn from(projection: Projection) -> Self {
        CrsInput::Projection(projection)
    }
}

/// Resolve any supported CRS representation into a [`Projection`]
pub fn process_crs(input: CrsInput) -> Result<Projection> {
    match input {
        CrsInput::Default => Ok(Projection::plate_carree()),
        CrsInput::Epsg(code) => epsg_projection(code),
        CrsInput::Projection(projection) => Ok(projection),
        CrsInput::Text(text) => {
            let trimmed = text.trim();
            let is_epsg = trimmed.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("epsg"));
            if is_epsg {
                let code = trimmed[4..].trim_start_matches(|c: char| c == ':' || c.is_whitespace());
                let code = code.trim().parse::<u32>().map_err(|_| GeovizError::InvalidCrs {
                    input: text.clone(),
                    reason: "Could not parse EPSG code as CRS, must be of the format 'EPSG: {code}'"
                        .to_string(),
                })?;
                return epsg_projection(code);
            }
            proj4_to_projection(trimmed)
                .map_err(|e| GeovizError::InvalidCrs { input: text.clone(), reason: e.to_string() })
        }
    }
}

/// EPSG codes mapped without consulting the PROJ database
pub const BUILTIN_EPSG_CODES: &str = "4326, 3857, 900913, 32601-32660 and 32701-32760";

/// Projection for an EPSG code.
///
/// Common codes map directly. Any other code is looked up in the PROJ
/// database and accepted when its definition is one of the supported
/// projection families.
pub fn epsg_projection(code: u32) -> Result<Projection> {
    match code {
        4326 => Ok(Projection::plate_carree()),
        3857 | 900913 => Ok(Projection::web_mercator()),
        32601..=32660 => Ok(Projection::utm((code - 32600) as u8, false)),
        32701..=32760 => Ok(Projection::utm((code - 32700) as u8, true)),
        _ => lookup_epsg(code),
    }
}

fn lookup_epsg(code: u32) -> Result<Projection> {
    let input = format!("EPSG:{}", code);
    let unsupported = |reason: String| GeovizError::InvalidCrs {
        input: input.clone(),
        reason: format!(
            "{}; supported codes are {}, or any code PROJ defines as latlong, tmerc, utm, merc or lcc",
            reason, BUILTIN_EPSG_CODES
        ),
    };

    let proj = Proj::new(&input).map_err(|e| unsupported(e.to_string()))?;
    let definition = proj.def().map_err(|e| unsupported(e.to_string()))?;
    let proj4 = definition
        .split_whitespace()
        .map(|token| if token.starts_with('+') { token.to_string() } else { format!("+{}", token) })
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!("Resolved {} to '{}'", input, proj4);

    proj4_to_projection(&proj4).map_err(|e| unsupported(e.to_string()))
}
