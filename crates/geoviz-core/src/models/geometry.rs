//! Canonical geometry types used across all geoviz crates.
//!
//! `Geometry` is a closed set of the shapes the plotting layer renders. It
//! wraps the computational `geo` types and adds the `LinearRing` distinction
//! that `geo` itself does not carry.

use crate::error::{GeovizError, Result};
use geo::{LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

/// A closed or open sequence of (x, y) vertices
pub type Ring = Vec<[f64; 2]>;

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    /// Geometry type tag, as used by GeoJSON and WKT
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    /// Whether this kind owns an ordered sequence of single-part geometries
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            GeometryKind::MultiPoint | GeometryKind::MultiLineString | GeometryKind::MultiPolygon
        )
    }

    /// Line-like kinds
    pub fn is_lineal(&self) -> bool {
        matches!(self, GeometryKind::LineString | GeometryKind::MultiLineString)
    }

    /// Area-bounding kinds
    pub fn is_polygonal(&self) -> bool {
        matches!(
            self,
            GeometryKind::LinearRing | GeometryKind::Polygon | GeometryKind::MultiPolygon
        )
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vector geometry handed to and produced by the conversion layer
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    /// A closed ring; always stored with its first vertex repeated at the end
    LinearRing(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point(Point::new(x, y))
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString(LineString::from(coords))
    }

    /// Create a LinearRing geometry, closing the ring if needed
    pub fn linear_ring(coords: Vec<[f64; 2]>) -> Self {
        let mut ring = LineString::from(coords);
        ring.close();
        Geometry::LinearRing(ring)
    }

    /// Create a Polygon geometry from an exterior ring and its holes
    pub fn polygon(exterior: Vec<[f64; 2]>, holes: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon(Polygon::new(
            LineString::from(exterior),
            holes.into_iter().map(LineString::from).collect(),
        ))
    }

    /// Get the geometry type
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::LinearRing(_) => GeometryKind::LinearRing,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Whether the geometry is a Multi type
    pub fn is_multi(&self) -> bool {
        self.kind().is_multi()
    }

    /// Convert to a `geo::Geometry` for computational use.
    ///
    /// Rings become plain line strings.
    pub fn to_geo(&self) -> geo::Geometry {
        match self {
            Geometry::Point(p) => geo::Geometry::Point(*p),
            Geometry::LineString(ls) | Geometry::LinearRing(ls) => {
                geo::Geometry::LineString(ls.clone())
            }
            Geometry::Polygon(p) => geo::Geometry::Polygon(p.clone()),
            Geometry::MultiPoint(mp) => geo::Geometry::MultiPoint(mp.clone()),
            Geometry::MultiLineString(mls) => geo::Geometry::MultiLineString(mls.clone()),
            Geometry::MultiPolygon(mp) => geo::Geometry::MultiPolygon(mp.clone()),
        }
    }

    /// Convert to a GeoJSON geometry object
    pub fn to_geojson(&self) -> Result<serde_json::Value> {
        let value = geojson::Value::from(&self.to_geo());
        serde_json::to_value(geojson::Geometry::new(value))
            .map_err(|e| GeovizError::Serialization(format!("Failed to encode geometry: {}", e)))
    }

    /// Parse from a GeoJSON geometry object
    pub fn from_geojson(value: &serde_json::Value) -> Result<Self> {
        let geometry: geojson::Geometry = serde_json::from_value(value.clone())
            .map_err(|e| GeovizError::Serialization(format!("Invalid GeoJSON geometry: {}", e)))?;
        let geo_geom = geo::Geometry::<f64>::try_from(geometry)
            .map_err(|e| GeovizError::Serialization(format!("Unsupported GeoJSON: {}", e)))?;
        Self::try_from(geo_geom)
    }
}

impl From<Geometry> for geo::Geometry {
    fn from(geom: Geometry) -> Self {
        match geom {
            Geometry::Point(p) => geo::Geometry::Point(p),
            Geometry::LineString(ls) | Geometry::LinearRing(ls) => geo::Geometry::LineString(ls),
            Geometry::Polygon(p) => geo::Geometry::Polygon(p),
            Geometry::MultiPoint(mp) => geo::Geometry::MultiPoint(mp),
            Geometry::MultiLineString(mls) => geo::Geometry::MultiLineString(mls),
            Geometry::MultiPolygon(mp) => geo::Geometry::MultiPolygon(mp),
        }
    }
}

impl TryFrom<geo::Geometry> for Geometry {
    type Error = GeovizError;

    fn try_from(geom: geo::Geometry) -> Result<Self> {
        match geom {
            geo::Geometry::Point(p) => Ok(Geometry::Point(p)),
            geo::Geometry::Line(l) => Ok(Geometry::LineString(LineString::from(vec![l.start, l.end]))),
            geo::Geometry::LineString(ls) => Ok(Geometry::LineString(ls)),
            geo::Geometry::Polygon(p) => Ok(Geometry::Polygon(p)),
            geo::Geometry::MultiPoint(mp) => Ok(Geometry::MultiPoint(mp)),
            geo::Geometry::MultiLineString(mls) => Ok(Geometry::MultiLineString(mls)),
            geo::Geometry::MultiPolygon(mp) => Ok(Geometry::MultiPolygon(mp)),
            geo::Geometry::Rect(r) => Ok(Geometry::Polygon(r.to_polygon())),
            geo::Geometry::Triangle(t) => Ok(Geometry::Polygon(t.to_polygon())),
            geo::Geometry::GeometryCollection(_) => Err(GeovizError::InvalidGeometry {
                reason: "geometry collections are not supported".to_string(),
            }),
        }
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Geometry::Point(p)
    }
}

impl From<LineString> for Geometry {
    fn from(ls: LineString) -> Self {
        Geometry::LineString(ls)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Geometry::Polygon(p)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(mls: MultiLineString) -> Self {
        Geometry::MultiLineString(mls)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon(mp)
    }
}
