//! Extent reprojection.
//!
//! A bounding box is clamped to the source CRS's domain, shrunk by a small
//! tolerance, wrapped when the source x axis is a longitude, intersected with
//! the source boundary and finally projected into the destination CRS.

use crate::crs::CoordinateSystem;
use crate::models::GeometryExt;
use geo::{BooleanOps, Buffer, MultiPolygon};
use geoviz_core::error::{GeovizError, Result};
use geoviz_core::models::{BoundingBox, ExtentOptions, Geometry};

/// Lower bound of the canonical longitude range
pub const LONGITUDE_BASE: f64 = -180.0;

/// Length of the canonical longitude range
pub const LONGITUDE_PERIOD: f64 = 360.0;

/// Web Mercator extent of the whole world, used for global plots
pub const GLOBAL_EXTENT: BoundingBox = BoundingBox {
    min_x: -20_026_376.39,
    min_y: -20_048_966.10,
    max_x: 20_026_376.39,
    max_y: 20_048_966.10,
};

/// Wrap `value` into `[base, base + period)`
pub fn wrap_lons(value: f64, base: f64, period: f64) -> f64 {
    ((value - base + period * 2.0) % period) + base
}

/// Reproject `extents` from `src` into `dest`.
///
/// The projected area is clipped to the destination boundary, so the result
/// never exceeds `dest`'s limits. Returns `EmptyExtent` when nothing of the box lies within the source
/// domain and `DegenerateExtent` when clamping inverts the box.
pub fn project_extents<C>(
    extents: BoundingBox,
    src: &C,
    dest: &C,
    options: &ExtentOptions,
) -> Result<BoundingBox>
where
    C: CoordinateSystem + PartialEq,
{
    let BoundingBox { min_x: mut x1, min_y: mut y1, max_x: mut x2, max_y: mut y2 } = extents;

    let (cy1, cy2) = src.y_limits();
    y1 = y1.max(cy1);
    y2 = y2.min(cy2);

    let tol = options.tolerance;
    x1 += tol;
    x2 -= tol;
    y1 += tol;
    y2 -= tol;
    ensure_ordered('y', y1, y2)?;
    ensure_ordered('x', x1, x2)?;

    if src.is_cylindrical() {
        (x1, x2) = wrapped_range(x1, x2, options.wrap_samples);
    } else {
        let (cx1, cx2) = src.x_limits();
        x1 = x1.max(cx1);
        x2 = x2.min(cx2);
        ensure_ordered('x', x1, x2)?;
    }

    let domain = MultiPolygon::new(vec![BoundingBox::new(x1, y1, x2, y2).to_polygon()]);
    let boundary = src.boundary()?;

    let projected = if src != dest {
        let eroded = boundary.buffer(-src.threshold());
        let clipped = eroded.intersection(&domain);
        dest.project_geometry(&Geometry::MultiPolygon(clipped), src)
            .and_then(|geometry| clip_to_domain(geometry, dest))
            .map_err(|e| match e {
                GeovizError::ProjectionFailed { .. } => e,
                other => GeovizError::ProjectionFailed {
                    source_kind: src.kind_name().to_string(),
                    dest_kind: dest.kind_name().to_string(),
                    reason: other.to_string(),
                },
            })?
    } else {
        Geometry::MultiPolygon(MultiPolygon::new(vec![boundary]).intersection(&domain))
    };

    projected
        .bounds()
        .ok_or_else(|| GeovizError::EmptyExtent { crs: dest.kind_name().to_string() })
}

/// Extents for a plot in `dest` of data with extents `extents` in `crs`.
///
/// Global plots always cover the whole world. Data without a CRS is returned
/// as is. Non-finite extents and reprojection failures give `None`.
pub fn plot_extents<C>(
    extents: BoundingBox,
    crs: Option<&C>,
    dest: &C,
    is_global: bool,
    options: &ExtentOptions,
) -> Option<BoundingBox>
where
    C: CoordinateSystem + PartialEq,
{
    if is_global {
        return Some(GLOBAL_EXTENT);
    }
    let Some(crs) = crs else {
        return Some(extents);
    };
    if !extents.is_finite() {
        tracing::debug!("Extents {} are not finite", extents);
        return None;
    }
    match project_extents(extents, crs, dest, options) {
        Ok(projected) => Some(projected),
        Err(e) => {
            tracing::debug!("Could not project extents {}: {}", extents, e);
            None
        }
    }
}

/// Intersect projected polygons with the valid domain of `crs`
fn clip_to_domain<C: CoordinateSystem>(geometry: Geometry, crs: &C) -> Result<Geometry> {
    let domain = MultiPolygon::new(vec![crs.boundary()?]);
    let clipped = match geometry {
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(mp.intersection(&domain)),
        Geometry::Polygon(p) => Geometry::MultiPolygon(MultiPolygon::new(vec![p]).intersection(&domain)),
        other => other,
    };
    Ok(clipped)
}

fn wrapped_range(x1: f64, x2: f64, samples: usize) -> (f64, f64) {
    let samples = samples.max(2);
    let step = (x2 - x1) / (samples - 1) as f64;
    (0..samples)
        .map(|i| wrap_lons(x1 + step * i as f64, LONGITUDE_BASE, LONGITUDE_PERIOD))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)))
}

fn ensure_ordered(axis: char, min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(GeovizError::DegenerateExtent { axis, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};
    use geoviz_core::models::Projection;

    /// Planar CRS with exact limits and an optional failing projection
    #[derive(Debug, PartialEq)]
    struct Planar {
        name: &'static str,
        limits: (f64, f64),
        cylindrical: bool,
        fail: bool,
    }

    impl Planar {
        fn new(name: &'static str) -> Self {
            Self { name, limits: (-1000.0, 1000.0), cylindrical: false, fail: false }
        }
    }

    impl CoordinateSystem for Planar {
        fn kind_name(&self) -> &str {
            self.name
        }

        fn x_limits(&self) -> (f64, f64) {
            self.limits
        }

        fn y_limits(&self) -> (f64, f64) {
            (self.limits.0 / 2.0, self.limits.1 / 2.0)
        }

        fn boundary(&self) -> Result<Polygon> {
            let (x0, x1) = self.x_limits();
            let (y0, y1) = self.y_limits();
            Ok(Polygon::new(
                LineString::from(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]),
                vec![],
            ))
        }

        fn threshold(&self) -> f64 {
            1.0
        }

        fn is_cylindrical(&self) -> bool {
            self.cylindrical
        }

        fn project_geometry(&self, geometry: &Geometry, _source: &Self) -> Result<Geometry> {
            if self.fail {
                return Err(GeovizError::InvalidGeometry { reason: "outside domain".to_string() });
            }
            Ok(geometry.clone())
        }
    }

    fn assert_close(actual: BoundingBox, expected: (f64, f64, f64, f64)) {
        let actual = actual.to_tuple();
        for (a, e) in [actual.0, actual.1, actual.2, actual.3]
            .iter()
            .zip([expected.0, expected.1, expected.2, expected.3])
        {
            assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_wrap_lons() {
        assert_eq!(wrap_lons(200.0, -180.0, 360.0), -160.0);
        assert_eq!(wrap_lons(-200.0, -180.0, 360.0), 160.0);
        assert_eq!(wrap_lons(190.0, -180.0, 360.0), -170.0);
        assert_eq!(wrap_lons(0.0, -180.0, 360.0), 0.0);
    }

    #[test]
    fn test_same_crs_shrinks_by_tolerance() {
        let crs = Planar::new("Planar");
        let options = ExtentOptions { tolerance: 1e-3, ..Default::default() };
        let result =
            project_extents(BoundingBox::new(10.0, 20.0, 30.0, 40.0), &crs, &crs, &options)
                .unwrap();
        assert_close(result, (10.001, 20.001, 29.999, 39.999));
    }

    #[test]
    fn test_clamped_to_limits() {
        let crs = Planar::new("Planar");
        let options = ExtentOptions { tolerance: 0.0, ..Default::default() };
        let result =
            project_extents(BoundingBox::new(-5000.0, -5000.0, 100.0, 5000.0), &crs, &crs, &options)
                .unwrap();
        assert_close(result, (-1000.0, -500.0, 100.0, 500.0));
    }

    #[test]
    fn test_different_crs_erodes_boundary() {
        let src = Planar::new("Source");
        let dest = Planar::new("Dest");
        let options = ExtentOptions { tolerance: 0.0, ..Default::default() };
        let result =
            project_extents(BoundingBox::new(-2000.0, 0.0, 0.0, 100.0), &src, &dest, &options)
                .unwrap();
        // x is clamped to -1000 and then eroded by the threshold
        assert!((result.min_x + 999.0).abs() < 1e-3);
        assert!(result.max_x.abs() < 1e-3);
    }

    #[test]
    fn test_cylindrical_wraps_antimeridian() {
        let crs = Planar { cylindrical: true, ..Planar::new("Cylindrical") };
        let result = project_extents(
            BoundingBox::new(170.0, -10.0, 190.0, 10.0),
            &crs,
            &crs,
            &ExtentOptions::default(),
        )
        .unwrap();
        assert!(result.min_x < -179.9);
        assert!(result.max_x > 179.9);
    }

    #[test]
    fn test_projection_failure_names_both_kinds() {
        let src = Planar::new("Source");
        let dest = Planar { fail: true, ..Planar::new("Dest") };
        let err = project_extents(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            &src,
            &dest,
            &ExtentOptions::default(),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("from Source projection to Dest projection"));
        assert!(message.contains("outside domain"));
    }

    #[test]
    fn test_box_outside_domain() {
        let crs = Planar::new("Planar");
        let result = project_extents(
            BoundingBox::new(2000.0, 0.0, 3000.0, 10.0),
            &crs,
            &Planar::new("Other"),
            &ExtentOptions::default(),
        );
        assert!(matches!(result, Err(GeovizError::DegenerateExtent { axis: 'x', .. })));

        let tiny = Planar { limits: (-1.0, 1.0), ..Planar::new("Tiny") };
        let result = project_extents(
            BoundingBox::new(-0.5, -0.2, 0.5, 0.2),
            &tiny,
            &Planar::new("Other"),
            &ExtentOptions::default(),
        );
        // Eroding by the threshold leaves nothing of the boundary
        assert!(matches!(result, Err(GeovizError::EmptyExtent { .. })));
    }

    #[test]
    fn test_inverted_box() {
        let crs = Planar::new("Planar");
        let result = project_extents(
            BoundingBox::new(0.0, 10.0, 10.0, 10.0),
            &crs,
            &crs,
            &ExtentOptions::default(),
        );
        assert!(matches!(result, Err(GeovizError::DegenerateExtent { axis: 'y', .. })));
    }

    #[test]
    fn test_plate_carree_identity() {
        let pc = Projection::plate_carree();
        let options = ExtentOptions::default();
        let result =
            project_extents(BoundingBox::new(-10.0, -10.0, 10.0, 10.0), &pc, &pc, &options).unwrap();
        assert!((result.min_x + 10.0).abs() < 1e-5);
        assert!((result.max_y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_plate_carree_to_web_mercator() {
        let result = project_extents(
            BoundingBox::new(-10.0, -10.0, 10.0, 10.0),
            &Projection::plate_carree(),
            &Projection::web_mercator(),
            &ExtentOptions::default(),
        )
        .unwrap();
        assert!((result.min_x + 1_113_194.9).abs() < 1.0);
        assert!((result.max_x - 1_113_194.9).abs() < 1.0);
        assert!(result.max_y > 1_110_000.0 && result.max_y < 1_130_000.0);
    }

    #[test]
    fn test_lambert_extent_follows_curved_parallel() {
        let pc = Projection::plate_carree();
        let lcc = Projection::lambert_conformal().with_central_longitude(0.0);
        let result = project_extents(
            BoundingBox::new(-40.0, 40.0, 40.0, 60.0),
            &pc,
            &lcc,
            &ExtentOptions::default(),
        )
        .unwrap();

        // The 40N parallel bows south of its end points in a conic projection
        let proj = proj::Proj::new_known_crs(&pc.to_proj4(), &lcc.to_proj4(), None).unwrap();
        let edge_min = (0..=800)
            .map(|i| proj.convert((-40.0 + 0.1 * i as f64, 40.0)).unwrap())
            .map(|(_, y): (f64, f64)| y)
            .fold(f64::INFINITY, f64::min);
        let (_, corner_y): (f64, f64) = proj.convert((-40.0, 40.0)).unwrap();

        assert!(corner_y - edge_min > 500_000.0);
        assert!((result.min_y - edge_min).abs() < 1_000.0, "{} != {}", result.min_y, edge_min);
    }

    #[test]
    fn test_world_extent_stays_inside_web_mercator() {
        let merc = Projection::web_mercator();
        let result = project_extents(
            BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            &Projection::plate_carree(),
            &merc,
            &ExtentOptions::default(),
        )
        .unwrap();

        let (x0, x1) = merc.x_limits();
        let (y0, y1) = merc.y_limits();
        assert!(result.min_x >= x0 - 10.0 && result.max_x <= x1 + 10.0);
        assert!((result.min_y - y0).abs() < 10.0, "{} != {}", result.min_y, y0);
        assert!((result.max_y - y1).abs() < 10.0, "{} != {}", result.max_y, y1);
    }

    #[test]
    fn test_plot_extents() {
        let crs = Planar::new("Planar");
        let options = ExtentOptions::default();
        let extents = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        assert_eq!(plot_extents(extents, Some(&crs), &crs, true, &options), Some(GLOBAL_EXTENT));
        assert_eq!(plot_extents(extents, None, &crs, false, &options), Some(extents));

        let nan = BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0);
        assert_eq!(plot_extents(nan, Some(&crs), &crs, false, &options), None);

        let failing = Planar { fail: true, ..Planar::new("Failing") };
        assert_eq!(plot_extents(extents, Some(&crs), &failing, false, &options), None);
        assert!(plot_extents(extents, Some(&crs), &crs, false, &options).is_some());
    }
}
