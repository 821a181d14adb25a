//! Gridded mesh data and global longitude wrapping.

use crate::crs::CoordinateSystem;
use crate::extent::LONGITUDE_PERIOD;
use geoviz_core::error::{GeovizError, Result};

/// Quadmesh coordinates and values; `zs[row][column]` with rows along y
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub zs: Vec<Vec<f64>>,
}

impl GridMesh {
    /// Build a mesh, checking that `zs` has one row per y and one column per x
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<Vec<f64>>) -> Result<Self> {
        if zs.len() != ys.len() {
            return Err(GeovizError::InvalidGeometry {
                reason: format!("mesh has {} rows for {} y values", zs.len(), ys.len()),
            });
        }
        if let Some(row) = zs.iter().find(|row| row.len() != xs.len()) {
            return Err(GeovizError::InvalidGeometry {
                reason: format!("mesh row has {} values for {} x values", row.len(), xs.len()),
            });
        }
        Ok(Self { xs, ys, zs })
    }

    /// Range of the finite x values
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.xs.iter().filter(|x| x.is_finite()).fold(None, |range, &x| match range {
            None => Some((x, x)),
            Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
        })
    }

    /// Close a global grid on a cylindrical CRS.
    ///
    /// When the x range spans exactly one period, the first column is
    /// repeated after the last one, shifted by a full period.
    pub fn wrap_global<C: CoordinateSystem>(mut self, crs: &C) -> Self {
        let spans_globe = matches!(self.x_range(), Some((lo, hi)) if hi - lo == LONGITUDE_PERIOD);
        if !crs.is_cylindrical() || !spans_globe {
            return self;
        }
        let Some(&first) = self.xs.first() else {
            return self;
        };
        tracing::debug!("Wrapping global mesh of {} columns", self.xs.len());
        self.xs.push(first + LONGITUDE_PERIOD);
        for row in &mut self.zs {
            if let Some(&value) = row.first() {
                row.push(value);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoviz_core::models::Projection;

    fn global_mesh() -> GridMesh {
        let xs = vec![-180.0, -60.0, 60.0, 180.0];
        let ys = vec![-45.0, 45.0];
        let zs = vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]];
        GridMesh::new(xs, ys, zs).unwrap()
    }

    #[test]
    fn test_shape_checked() {
        assert!(GridMesh::new(vec![0.0, 1.0], vec![0.0], vec![vec![1.0]]).is_err());
        assert!(GridMesh::new(vec![0.0], vec![0.0, 1.0], vec![vec![1.0]]).is_err());
    }

    #[test]
    fn test_global_mesh_wraps() {
        let mesh = global_mesh().wrap_global(&Projection::plate_carree());
        assert_eq!(mesh.xs, vec![-180.0, -60.0, 60.0, 180.0, 180.0]);
        assert_eq!(mesh.zs[0], vec![1.0, 2.0, 3.0, 4.0, 1.0]);
        assert_eq!(mesh.zs[1].len(), 5);
    }

    #[test]
    fn test_regional_or_projected_mesh_unchanged() {
        let regional = GridMesh::new(vec![0.0, 10.0], vec![0.0], vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(regional.clone().wrap_global(&Projection::plate_carree()), regional);

        let global = global_mesh();
        assert_eq!(global.clone().wrap_global(&Projection::web_mercator()), global);
    }
}
