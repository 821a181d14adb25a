//! GeoViz Geo - Geometry conversion, CRS handling and extent reprojection
//!
//! This crate turns NaN-delimited coordinate arrays into geometries and back,
//! assembles geometry records from columnar feature tables, reprojects view
//! extents between coordinate reference systems and parses proj4 strings.

pub mod builders;
pub mod crs;
pub mod extent;
pub mod geom_dicts;
pub mod mesh;
pub mod models;
pub mod proj_string;
pub mod recover;
pub mod segment;

pub use builders::{
    collapse_lines, collapse_polygons, path_to_geom, path_to_lines, polygon_to_geom,
    polygon_to_parts,
};
pub use crs::{process_crs, CoordinateSystem, CrsInput};
pub use extent::{plot_extents, project_extents, wrap_lons};
pub use geom_dicts::{path_to_geom_dicts, polygons_to_geom_dicts};
pub use mesh::GridMesh;
pub use proj_string::{parse_proj4, proj4_to_projection, ParsedProj4, ProjValue};
pub use recover::{geom_holes, geom_to_array};
pub use segment::{is_sentinel, split_on_sentinels};
