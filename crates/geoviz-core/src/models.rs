pub mod extent;
pub mod feature;
pub mod geometry;
pub mod projection;

pub use extent::{BoundingBox, ExtentOptions};
pub use feature::{
    stack_columns, Column, Columns, FeatureRecord, FeatureSource, FeatureTable, InvalidRingPolicy,
};
pub use geometry::{Geometry, GeometryKind, Ring};
pub use projection::{Globe, Projection, ProjectionKind, ProjectionParams};
