//! Error types for GeoViz

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeovizError {
    // Projection errors
    #[error("Unknown projection: {name}")]
    UnknownProjection { name: String },

    #[error("Invalid projection parameter {key}: {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error(
        "Could not project data from {source_kind} projection to {dest_kind} projection. \
         Ensure the coordinate reference system (crs) matches your data and the kdims. ({reason})"
    )]
    ProjectionFailed {
        source_kind: String,
        dest_kind: String,
        reason: String,
    },

    #[error("Could not interpret {input} as a CRS: {reason}")]
    InvalidCrs { input: String, reason: String },

    // Extent errors
    #[error("Extent does not intersect the valid domain of {crs}")]
    EmptyExtent { crs: String },

    #[error("Extent collapsed on the {axis} axis: min {min} exceeds max {max}")]
    DegenerateExtent { axis: char, min: f64, max: f64 },

    // Feature errors
    #[error("Missing coordinate column: {name}")]
    MissingColumn { name: String },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, GeovizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_failed_names_both_kinds() {
        let err = GeovizError::ProjectionFailed {
            source_kind: "PlateCarree".to_string(),
            dest_kind: "Mercator".to_string(),
            reason: "latitude or longitude exceeded limits".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("from PlateCarree projection to Mercator projection"));
        assert!(message.contains("matches your data"));
    }
}
