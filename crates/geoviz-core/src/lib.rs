//! GeoViz Core - Domain models, errors and configuration
//!
//! This crate contains the value types shared by the geometry conversion and
//! extent reprojection code in `geoviz-geo`, plus layered configuration.

pub mod config;
pub mod error;
pub mod models;

pub use error::{GeovizError, Result};
