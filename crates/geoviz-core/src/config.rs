use crate::error::{GeovizError, Result};
use crate::models::{ExtentOptions, InvalidRingPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoViz
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub tolerance: ConfigValue<f64>,
    pub wrap_samples: ConfigValue<usize>,
    pub invalid_rings: ConfigValue<InvalidRingPolicy>,
    pub default_crs: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let extent = ExtentOptions::default();
        Self {
            tolerance: ConfigValue::new(extent.tolerance, ConfigSource::Default),
            wrap_samples: ConfigValue::new(extent.wrap_samples, ConfigSource::Default),
            invalid_rings: ConfigValue::new(InvalidRingPolicy::Skip, ConfigSource::Default),
            default_crs: ConfigValue::new("EPSG:4326".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeovizError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeovizError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(tolerance) = file_config.tolerance {
            self.tolerance.update(check_tolerance(tolerance)?, ConfigSource::File);
        }

        if let Some(wrap_samples) = file_config.wrap_samples {
            self.wrap_samples.update(check_wrap_samples(wrap_samples)?, ConfigSource::File);
        }

        if let Some(invalid_rings) = file_config.invalid_rings {
            self.invalid_rings.update(invalid_rings, ConfigSource::File);
        }

        if let Some(default_crs) = file_config.default_crs {
            self.default_crs.update(default_crs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOVIZ_TOLERANCE
        if let Ok(tolerance_str) = env::var("GEOVIZ_TOLERANCE") {
            match parse_tolerance(&tolerance_str) {
                Ok(tolerance) => self.tolerance.update(tolerance, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOVIZ_TOLERANCE value '{}': expected a positive number",
                    tolerance_str
                ),
            }
        }

        // GEOVIZ_WRAP_SAMPLES
        if let Ok(samples_str) = env::var("GEOVIZ_WRAP_SAMPLES") {
            match parse_wrap_samples(&samples_str) {
                Ok(samples) => self.wrap_samples.update(samples, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOVIZ_WRAP_SAMPLES value '{}': expected an integer of at least 2",
                    samples_str
                ),
            }
        }

        // GEOVIZ_INVALID_RINGS
        if let Ok(policy_str) = env::var("GEOVIZ_INVALID_RINGS") {
            match parse_invalid_ring_policy(&policy_str) {
                Ok(policy) => self.invalid_rings.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOVIZ_INVALID_RINGS value '{}': expected skip or degrade",
                    policy_str
                ),
            }
        }

        // GEOVIZ_CRS
        if let Ok(crs) = env::var("GEOVIZ_CRS") {
            self.default_crs.update(crs, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(tolerance) = overrides.tolerance {
            self.tolerance.update(tolerance, ConfigSource::Cli);
        }

        if let Some(wrap_samples) = overrides.wrap_samples {
            self.wrap_samples.update(wrap_samples, ConfigSource::Cli);
        }

        if let Some(invalid_rings) = overrides.invalid_rings {
            self.invalid_rings.update(invalid_rings, ConfigSource::Cli);
        }

        if let Some(default_crs) = overrides.default_crs {
            self.default_crs.update(default_crs, ConfigSource::Cli);
        }
    }

    /// Options for the extent reprojector
    pub fn extent_options(&self) -> ExtentOptions {
        ExtentOptions { tolerance: self.tolerance.value, wrap_samples: self.wrap_samples.value }
    }

    pub fn invalid_ring_policy(&self) -> InvalidRingPolicy {
        self.invalid_rings.value
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "tolerance".to_string(),
            (self.tolerance.value.to_string(), self.tolerance.source),
        );

        map.insert(
            "wrap_samples".to_string(),
            (self.wrap_samples.value.to_string(), self.wrap_samples.source),
        );

        map.insert(
            "invalid_rings".to_string(),
            (format!("{:?}", self.invalid_rings.value), self.invalid_rings.source),
        );

        map.insert(
            "default_crs".to_string(),
            (self.default_crs.value.clone(), self.default_crs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    tolerance: Option<f64>,
    wrap_samples: Option<usize>,
    invalid_rings: Option<InvalidRingPolicy>,
    default_crs: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub tolerance: Option<f64>,
    pub wrap_samples: Option<usize>,
    pub invalid_rings: Option<InvalidRingPolicy>,
    pub default_crs: Option<String>,
}

fn check_tolerance(tolerance: f64) -> Result<f64> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(tolerance)
    } else {
        Err(GeovizError::ConfigInvalid {
            key: "tolerance".to_string(),
            reason: format!("Tolerance must be a positive number, got {}", tolerance),
        })
    }
}

fn check_wrap_samples(samples: usize) -> Result<usize> {
    if samples >= 2 {
        Ok(samples)
    } else {
        Err(GeovizError::ConfigInvalid {
            key: "wrap_samples".to_string(),
            reason: format!("At least 2 wrap samples are required, got {}", samples),
        })
    }
}

/// Parse the extent tolerance from string
pub fn parse_tolerance(s: &str) -> Result<f64> {
    let tolerance = s.trim().parse::<f64>().map_err(|_| GeovizError::ConfigInvalid {
        key: "tolerance".to_string(),
        reason: format!("Invalid tolerance: {}", s),
    })?;
    check_tolerance(tolerance)
}

/// Parse the wrap sample count from string
pub fn parse_wrap_samples(s: &str) -> Result<usize> {
    let samples = s.trim().parse::<usize>().map_err(|_| GeovizError::ConfigInvalid {
        key: "wrap_samples".to_string(),
        reason: format!("Invalid sample count: {}", s),
    })?;
    check_wrap_samples(samples)
}

/// Parse invalid ring policy from string
pub fn parse_invalid_ring_policy(s: &str) -> Result<InvalidRingPolicy> {
    match s.to_lowercase().as_str() {
        "skip" => Ok(InvalidRingPolicy::Skip),
        "degrade" => Ok(InvalidRingPolicy::Degrade),
        _ => Err(GeovizError::ConfigInvalid {
            key: "invalid_rings".to_string(),
            reason: format!("Invalid ring policy: {}. Use skip or degrade", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.tolerance.value, 1e-6);
        assert_eq!(config.tolerance.source, ConfigSource::Default);
        assert_eq!(config.wrap_samples.value, 10_000);
        assert_eq!(config.invalid_rings.value, InvalidRingPolicy::Skip);
        assert_eq!(config.default_crs.value, "EPSG:4326");
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
tolerance = 0.001
wrap_samples = 500
invalid_rings = "degrade"
default_crs = "EPSG:3857"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.tolerance.value, 0.001);
        assert_eq!(config.tolerance.source, ConfigSource::File);
        assert_eq!(config.wrap_samples.value, 500);
        assert_eq!(config.invalid_rings.value, InvalidRingPolicy::Degrade);
        assert_eq!(config.default_crs.value, "EPSG:3857");
    }

    #[test]
    fn test_file_rejects_non_positive_tolerance() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tolerance = -1.0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(GeovizError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            tolerance: Some(1e-3),
            invalid_rings: Some(InvalidRingPolicy::Degrade),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.tolerance.value, 1e-3);
        assert_eq!(config.tolerance.source, ConfigSource::Cli);
        assert_eq!(config.invalid_ring_policy(), InvalidRingPolicy::Degrade);
        // These should still be defaults
        assert_eq!(config.wrap_samples.source, ConfigSource::Default);
        assert_eq!(config.default_crs.source, ConfigSource::Default);
    }

    #[test]
    fn test_extent_options() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            wrap_samples: Some(64),
            ..Default::default()
        });
        let options = config.extent_options();
        assert_eq!(options.wrap_samples, 64);
        assert_eq!(options.tolerance, 1e-6);
    }

    #[test]
    fn test_parse_invalid_ring_policy() {
        assert_eq!(parse_invalid_ring_policy("skip").unwrap(), InvalidRingPolicy::Skip);
        assert_eq!(parse_invalid_ring_policy("DEGRADE").unwrap(), InvalidRingPolicy::Degrade);
        assert!(parse_invalid_ring_policy("explode").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_tolerance(" 1e-4 ").unwrap(), 1e-4);
        assert!(parse_tolerance("0").is_err());
        assert!(parse_tolerance("abc").is_err());
        assert_eq!(parse_wrap_samples("2").unwrap(), 2);
        assert!(parse_wrap_samples("1").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("tolerance"));
        assert!(map.contains_key("wrap_samples"));
        assert!(map.contains_key("invalid_rings"));

        let (crs_value, crs_source) = &map["default_crs"];
        assert_eq!(crs_value, "EPSG:4326");
        assert_eq!(*crs_source, ConfigSource::Default);
    }
}
