//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use geoviz_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use geoviz_core::models::InvalidRingPolicy;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn clear_env() {
    env::remove_var("GEOVIZ_TOLERANCE");
    env::remove_var("GEOVIZ_WRAP_SAMPLES");
    env::remove_var("GEOVIZ_INVALID_RINGS");
    env::remove_var("GEOVIZ_CRS");
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
wrap_samples = 2048
# Only override the sample count, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.wrap_samples.value, 2048);
    assert_eq!(config.wrap_samples.source, ConfigSource::File);
    // These should still be defaults
    assert_eq!(config.tolerance.source, ConfigSource::Default);
    assert_eq!(config.invalid_rings.value, InvalidRingPolicy::Skip);
    assert_eq!(config.default_crs.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = LayeredConfig::with_defaults().load_from_file(temp_dir.path().join("none.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("geoviz.toml");
    fs::write(&path, "tolerance = [not toml").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(&path);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();

    env::set_var("GEOVIZ_TOLERANCE", "0.01");
    env::set_var("GEOVIZ_INVALID_RINGS", "degrade");
    env::set_var("GEOVIZ_CRS", "EPSG:32631");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
tolerance = 0.5
invalid_rings = "skip"
default_crs = "EPSG:3857"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Environment should override file
    assert_eq!(config.tolerance.value, 0.01);
    assert_eq!(config.tolerance.source, ConfigSource::Environment);
    assert_eq!(config.invalid_rings.value, InvalidRingPolicy::Degrade);
    assert_eq!(config.invalid_rings.source, ConfigSource::Environment);
    assert_eq!(config.default_crs.value, "EPSG:32631");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();

    env::set_var("GEOVIZ_TOLERANCE", "not-a-number");
    env::set_var("GEOVIZ_WRAP_SAMPLES", "1");
    env::set_var("GEOVIZ_INVALID_RINGS", "explode");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.tolerance.value, 1e-6);
    assert_eq!(config.tolerance.source, ConfigSource::Default);
    assert_eq!(config.wrap_samples.value, 10_000);
    assert_eq!(config.invalid_rings.value, InvalidRingPolicy::Skip);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("GEOVIZ_WRAP_SAMPLES", "300");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "wrap_samples = 200").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // At this point, environment should have overridden file
    assert_eq!(config.wrap_samples.value, 300);
    assert_eq!(config.wrap_samples.source, ConfigSource::Environment);

    // Now CLI should override environment
    config.update_from_cli(CliConfigOverrides { wrap_samples: Some(400), ..Default::default() });

    assert_eq!(config.wrap_samples.value, 400);
    assert_eq!(config.wrap_samples.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "default_crs = \"EPSG:3857\"\ninvalid_rings = \"degrade\"").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    let inspection_map = config.to_inspection_map();

    let (crs_value, crs_source) = &inspection_map["default_crs"];
    assert_eq!(crs_value, "EPSG:3857");
    assert_eq!(*crs_source, ConfigSource::File);

    let (policy_value, policy_source) = &inspection_map["invalid_rings"];
    assert_eq!(policy_value, "Degrade");
    assert_eq!(*policy_source, ConfigSource::File);

    let (_, tolerance_source) = &inspection_map["tolerance"];
    assert_eq!(*tolerance_source, ConfigSource::Default);
}
