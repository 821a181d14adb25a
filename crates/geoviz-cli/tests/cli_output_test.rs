//! Integration tests for CLI output
//!
//! These tests run the geoviz binary and verify its JSON output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn geoviz_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("geoviz");
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(geoviz_bin())
        .current_dir(dir)
        .args(args)
        .env_remove("GEOVIZ_TOLERANCE")
        .env_remove("GEOVIZ_WRAP_SAMPLES")
        .env_remove("GEOVIZ_INVALID_RINGS")
        .env_remove("GEOVIZ_CRS")
        .output()
        .expect("Failed to execute command")
}

fn json_data(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "Command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "success");
    parsed.get("data").cloned().expect("Should have data field")
}

#[test]
fn test_parse_proj_json() {
    let dir = TempDir::new().unwrap();
    let output = run(
        dir.path(),
        &["parse-proj", "+proj=tmerc +lat_0=0 +lon_0=3 +k=0.9996 +x_0=500000 +y_0=0", "--json"],
    );
    let data = json_data(&output);

    assert_eq!(data["projection"]["kind"], "TransverseMercator");
    assert_eq!(data["parameters"]["central_longitude"], 3.0);
    assert_eq!(data["parameters"]["scale_factor"], 0.9996);
    assert!(data["proj4"].as_str().unwrap().contains("+proj=tmerc"));
}

#[test]
fn test_parse_proj_unknown_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["parse-proj", "+proj=robin", "--json"]);
    assert!(!output.status.success());
}

#[test]
fn test_extent_identity() {
    let dir = TempDir::new().unwrap();
    let output = run(
        dir.path(),
        &["extent", "-10", "-5", "10", "5", "--src", "EPSG:4326", "--dest", "EPSG:4326", "--json"],
    );
    let data = json_data(&output);

    let bounds = &data["bounds"];
    for (key, expected) in [("min_x", -10.0), ("min_y", -5.0), ("max_x", 10.0), ("max_y", 5.0)] {
        let value = bounds[key].as_f64().unwrap();
        assert!((value - expected).abs() < 1e-3, "{} was {}", key, value);
    }
}

#[test]
fn test_extent_invalid_crs_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["extent", "0", "0", "1", "1", "--src", "EPSG:abc"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid coordinate reference system"));
}

#[test]
fn test_convert_path_table() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("table.json");
    std::fs::write(
        &table,
        r#"{"features": [{"x": [0, 1, null, 2, 3], "y": [0, 1, null, 2, 3], "name": "river"}]}"#,
    )
    .unwrap();

    let output = run(dir.path(), &["convert", "table.json", "--element", "path", "--json"]);
    let data = json_data(&output);

    assert_eq!(data["type"], "FeatureCollection");
    let feature = &data["features"][0];
    assert_eq!(feature["geometry"]["type"], "MultiLineString");
    assert_eq!(feature["properties"]["name"], "river");
    assert!(feature["properties"].get("x").is_none());
}

#[test]
fn test_convert_degraded_polygons_explode() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("table.json");
    std::fs::write(
        &table,
        r#"{"features": [{"x": [0, 4, 4, null, 8, 9], "y": [0, 0, 4, null, 8, 9]}]}"#,
    )
    .unwrap();

    let skipped = json_data(&run(dir.path(), &["convert", "table.json", "--element", "polygons", "--json"]));
    assert_eq!(skipped["features"].as_array().unwrap().len(), 1);
    assert_eq!(skipped["features"][0]["geometry"]["type"], "Polygon");

    let degraded = json_data(&run(
        dir.path(),
        &["convert", "table.json", "--element", "polygons", "--degrade", "--json"],
    ));
    let features = degraded["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[1]["geometry"]["type"], "LineString");
}

#[test]
fn test_to_array_marks_sentinels() {
    let dir = TempDir::new().unwrap();
    let geometry = dir.path().join("lines.geojson");
    std::fs::write(
        &geometry,
        r#"{"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]}"#,
    )
    .unwrap();

    let data = json_data(&run(dir.path(), &["to-array", "lines.geojson", "--json"]));
    let rows = data["rows"].as_array().unwrap();

    assert_eq!(rows.len(), 5);
    assert!(rows[2].is_null());
    assert_eq!(rows[3], serde_json::json!([2.0, 2.0]));
}

#[test]
fn test_config_reports_sources() {
    let dir = TempDir::new().unwrap();
    let data = json_data(&run(dir.path(), &["config", "--json"]));
    assert_eq!(data["tolerance"]["source"], "Default");

    std::fs::write(dir.path().join("geoviz.toml"), "wrap_samples = 500\n").unwrap();
    let data = json_data(&run(dir.path(), &["config", "--json"]));
    assert_eq!(data["wrap_samples"]["value"], "500");
    assert_eq!(data["wrap_samples"]["source"], "File");
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["config", "--config", "absent.toml"]);
    assert!(!output.status.success());
}
