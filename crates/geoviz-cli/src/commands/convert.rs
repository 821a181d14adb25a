//! Convert command implementation

use crate::cli::{ConvertArgs, Element};
use crate::config_loader::load_config;
use crate::input::read_feature_table;
use crate::output::OutputWriter;
use anyhow::Result;
use geoviz_core::models::{FeatureSource, InvalidRingPolicy};
use geoviz_geo::{path_to_geom_dicts, polygons_to_geom_dicts};
use std::path::Path;

pub fn execute(args: ConvertArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_path)?;
    let table = read_feature_table(&args.path)?;
    let feature_count = table.len();
    let source = FeatureSource::Columnar(table);

    let records = match args.element {
        Element::Path => path_to_geom_dicts(&source)?,
        Element::Polygons => {
            let policy = if args.degrade {
                InvalidRingPolicy::Degrade
            } else {
                config.invalid_ring_policy()
            };
            polygons_to_geom_dicts(&source, policy)?
        }
    };

    let features = records
        .iter()
        .map(|record| record.to_geojson())
        .collect::<geoviz_core::error::Result<Vec<_>>>()?;

    output.info(format!("Converted {} features into {} records", feature_count, features.len()));
    output.result(serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}
