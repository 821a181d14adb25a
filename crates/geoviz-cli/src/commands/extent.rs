//! Extent command implementation

use crate::cli::ExtentArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use geoviz_core::config::CliConfigOverrides;
use geoviz_core::models::{BoundingBox, Projection};
use geoviz_geo::{process_crs, project_extents, CrsInput};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExtentOutput {
    src: Projection,
    dest: Projection,
    input: BoundingBox,
    bounds: BoundingBox,
}

pub fn execute(args: ExtentArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let overrides = CliConfigOverrides {
        tolerance: args.tolerance,
        wrap_samples: args.wrap_samples,
        ..Default::default()
    };
    let config = load_config_with_overrides(config_path, overrides)?;

    let src_text = args.src.unwrap_or_else(|| config.default_crs.value.clone());
    let dest_text = args.dest.unwrap_or_else(|| config.default_crs.value.clone());
    let src = process_crs(CrsInput::from(src_text.as_str()))?;
    let dest = process_crs(CrsInput::from(dest_text.as_str()))?;

    let input = BoundingBox::new(args.min_x, args.min_y, args.max_x, args.max_y);
    tracing::debug!("Projecting {} from {} to {}", input, src.name(), dest.name());
    let bounds = project_extents(input, &src, &dest, &config.extent_options())
        .with_context(|| format!("Failed to reproject extent {}", input))?;

    if output.is_json() {
        output.result(ExtentOutput { src, dest, input, bounds })?;
    } else {
        output.section("Extent");
        output.kv("Source", format!("{} ({})", src.name(), src_text));
        output.kv("Destination", format!("{} ({})", dest.name(), dest_text));
        output.kv("Input", input);
        output.kv("Bounds", bounds);
        output.kv("Width", bounds.width());
        output.kv("Height", bounds.height());
    }

    Ok(())
}
