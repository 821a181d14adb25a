//! To-array command implementation

use crate::cli::ToArrayArgs;
use crate::input::read_geometry;
use crate::output::OutputWriter;
use anyhow::Result;
use geoviz_geo::{geom_to_array, is_sentinel};
use tabled::Tabled;

#[derive(Tabled)]
struct RowDisplay {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "X")]
    x: String,
    #[tabled(rename = "Y")]
    y: String,
}

pub fn execute(args: ToArrayArgs, output: &OutputWriter) -> Result<()> {
    let geometry = read_geometry(&args.path)?;
    let rows = geom_to_array(&geometry);
    tracing::debug!("Recovered {} rows from {}", rows.len(), geometry.kind().as_str());

    if output.is_json() {
        // Sentinel rows are encoded as null
        let rows: Vec<Option<[f64; 2]>> =
            rows.iter().map(|row| (!is_sentinel(row)).then_some(*row)).collect();
        return output.result(serde_json::json!({
            "geometry_type": geometry.kind().as_str(),
            "rows": rows,
        }));
    }

    let display: Vec<RowDisplay> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| RowDisplay { index, x: row[0].to_string(), y: row[1].to_string() })
        .collect();
    output.table(display);
    Ok(())
}
