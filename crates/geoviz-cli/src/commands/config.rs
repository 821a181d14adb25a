//! Config command implementation

use crate::config_loader::{config_path, load_config};
use crate::output::OutputWriter;
use anyhow::Result;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(explicit: Option<&std::path::Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(explicit)?;
    let mut entries: Vec<_> = config.to_inspection_map().into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    if output.is_json() {
        let values: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(key, (value, source))| {
                (key, serde_json::json!({ "value": value, "source": source }))
            })
            .collect();
        return output.result(values);
    }

    match config_path(explicit) {
        Some(path) => output.kv("Config file", path.display()),
        None => output.kv("Config file", "(none)"),
    }
    let rows: Vec<ConfigRow> = entries
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();
    output.table(rows);
    Ok(())
}
