//! Parse-proj command implementation

use crate::cli::ParseProjArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geoviz_geo::{parse_proj4, ProjValue};
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Tabled)]
struct ParameterRow {
    #[tabled(rename = "Group")]
    group: &'static str,
    #[tabled(rename = "Keyword")]
    keyword: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn execute(args: ParseProjArgs, output: &OutputWriter) -> Result<()> {
    let parsed = parse_proj4(&args.proj4);
    let projection = parsed.build()?;

    if output.is_json() {
        output.result(serde_json::json!({
            "projection": projection,
            "parameters": group_json(&parsed.projection),
            "globe": group_json(&parsed.globe),
            "standard_parallels": group_json(&parsed.standard_parallels),
            "proj4": projection.to_proj4(),
        }))?;
        return Ok(());
    }

    output.section("Projection");
    output.kv("Kind", projection.name());
    output.kv("PROJ definition", projection.to_proj4());

    output.section("Parameters");
    let rows: Vec<ParameterRow> = [
        ("projection", &parsed.projection),
        ("globe", &parsed.globe),
        ("parallels", &parsed.standard_parallels),
    ]
    .into_iter()
    .flat_map(|(group, values)| {
        values.iter().map(move |(keyword, value)| ParameterRow {
            group,
            keyword: *keyword,
            value: value.to_string(),
        })
    })
    .collect();
    output.table(rows);

    Ok(())
}

fn group_json(group: &BTreeMap<&'static str, ProjValue>) -> serde_json::Value {
    group
        .iter()
        .map(|(keyword, value)| {
            let value = match value.as_number() {
                Some(n) => serde_json::json!(n),
                None => serde_json::json!(value.to_string()),
            };
            (keyword.to_string(), value)
        })
        .collect::<serde_json::Map<_, _>>()
        .into()
}
