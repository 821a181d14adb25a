//! Command implementations

mod config;
mod convert;
mod extent;
mod parse_proj;
mod to_array;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extent(args) => extent::execute(args, config_path, &output),
        Commands::ParseProj(args) => parse_proj::execute(args, &output),
        Commands::Convert(args) => convert::execute(args, config_path, &output),
        Commands::ToArray(args) => to_array::execute(args, &output),
        Commands::Config => config::execute(config_path, &output),
    }
}
