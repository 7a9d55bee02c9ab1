//! Cycles command handler: lists the independent loops of a cave.

use std::path::Path;

use anyhow::{Context, Result};
use speleo_lib::{build_graph, get_cycles, CycleSummary, Error as LibError};

use speleo_cli::output::{format_cycles_enhanced, print_json, OutputFormat};
use speleo_cli::terminal::ColorPalette;

use super::load_snapshot;

/// Handle the `cycles` subcommand.
///
/// A cave without any centerline shot has no loops; that is reported as an
/// empty list rather than an error.
pub fn handle_cycles(cave_path: &Path, format: OutputFormat) -> Result<()> {
    let cave = load_snapshot(cave_path)?;
    let graph = build_graph(&cave).context("failed to build the survey graph")?;
    let cycles = match get_cycles(&graph) {
        Ok(cycles) => cycles,
        Err(LibError::EmptyGraph) => Vec::new(),
        Err(err) => return Err(err).context("failed to enumerate loops"),
    };
    let summary = CycleSummary::new(&cave, cycles);

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Enhanced => {
            print!("{}", format_cycles_enhanced(&summary, &ColorPalette::detect()))
        }
        OutputFormat::Text | OutputFormat::Rich => {
            print!("{}", summary.render(format.render_mode()))
        }
    }
    Ok(())
}
