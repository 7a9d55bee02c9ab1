//! Section command handler: shortest connecting path between two stations.

use std::path::Path;

use anyhow::{Context, Result};
use speleo_lib::{build_graph, get_section, SectionSummary};

use speleo_cli::output::{print_json, OutputFormat};

use super::load_snapshot;

/// Handle the `section` subcommand.
pub fn handle_section(cave_path: &Path, from: &str, to: &str, format: OutputFormat) -> Result<()> {
    let cave = load_snapshot(cave_path)?;
    let graph = build_graph(&cave).context("failed to build the survey graph")?;
    let section = get_section(&graph, from, to)
        .with_context(|| format!("failed to compute section from {from} to {to}"))?;
    let summary = SectionSummary::from_section(&section, &cave);

    match format {
        OutputFormat::Json => print_json(&summary)?,
        _ => print!("{}", summary.render(format.render_mode())),
    }
    Ok(())
}
