//! Resolve command handler: rebuilds the station network and reports it.

use std::path::Path;

use anyhow::Result;
use speleo_lib::ResolutionReport;

use speleo_cli::output::{format_resolution_enhanced, print_json, OutputFormat};
use speleo_cli::terminal::ColorPalette;

use super::load_resolved_snapshot;

/// Handle the `resolve` subcommand.
///
/// Orphaned shots and isolated surveys are reported, not treated as failures.
pub fn handle_resolve(cave_path: &Path, include_splays: bool, format: OutputFormat) -> Result<()> {
    let (cave, resolution) = load_resolved_snapshot(cave_path)?;
    let report = ResolutionReport::from_cave(&cave, &resolution, include_splays);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Enhanced => {
            print!("{}", format_resolution_enhanced(&report, &ColorPalette::detect()))
        }
        OutputFormat::Text | OutputFormat::Rich => {
            print!("{}", report.render(format.render_mode()))
        }
    }
    Ok(())
}
