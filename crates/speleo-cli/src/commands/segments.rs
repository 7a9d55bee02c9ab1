//! Segments command handler: flat line buffers for a renderer.

use std::path::Path;

use anyhow::Result;
use speleo_lib::CaveGeometry;

use speleo_cli::output::{format_geometry_text, print_json, OutputFormat};

use super::load_snapshot;

/// Handle the `segments` subcommand.
pub fn handle_segments(cave_path: &Path, format: OutputFormat) -> Result<()> {
    let cave = load_snapshot(cave_path)?;
    let geometry = CaveGeometry::from_cave(&cave);

    match format {
        OutputFormat::Json => print_json(&geometry)?,
        _ => print!("{}", format_geometry_text(&geometry)),
    }
    Ok(())
}
