// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments and dispatches
// to these handlers.

use std::path::Path;

use anyhow::{Context, Result};
use speleo_lib::{load_cave, load_cave_resolved, Cave, CaveResolution};

pub mod colors;
pub mod cycles;
pub mod resolve;
pub mod section;
pub mod segments;

/// Load a cave snapshot and rebuild its station network.
pub fn load_snapshot(path: &Path) -> Result<Cave> {
    load_cave(path).with_context(|| snapshot_context(path))
}

/// Load a cave snapshot, keeping the per-survey rebuild outcome.
pub fn load_resolved_snapshot(path: &Path) -> Result<(Cave, CaveResolution)> {
    load_cave_resolved(path).with_context(|| snapshot_context(path))
}

fn snapshot_context(path: &Path) -> String {
    format!("failed to load cave snapshot from {}", path.display())
}
