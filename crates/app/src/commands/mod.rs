//! Subcommands and the file loading they share.

pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use growth_config::SimulationConfig;
use halfedge::IndexedMesh;

/// Read an `IndexedMesh` from a JSON file.
pub fn load_mesh(path: &Path) -> Result<IndexedMesh> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read mesh file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse mesh file {}", path.display()))
}

/// Load a configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("invalid configuration {}", path.display())),
        None => Ok(SimulationConfig::default()),
    }
}
