//! Snapshot files on disk
//!
//! Saves are pretty-printed JSON so they stay diffable and hand-editable.
//! Loading only parses and validates; feeding the result into a running game
//! is the caller's call (`Game::set_state`).

use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::sim::snapshot::{Snapshot, SnapshotError};
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save file failed validation: {0}")]
    Snapshot(#[from] SnapshotError),
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    info!("saved game to {}", path.display());
    Ok(())
}

/// Read and validate a save file. Nothing about the running game changes
/// here; a bad file is reported without side effects.
pub fn load_snapshot(path: &Path, tuning: &Tuning) -> Result<Snapshot, PersistError> {
    let json = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&json)?;
    snapshot.validate(tuning)?;
    info!("loaded game from {}", path.display());
    Ok(snapshot)
}
