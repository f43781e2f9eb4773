//! JSON snapshots of the planning state.
//!
//! A snapshot captures the whole store plus the fleet pool in one file so a
//! planning session can be picked up later. This is a convenience, not a
//! durability guarantee; the engine itself stays purely in-memory.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::info;

use crate::domain::fleet::FleetPool;
use crate::domain::store::PlanningStore;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub store: PlanningStore,
    pub fleet: FleetPool,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

pub fn save_snapshot(path: &Path, snapshot: &PlanningSnapshot) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "saved planning snapshot");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<PlanningSnapshot, PersistError> {
    let data = fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&data)?;
    info!(path = %path.display(), "loaded planning snapshot");
    Ok(snapshot)
}
