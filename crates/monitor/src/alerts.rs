//! Alert payloads and the single-alert file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::health::{AlertKind, CollectionCounts, CollectionDeltas, HealthFloors};

#[derive(Debug, Error)]
pub(crate) enum AlertWriteError {
    #[error("failed to serialize alert: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write alerts file: {0}")]
    Io(#[from] io::Error),
}

/// A sent alert. `kind` is the highest-priority firing condition; every
/// firing condition rides along in `conditions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Alert {
    pub id: u64,
    pub at: Timestamp,
    pub kind: AlertKind,
    pub conditions: Vec<AlertKind>,
    pub counts: CollectionCounts,
    pub deltas: CollectionDeltas,
    pub floors: HealthFloors,
    pub acknowledged: bool,
}

/// Writes the latest alert to a fixed path, replacing whatever was there.
#[derive(Debug, Clone)]
pub(crate) struct AlertWriter {
    path: PathBuf,
}

impl AlertWriter {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn write(&self, alert: &Alert) -> Result<(), AlertWriteError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_vec_pretty(alert)?)?;

        Ok(())
    }
}
