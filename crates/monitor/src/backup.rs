//! Emergency backups of the monitored tables.

use std::{fs, io, io::Write, path::PathBuf};

use thiserror::Error;

use crate::store::DatabaseDump;

#[derive(Debug, Error)]
pub(crate) enum BackupWriteError {
    #[error("failed to serialize backup: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write backup file: {0}")]
    Io(#[from] io::Error),
}

/// Writes one timestamped backup file per sent alert. Files are created
/// with `create_new`, so an existing backup is never overwritten.
#[derive(Debug, Clone)]
pub(crate) struct BackupWriter {
    dir: PathBuf,
}

impl BackupWriter {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn write(&self, id: u64, dump: &DatabaseDump) -> Result<PathBuf, BackupWriteError> {
        fs::create_dir_all(&self.dir)?;

        let stamp = dump.generated_at.strftime("%Y%m%dT%H%M%SZ");
        let path = self.dir.join(format!("emergency-backup-{id}-{stamp}.json"));

        let mut file = fs::File::create_new(&path)?;

        file.write_all(&serde_json::to_vec_pretty(dump)?)?;

        Ok(path)
    }
}
