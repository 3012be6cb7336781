//! Export manifest stored alongside the written data files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing the most recent successful export.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportMetadata {
    /// Venue the snapshot was harvested from.
    pub venue_id: Option<String>,
    /// Number of records written.
    pub records: Option<usize>,
    /// ISO8601 timestamp for the snapshot.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExportMetadata {
    /// Stamp a fresh manifest for a completed export.
    pub fn record(venue_id: impl Into<String>, records: usize) -> Self {
        Self {
            venue_id: Some(venue_id.into()),
            records: Some(records),
            updated_at: Some(Utc::now()),
        }
    }

    /// Load metadata from the given path, returning `None` if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let metadata = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(metadata)
    }

    /// Persist metadata to the given file, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize export metadata")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}

/// Helper to compute the default manifest path inside a data directory.
pub fn manifest_path(data_dir: impl AsRef<Path>) -> PathBuf {
    data_dir.as_ref().join(".openrev-manifest.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_manifest_loads_as_none() -> Result<()> {
        let dir = tempdir()?;
        let loaded = ExportMetadata::load(manifest_path(dir.path()))?;
        assert!(loaded.is_none());
        Ok(())
    }

    #[test]
    fn manifest_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = manifest_path(dir.path().join("data"));

        ExportMetadata::record("ICLR.cc/2025/Conference", 11_672).persist(&path)?;
        let loaded = ExportMetadata::load(&path)?.expect("manifest should exist");
        assert_eq!(loaded.venue_id.as_deref(), Some("ICLR.cc/2025/Conference"));
        assert_eq!(loaded.records, Some(11_672));
        assert!(loaded.updated_at.is_some());
        Ok(())
    }
}
