//! JSON export persistence for harvested records.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::models::{AcceptedRecord, WorkshopRecord};

/// Writes harvested record sets as JSON arrays under a data directory.
pub struct ExportStore {
    root: PathBuf,
}

impl ExportStore {
    /// Create a new store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the accepted-with-ratings export for the main venue.
    pub fn write_main(&self, label: &str, records: &[AcceptedRecord]) -> Result<PathBuf> {
        let path = self.root.join(format!("{label}_main_accepted_ratings.json"));
        self.write_records(&path, records)?;
        Ok(path)
    }

    /// Write one workshop export; an empty record set produces no file.
    pub fn write_workshop(
        &self,
        label: &str,
        venue_id: &str,
        records: &[WorkshopRecord],
    ) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            info!("no submissions for {venue_id}, skipping file");
            return Ok(None);
        }
        let name = workshop_name(venue_id);
        let path = self.root.join(format!("{label}_workshop_{name}.json"));
        self.write_records(&path, records)?;
        Ok(Some(path))
    }

    fn write_records<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised = serde_json::to_vec_pretty(records).context("failed to serialise records")?;
        fs::write(path, serialised).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Final path segment of a venue id, used in workshop file names.
pub fn workshop_name(venue_id: &str) -> &str {
    venue_id.rsplit('/').next().unwrap_or(venue_id)
}
