//! TOML snapshot of documents and collection records for the CLI.
//!
//! ```toml
//! [[documents]]
//! id = "qd-12"
//! title = "Decision 12"
//! copy_kind = "original"
//!
//! [[records]]
//! id = "school"
//! sort_key = 1
//! label = "School"
//!
//! [[records]]
//! id = "album"
//! parent_id = "school"
//! label = "ALBUM"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{CopyLineageRecord, HierarchicalRecord};
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub documents: Vec<CopyLineageRecord>,
    #[serde(default)]
    pub records: Vec<HierarchicalRecord>,
}

impl Snapshot {
    pub fn load(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let snapshot = Self::parse(&content).map_err(|message| InfraError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(
            "loaded snapshot {}: {} documents, {} records",
            path.display(),
            snapshot.documents.len(),
            snapshot.records.len()
        );
        Ok(snapshot)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
