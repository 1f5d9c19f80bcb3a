//! Hierarchy service
//!
//! Builds the album / category tree from the collection store snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{validate_reparent, HierarchicalRecord, TreeBuilder, TreeNode};
use crate::infrastructure::traits::CollectionStore;

/// Service for materializing the collection hierarchy.
pub struct HierarchyService {
    collections: Arc<dyn CollectionStore>,
    builder: TreeBuilder,
    path_separator: String,
}

impl HierarchyService {
    pub fn new(
        collections: Arc<dyn CollectionStore>,
        root_label: impl Into<String>,
        path_separator: impl Into<String>,
    ) -> Self {
        Self {
            collections,
            builder: TreeBuilder::new(root_label),
            path_separator: path_separator.into(),
        }
    }

    /// Build the full tree from a fresh snapshot.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self) -> ApplicationResult<TreeNode<HierarchicalRecord>> {
        let records = self
            .collections
            .snapshot()
            .with_context("read collection", "snapshot")?;
        debug!("tree: {} records in snapshot", records.len());
        Ok(self.builder.build(&records)?)
    }

    /// Full label path per record id.
    pub fn paths(&self) -> ApplicationResult<BTreeMap<String, String>> {
        Ok(self.tree()?.materialized_paths(&self.path_separator))
    }

    /// Check that moving `id` under `new_parent` keeps the hierarchy acyclic.
    #[instrument(level = "debug", skip(self))]
    pub fn validate_move(&self, id: &str, new_parent: Option<&str>) -> ApplicationResult<()> {
        let records = self
            .collections
            .snapshot()
            .with_context("read collection", id)?;
        Ok(validate_reparent(&records, id, new_parent)?)
    }
}
