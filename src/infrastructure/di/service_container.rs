//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CopyService, HierarchyService};
use crate::config::Settings;
use crate::infrastructure::snapshot::Snapshot;
use crate::infrastructure::traits::{
    CollectionStore, DocumentStore, MemoryCollectionStore, MemoryDocumentStore,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Document store
    pub documents: Arc<dyn DocumentStore>,

    /// Collection store for hierarchical records
    pub collections: Arc<dyn CollectionStore>,
}

impl ServiceContainer {
    /// Create a container backed by in-memory stores filled from a snapshot.
    pub fn from_snapshot(settings: Settings, snapshot: Snapshot) -> Self {
        Self::with_deps(
            settings,
            Arc::new(MemoryDocumentStore::new(snapshot.documents)),
            Arc::new(MemoryCollectionStore::new(snapshot.records)),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        documents: Arc<dyn DocumentStore>,
        collections: Arc<dyn CollectionStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            documents,
            collections,
        }
    }

    pub fn copy_service(&self) -> CopyService {
        CopyService::new(
            self.documents.clone(),
            self.settings.org_abbreviation.clone(),
        )
    }

    pub fn hierarchy_service(&self) -> HierarchyService {
        HierarchyService::new(
            self.collections.clone(),
            self.settings.root_label.clone(),
            self.settings.path_separator.clone(),
        )
    }
}
