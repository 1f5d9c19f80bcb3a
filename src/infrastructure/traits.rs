//! Store boundary traits for testability
//!
//! These traits abstract the external document and collection stores,
//! allowing services to be tested with in-memory implementations.

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, RwLock};

use chrono::Datelike;

use crate::domain::{CopyLineageRecord, HierarchicalRecord};

/// Document store abstraction.
pub trait DocumentStore: Send + Sync {
    /// Look up a document by id.
    fn get(&self, id: &str) -> io::Result<Option<CopyLineageRecord>>;

    /// Allocate the next copy number for `year`.
    ///
    /// Numbers are shared by all copy kinds and restart at 1 every year.
    /// Two calls never return the same number for the same year.
    fn next_copy_number(&self, year: i32) -> io::Result<u32>;

    /// Persist a new document. Fails if the id is taken.
    fn insert(&self, record: CopyLineageRecord) -> io::Result<()>;

    /// Allocate the next copy number for `year`, build the copy from it and
    /// persist it as one step. A failed insert leaves the number unused, so
    /// the yearly sequence has no gaps.
    fn insert_copy(
        &self,
        year: i32,
        build: &dyn Fn(u32) -> CopyLineageRecord,
    ) -> io::Result<CopyLineageRecord>;

    /// All copies whose lineage root is `original_id`.
    fn copies_of(&self, original_id: &str) -> io::Result<Vec<CopyLineageRecord>>;
}

/// Collection store abstraction for parent-linked records.
pub trait CollectionStore: Send + Sync {
    /// Full flat snapshot of the collection.
    fn snapshot(&self) -> io::Result<Vec<HierarchicalRecord>>;
}

// ============================================================
// IN-MEMORY IMPLEMENTATIONS
// ============================================================

fn poisoned() -> io::Error {
    io::Error::other("store lock poisoned")
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<CopyLineageRecord>>,
    copy_numbers: Mutex<HashMap<i32, u32>>,
}

impl MemoryDocumentStore {
    pub fn new(documents: Vec<CopyLineageRecord>) -> Self {
        Self {
            documents: RwLock::new(documents),
            copy_numbers: Mutex::new(HashMap::new()),
        }
    }

    /// Last number handed out for `year`, seeded from stored copies.
    fn current_copy_number(&self, allocated: &HashMap<i32, u32>, year: i32) -> io::Result<u32> {
        match allocated.get(&year) {
            Some(n) => Ok(*n),
            None => self.highest_copy_number(year),
        }
    }

    fn highest_copy_number(&self, year: i32) -> io::Result<u32> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents
            .iter()
            .filter_map(|d| d.copy.as_ref())
            .filter(|c| c.copy_date.year() == year)
            .map(|c| c.copy_number)
            .max()
            .unwrap_or(0))
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self, id: &str) -> io::Result<Option<CopyLineageRecord>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    fn next_copy_number(&self, year: i32) -> io::Result<u32> {
        let mut copy_numbers = self.copy_numbers.lock().map_err(|_| poisoned())?;
        let next = self.current_copy_number(&copy_numbers, year)? + 1;
        copy_numbers.insert(year, next);
        Ok(next)
    }

    fn insert(&self, record: CopyLineageRecord) -> io::Result<()> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        if documents.iter().any(|d| d.id == record.id) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("document id already exists: {}", record.id),
            ));
        }
        documents.push(record);
        Ok(())
    }

    fn insert_copy(
        &self,
        year: i32,
        build: &dyn Fn(u32) -> CopyLineageRecord,
    ) -> io::Result<CopyLineageRecord> {
        // Held across the insert so no other copy can take the same number
        let mut copy_numbers = self.copy_numbers.lock().map_err(|_| poisoned())?;
        let next = self.current_copy_number(&copy_numbers, year)? + 1;
        let record = build(next);
        self.insert(record.clone())?;
        copy_numbers.insert(year, next);
        Ok(record)
    }

    fn copies_of(&self, original_id: &str) -> io::Result<Vec<CopyLineageRecord>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents
            .iter()
            .filter(|d| d.copy_kind.is_copy() && d.original_id.as_deref() == Some(original_id))
            .cloned()
            .collect())
    }
}

/// In-memory collection store.
#[derive(Debug, Default)]
pub struct MemoryCollectionStore {
    records: RwLock<Vec<HierarchicalRecord>>,
}

impl MemoryCollectionStore {
    pub fn new(records: Vec<HierarchicalRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replace the whole collection.
    pub fn replace(&self, records: Vec<HierarchicalRecord>) -> io::Result<()> {
        *self.records.write().map_err(|_| poisoned())? = records;
        Ok(())
    }
}

impl CollectionStore for MemoryCollectionStore {
    fn snapshot(&self) -> io::Result<Vec<HierarchicalRecord>> {
        Ok(self.records.read().map_err(|_| poisoned())?.clone())
    }
}
