//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on store boundary traits (DocumentStore, CollectionStore)
//! but are themselves concrete structs, not traits.

mod copy;
mod hierarchy;

pub use copy::{CopyRequest, CopyService};
pub use hierarchy::HierarchyService;
