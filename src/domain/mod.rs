//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod lineage;
pub mod tree;

pub use builder::{build_tree, validate_reparent, TreeBuilder};
pub use entities::*;
pub use error::{BlockReason, DomainError, DomainResult};
pub use lineage::{
    authorize_code, authorized_copy_kinds, copy_symbol, lineage_root, validate_copy_request,
    AuthorizedKinds, CopyKind,
};
pub use tree::{Hierarchical, NodeData, TreeNode};
