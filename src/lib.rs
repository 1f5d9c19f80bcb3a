//! Document copy lineage rules and flat-to-tree materialization.
//!
//! - [`domain::lineage`] decides which copies a document may produce.
//! - [`domain::builder`] turns parent-linked records into an ordered tree.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
