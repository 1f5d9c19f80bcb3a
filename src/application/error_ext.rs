//! Error conversion helpers for store operations
//!
//! Provides an extension trait for cleaner error handling with record context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add record context to a store error.
    ///
    /// # Example
    /// ```ignore
    /// documents.get(&id)
    ///     .with_context("load document", &id)?;
    /// ```
    fn with_context(self, action: &str, id: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: &str, id: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, id),
            source: Box::new(e),
        })
    }
}
