//! Infrastructure layer: store implementations and DI container
//!
//! This layer implements store boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod snapshot;
pub mod traits;

pub use error::{InfraError, InfraResult};
