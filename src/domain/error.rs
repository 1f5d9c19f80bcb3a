//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Rule that stops a document from being copied any further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// Registered copies may only be made from certified true copies, and
    /// neither a registered copy nor an extract may be copied again.
    TerminalCopy,
    /// The recorded copy kind is not one this crate knows about.
    UnknownKind,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::TerminalCopy => write!(
                f,
                "registered copies and extracts cannot be copied; registered copies are made from certified true copies only"
            ),
            BlockReason::UnknownKind => write!(f, "unrecognised copy kind"),
        }
    }
}

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("copying from a '{kind}' document is blocked: {reason}")]
    Blocked { kind: String, reason: BlockReason },

    #[error("a '{requested}' copy cannot be made from a '{kind}' document")]
    KindNotPermitted { kind: String, requested: String },

    #[error("a '{kind}' copy requires a non-empty {field}")]
    MissingRequiredField { kind: String, field: &'static str },

    #[error("cycle detected in hierarchy at record: {id}")]
    CyclicHierarchy { id: String },

    #[error("duplicate record id in hierarchy: {id}")]
    DuplicateId { id: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
