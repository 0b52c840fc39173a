//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent structural rule violations.
/// These are independent of CLI and configuration concerns.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("node not found in arena: {0:?}")]
    NodeNotFound(NodeId),

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(i64),

    #[error("node {0} is already attached to a parent")]
    AlreadyAttached(i64),

    #[error("invalid outline at line {line}: {message}")]
    InvalidOutline { line: usize, message: String },

    #[error("value {0} declared more than once in outline")]
    DuplicateDeclaration(i64),

    #[error("failed to read outline: {0}")]
    OutlineRead(#[from] std::io::Error),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
