//! Error types for document tree navigation, mutation, and pointer editing.

use thiserror::Error;

use crate::types::Kind;

/// Errors that can occur while reading, navigating, or mutating a document tree.
///
/// All of these are local and synchronous: they are returned at the call site
/// that detected them and nothing is retried.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The input text was not valid JSON, or a typed structure could not be
    /// converted to or from the tree.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An object view was asked for a field it does not have.
    #[error("field `{name}` not found")]
    FieldNotFound { name: String },

    /// An array view or array pointer segment addressed past the end.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A typed getter or view constructor met a node of another variant.
    #[error("type mismatch at {at}: expected {expected}, found {found}")]
    TypeMismatch {
        at: String,
        expected: Kind,
        found: Kind,
    },

    /// A number was present but does not fit the requested integer width.
    #[error("number {value} at {at} does not fit the requested integer type")]
    NumberOutOfRange { at: String, value: String },

    /// A pointer was malformed, its parent path did not resolve to a
    /// container, or its last segment was not a valid array index.
    #[error("invalid pointer `{pointer}`: {reason}")]
    InvalidPointer { pointer: String, reason: String },

    /// A node claimed both an object parent and an array parent.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Reading or writing a descriptor file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    pub(crate) fn invalid_pointer(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        TreeError::InvalidPointer {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout doctree-core.
pub type Result<T> = std::result::Result<T, TreeError>;
