//! Errors raised while reading document nodes.

use crate::NodeKind;

/// A document did not have the shape a reader asked for.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// A required field is absent (or explicitly `null`).
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// A field is present but holds the wrong kind of node.
    #[error("field `{field}` should be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A node (not addressed by field name) holds the wrong kind of value.
    #[error("expected {expected}, found {found}")]
    UnexpectedKind { expected: NodeKind, found: NodeKind },

    #[error("expected an object, found {found}")]
    NotAnObject { found: NodeKind },

    #[error("expected an array, found {found}")]
    NotAnArray { found: NodeKind },

    /// The document text could not be parsed at all.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },
}
