//! Value tree error types.

use crate::value::Position;

/// Errors that can occur while reading a JSON document.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The document is not well-formed JSON.
    #[error("syntax error at {position}: {detail}")]
    Syntax { position: Position, detail: String },

    /// The document ended in the middle of a value.
    #[error("unexpected end of input at {position}")]
    UnexpectedEnd { position: Position },

    /// I/O error while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    /// Source position of the error, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            TreeError::Syntax { position, .. } | TreeError::UnexpectedEnd { position } => {
                Some(*position)
            }
            TreeError::Io(_) => None,
        }
    }
}

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
