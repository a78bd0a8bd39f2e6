//! Error types for node operations.

use thiserror::Error;

use crate::forms::ValidationError;
use crate::framework::{CacheError, TransportError, WriteFailure};

#[derive(Debug, Error, PartialEq)]
pub enum NodeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The scope segment was neither `all` nor a network id.
    #[error("Unknown node scope: {0}")]
    Scope(String),
}

impl From<WriteFailure> for NodeError {
    fn from(failure: WriteFailure) -> Self {
        match failure {
            WriteFailure::Rejected { status, body } => NodeError::Rejected { status, body },
            WriteFailure::Transport(e) => NodeError::Transport(e),
        }
    }
}
