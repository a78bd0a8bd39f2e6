//! Error types for network operations.

use thiserror::Error;

use crate::forms::ValidationError;
use crate::framework::{CacheError, TransportError, WriteFailure};

#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<WriteFailure> for NetworkError {
    fn from(failure: WriteFailure) -> Self {
        match failure {
            WriteFailure::Rejected { status, body } => NetworkError::Rejected { status, body },
            WriteFailure::Transport(e) => NetworkError::Transport(e),
        }
    }
}
