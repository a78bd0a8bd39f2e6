//! Error types for account operations.

use thiserror::Error;

use crate::forms::ValidationError;
use crate::framework::{CacheError, TransportError, WriteFailure};

/// Errors that can occur while listing or changing accounts.
///
/// `Display` is the detail quoted after an alert prefix: the server's body
/// for a rejected write.
#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    /// The form is incomplete; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a status other than the one expected.
    #[error("{body}")]
    Rejected { status: u16, body: String },

    /// No response came back.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The resource cache is gone.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<WriteFailure> for AccountError {
    fn from(failure: WriteFailure) -> Self {
        match failure {
            WriteFailure::Rejected { status, body } => AccountError::Rejected { status, body },
            WriteFailure::Transport(e) => AccountError::Transport(e),
        }
    }
}
