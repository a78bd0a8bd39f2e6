//! Write side of the data-access layer.
//!
//! A [`MutationHandle`] is bound to one endpoint and one HTTP method. It never
//! decides whether a response means success: endpoints answer 200, 201 or 204
//! depending on the operation, and the calling view checks the code it expects
//! with [`expect_status`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use super::transport::{ApiRequest, ApiResponse, HttpMethod, Transport, TransportError};

/// Argument passed to [`MutationHandle::trigger`].
#[derive(Debug, Clone, PartialEq)]
pub enum MutationArg {
    /// Sent as the JSON request body to the bound endpoint.
    Body(Value),
    /// Appended verbatim to the bound endpoint, e.g. `42` or `42/session`.
    Path(String),
    Empty,
}

impl MutationArg {
    pub fn body<B: Serialize>(body: &B) -> Result<Self, TransportError> {
        serde_json::to_value(body)
            .map(MutationArg::Body)
            .map_err(|e| TransportError::Encode(e.to_string()))
    }

    pub fn path(suffix: impl ToString) -> Self {
        MutationArg::Path(suffix.to_string())
    }
}

/// Observable state of a handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub is_mutating: bool,
    pub error: Option<TransportError>,
    pub last_status: Option<u16>,
}

#[derive(Clone)]
pub struct MutationHandle {
    transport: Arc<dyn Transport>,
    endpoint: String,
    method: HttpMethod,
    state: Arc<watch::Sender<MutationState>>,
}

impl MutationHandle {
    pub(crate) fn new(transport: Arc<dyn Transport>, endpoint: String, method: HttpMethod) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        Self {
            transport,
            endpoint,
            method,
            state: Arc::new(state),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_mutating(&self) -> bool {
        self.state.borrow().is_mutating
    }

    pub fn error(&self) -> Option<TransportError> {
        self.state.borrow().error.clone()
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    /// Sends the request and hands back the raw response.
    ///
    /// Does not queue: a second trigger while one is in flight goes out
    /// immediately. Views disable their buttons on [`is_mutating`](Self::is_mutating).
    #[instrument(skip(self, arg), fields(method = %self.method, endpoint = %self.endpoint))]
    pub async fn trigger(&self, arg: MutationArg) -> Result<ApiResponse, TransportError> {
        let (url, body) = match arg {
            MutationArg::Body(body) => (self.endpoint.clone(), Some(body)),
            MutationArg::Path(suffix) => (format!("{}{}", self.endpoint, suffix), None),
            MutationArg::Empty => (self.endpoint.clone(), None),
        };
        debug!(%url, "Sending request");

        self.state.send_modify(|state| {
            state.is_mutating = true;
            state.error = None;
        });
        let result = self
            .transport
            .send(ApiRequest {
                method: self.method,
                url,
                body,
            })
            .await;
        self.state.send_modify(|state| {
            state.is_mutating = false;
            match &result {
                Ok(response) => state.last_status = Some(response.status),
                Err(e) => state.error = Some(e.clone()),
            }
        });

        match &result {
            Ok(response) => debug!(status = response.status, "Response"),
            Err(e) => warn!(error = %e, "Request failed"),
        }
        result
    }
}

/// Why a write did not produce the endpoint's success code.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum WriteFailure {
    #[error("{body}")]
    Rejected { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl WriteFailure {
    /// Text quoted in the error alert: the response body, or the transport
    /// error when there was no response.
    pub fn detail(&self) -> String {
        match self {
            WriteFailure::Rejected { body, .. } => body.clone(),
            WriteFailure::Transport(e) => e.to_string(),
        }
    }
}

/// Accepts exactly `expected`; anything else is a [`WriteFailure`].
pub fn expect_status(
    result: Result<ApiResponse, TransportError>,
    expected: u16,
) -> Result<ApiResponse, WriteFailure> {
    let response = result?;
    if response.status == expected {
        Ok(response)
    } else {
        Err(WriteFailure::Rejected {
            status: response.status,
            body: response.body,
        })
    }
}
