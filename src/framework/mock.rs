//! # Mock Transport
//!
//! Utilities for testing views and the cache without a live API.
//!
//! Register expectations with [`MockTransport::expect`] (or
//! [`expect_get`](MockTransport::expect_get)), hand the mock to the code under
//! test as an `Arc<dyn Transport>`, then call [`MockTransport::verify`].
//!
//! ```ignore
//! let mock = MockTransport::new();
//! mock.expect_get("http://api/accounts").return_json(200, json!([]));
//! mock.expect(HttpMethod::Delete, "http://api/account/42").return_text(204, "");
//!
//! let dashboard = Dashboard::with_transport(&config, Arc::new(mock.clone()));
//! // Drive views...
//! mock.verify(); // Ensures all expectations were met
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::transport::{ApiRequest, ApiResponse, HttpMethod, Transport, TransportError};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Reply {
    Respond(ApiResponse),
    Fail(TransportError),
}

/// One expected request and the reply to give it.
struct Expectation {
    method: HttpMethod,
    url: String,
    gate: Option<Arc<Notify>>,
    reply: Reply,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<ApiRequest>,
    unexpected: Vec<ApiRequest>,
}

/// A transport that answers from a list of expectations.
///
/// Requests are matched by method and URL, first registered first served, so
/// fetches for unrelated keys may complete in any order. An unmatched request
/// gets a [`TransportError`] and is reported by [`verify`](Self::verify).
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn expect(&self, method: HttpMethod, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            gate: None,
            state: self.state.clone(),
        }
    }

    pub fn expect_get(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Get, url)
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, method: HttpMethod, url: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.url))
                .collect();
            panic!("Not all expectations were met. Remaining: {:?}", remaining);
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let matched = {
            let mut state = self.lock();
            state.calls.push(request.clone());
            let position = state
                .expectations
                .iter()
                .position(|e| e.method == request.method && e.url == request.url);
            match position.and_then(|i| state.expectations.remove(i)) {
                Some(expectation) => expectation,
                None => {
                    state.unexpected.push(request.clone());
                    return Err(TransportError::Request(format!(
                        "unexpected request {} {}",
                        request.method, request.url
                    )));
                }
            }
        };

        if let Some(gate) = matched.gate {
            gate.notified().await;
        }
        match matched.reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(e) => Err(e),
        }
    }
}

/// Builder returned by [`MockTransport::expect`].
pub struct ExpectationBuilder {
    method: HttpMethod,
    url: String,
    gate: Option<Arc<Notify>>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Holds the reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn return_json(self, status: u16, body: Value) {
        self.push(Reply::Respond(ApiResponse::new(status, body.to_string())));
    }

    pub fn return_text(self, status: u16, body: &str) {
        self.push(Reply::Respond(ApiResponse::new(status, body)));
    }

    pub fn return_err(self, error: TransportError) {
        self.push(Reply::Fail(error));
    }

    fn push(self, reply: Reply) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.expectations.push_back(Expectation {
            method: self.method,
            url: self.url,
            gate: self.gate,
            reply,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_with_expectations() {
        let mock = MockTransport::new();
        mock.expect_get("http://api/networks").return_json(200, json!([]));
        mock.expect(HttpMethod::Delete, "http://api/network/7").return_text(204, "");

        let listing = mock.send(ApiRequest::get("http://api/networks")).await.unwrap();
        assert_eq!(listing.body, "[]");

        let deleted = mock
            .send(ApiRequest {
                method: HttpMethod::Delete,
                url: "http://api/network/7".into(),
                body: None,
            })
            .await
            .unwrap();
        assert_eq!(deleted.status, 204);

        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_is_an_error() {
        let mock = MockTransport::new();
        let result = mock.send(ApiRequest::get("http://api/nodes")).await;
        assert!(result.is_err());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_leftovers() {
        let mock = MockTransport::new();
        mock.expect_get("http://api/accounts").return_json(200, json!([]));
        mock.verify();
    }
}
