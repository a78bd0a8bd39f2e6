//! # Resource Cache
//!
//! This module defines the read side of the data-access layer.
//!
//! ## Key Types
//!
//! - [`ResourceKey`]: The fully-qualified URL identifying one cached read.
//! - [`ResourceState`]: What a view sees for a key (data, error, validating flag).
//! - [`ResourceCache`]: The actor that owns every cache slot.
//! - [`ResourceClient`]: The cloneable handle views use to read, subscribe and invalidate.
//! - [`Subscription`]: A live view of one key.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::mutation::MutationHandle;
use super::transport::{ApiRequest, HttpMethod, Transport};

// =============================================================================
// 1. KEYS AND STATE
// =============================================================================

/// Identifies one cached read: base URL + path + query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(base: &str, path: &str) -> Self {
        Self(format!("{}{}", base, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceKey {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for ResourceKey {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

/// Why a read has no fresh data.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FetchError {
    /// No response came back.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The session cookie was missing or rejected.
    #[error("Unauthorized")]
    Unauthorized,
    /// The body was not the JSON the caller expected.
    #[error("Parse error: {0}")]
    Decode(String),
}

/// Errors talking to the cache actor itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CacheError {
    #[error("Resource cache closed")]
    ActorClosed,
    #[error("Resource cache dropped response channel")]
    ActorDropped,
}

/// Client-side mirror of one remote resource.
///
/// `data` survives a failed revalidation; `error` describes the latest
/// failure and is cleared by the next success.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
    /// A fetch for this key is in flight.
    pub is_validating: bool,
    pub fetched_at: Option<Instant>,
    pub fetch_count: u64,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_validating: false,
            fetched_at: None,
            fetch_count: 0,
        }
    }
}

impl<T> ResourceState<T> {
    /// Nothing to show yet and a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none() && self.is_validating
    }
}

impl ResourceState<Value> {
    /// Typed view of a raw slot. A body that does not fit `T` becomes a
    /// [`FetchError::Decode`].
    pub fn decode<T: DeserializeOwned>(&self) -> ResourceState<T> {
        let (data, error) = match &self.data {
            Some(value) => match serde_json::from_value::<T>(value.clone()) {
                Ok(typed) => (Some(typed), self.error.clone()),
                Err(e) => (None, Some(FetchError::Decode(e.to_string()))),
            },
            None => (None, self.error.clone()),
        };
        ResourceState {
            data,
            error,
            is_validating: self.is_validating,
            fetched_at: self.fetched_at,
            fetch_count: self.fetch_count,
        }
    }
}

// =============================================================================
// 2. MESSAGES
// =============================================================================

/// One-shot reply channel used by the cache actor.
pub type Response<T> = oneshot::Sender<T>;

/// What an `invalidate` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The key was never read. Nothing happened.
    Unknown,
    /// Marked stale; the next read refetches.
    MarkedStale,
    /// A refetch started for the current subscribers.
    Refetching,
    /// A fetch was already in flight; one more follows it.
    Queued,
}

/// Messages processed by [`ResourceCache`].
#[derive(Debug)]
pub enum CacheRequest {
    Read {
        key: ResourceKey,
        respond_to: Response<ResourceState<Value>>,
    },
    Subscribe {
        key: ResourceKey,
        respond_to: Response<watch::Receiver<ResourceState<Value>>>,
    },
    Unsubscribe {
        key: ResourceKey,
    },
    Invalidate {
        key: ResourceKey,
        respond_to: Response<Invalidation>,
    },
    FetchCompleted {
        key: ResourceKey,
        result: Result<Value, FetchError>,
    },
}

// =============================================================================
// 3. THE CACHE ACTOR
// =============================================================================

struct Slot {
    state: watch::Sender<ResourceState<Value>>,
    subscribers: usize,
    in_flight: bool,
    stale: bool,
}

impl Slot {
    fn new() -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            state,
            subscribers: 0,
            in_flight: false,
            stale: false,
        }
    }

    fn needs_fetch(&self, now: Instant, dedupe_interval: Duration) -> bool {
        if self.in_flight {
            return false;
        }
        if self.stale {
            return true;
        }
        let state = self.state.borrow();
        if state.error.is_some() {
            return true;
        }
        match state.fetched_at {
            None => true,
            Some(at) => now.duration_since(at) >= dedupe_interval,
        }
    }
}

/// Owns every cache slot and processes requests one at a time.
///
/// Fetches run in their own tasks and report back through the actor's inbox,
/// so the slot map is only ever touched from the actor loop. The actor keeps a
/// weak handle to its inbox and stops once every [`ResourceClient`] is gone.
pub struct ResourceCache {
    receiver: mpsc::Receiver<CacheRequest>,
    inbox: mpsc::WeakSender<CacheRequest>,
    transport: Arc<dyn Transport>,
    slots: HashMap<ResourceKey, Slot>,
    dedupe_interval: Duration,
}

impl ResourceCache {
    pub fn new(
        buffer_size: usize,
        transport: Arc<dyn Transport>,
        api_base: impl Into<String>,
        dedupe_interval: Duration,
    ) -> (Self, ResourceClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let cache = Self {
            receiver,
            inbox: sender.downgrade(),
            transport: transport.clone(),
            slots: HashMap::new(),
            dedupe_interval,
        };
        let client = ResourceClient::new(sender, transport, api_base.into());
        (cache, client)
    }

    /// Runs the cache loop until every client has been dropped.
    pub async fn run(mut self) {
        info!("Resource cache started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CacheRequest::Read { key, respond_to } => {
                    self.revalidate_if_needed(&key);
                    let _ = respond_to.send(self.snapshot(&key));
                }
                CacheRequest::Subscribe { key, respond_to } => {
                    self.revalidate_if_needed(&key);
                    let slot = self.slot(&key);
                    slot.subscribers += 1;
                    debug!(%key, subscribers = slot.subscribers, "Subscribed");
                    let _ = respond_to.send(slot.state.subscribe());
                }
                CacheRequest::Unsubscribe { key } => {
                    if let Some(slot) = self.slots.get_mut(&key) {
                        slot.subscribers = slot.subscribers.saturating_sub(1);
                        debug!(%key, subscribers = slot.subscribers, "Unsubscribed");
                    }
                }
                CacheRequest::Invalidate { key, respond_to } => {
                    let outcome = self.invalidate(&key);
                    info!(%key, ?outcome, "Invalidated");
                    let _ = respond_to.send(outcome);
                }
                CacheRequest::FetchCompleted { key, result } => {
                    self.complete(&key, result);
                }
            }
        }

        info!(slots = self.slots.len(), "Resource cache shutdown");
    }

    fn slot(&mut self, key: &ResourceKey) -> &mut Slot {
        self.slots.entry(key.clone()).or_insert_with(Slot::new)
    }

    fn snapshot(&self, key: &ResourceKey) -> ResourceState<Value> {
        self.slots
            .get(key)
            .map(|slot| slot.state.borrow().clone())
            .unwrap_or_default()
    }

    fn revalidate_if_needed(&mut self, key: &ResourceKey) {
        let now = Instant::now();
        let dedupe_interval = self.dedupe_interval;
        if self.slot(key).needs_fetch(now, dedupe_interval) {
            self.start_fetch(key);
        }
    }

    fn invalidate(&mut self, key: &ResourceKey) -> Invalidation {
        let Some(slot) = self.slots.get_mut(key) else {
            return Invalidation::Unknown;
        };
        slot.stale = true;
        if slot.subscribers == 0 {
            Invalidation::MarkedStale
        } else if slot.in_flight {
            Invalidation::Queued
        } else {
            self.start_fetch(key);
            Invalidation::Refetching
        }
    }

    fn start_fetch(&mut self, key: &ResourceKey) {
        let Some(slot) = self.slots.get_mut(key) else {
            return;
        };
        slot.in_flight = true;
        slot.stale = false;
        slot.state.send_modify(|state| state.is_validating = true);
        debug!(%key, "Fetch started");

        let transport = self.transport.clone();
        let inbox = self.inbox.clone();
        let key = key.clone();
        // Runs to completion even if every subscriber leaves meanwhile; the
        // result still lands in the slot for the next reader.
        tokio::spawn(async move {
            let result = fetch_json(transport.as_ref(), &key).await;
            if let Some(inbox) = inbox.upgrade() {
                let _ = inbox.send(CacheRequest::FetchCompleted { key, result }).await;
            }
        });
    }

    fn complete(&mut self, key: &ResourceKey, result: Result<Value, FetchError>) {
        let Some(slot) = self.slots.get_mut(key) else {
            return;
        };
        slot.in_flight = false;
        match &result {
            Ok(_) => info!(%key, subscribers = slot.subscribers, "Fetch ok"),
            Err(e) => warn!(%key, error = %e, "Fetch failed"),
        }
        slot.state.send_modify(|state| {
            state.is_validating = false;
            state.fetched_at = Some(Instant::now());
            state.fetch_count += 1;
            match result {
                Ok(value) => {
                    state.data = Some(value);
                    state.error = None;
                }
                Err(e) => state.error = Some(e),
            }
        });

        // Invalidated while the previous fetch was running.
        if slot.stale && slot.subscribers > 0 {
            self.start_fetch(key);
        }
    }
}

async fn fetch_json(transport: &dyn Transport, key: &ResourceKey) -> Result<Value, FetchError> {
    let response = transport
        .send(ApiRequest::get(key.as_str()))
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    if response.status == 401 {
        return Err(FetchError::Unauthorized);
    }
    serde_json::from_str(&response.body).map_err(|e| FetchError::Decode(e.to_string()))
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// Cloneable handle to the [`ResourceCache`], bound to the primary API base URL.
#[derive(Clone)]
pub struct ResourceClient {
    sender: mpsc::Sender<CacheRequest>,
    transport: Arc<dyn Transport>,
    api_base: Arc<str>,
}

impl ResourceClient {
    fn new(sender: mpsc::Sender<CacheRequest>, transport: Arc<dyn Transport>, api_base: String) -> Self {
        Self {
            sender,
            transport,
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Key for a path under the primary API.
    pub fn url(&self, path: &str) -> ResourceKey {
        ResourceKey::new(&self.api_base, path)
    }

    /// Current state of `key`, starting a fetch if the slot is new, stale,
    /// errored or invalidated.
    pub async fn read_key(&self, key: ResourceKey) -> Result<ResourceState<Value>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Read { key, respond_to })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)
    }

    pub async fn read<T: DeserializeOwned>(&self, path: &str) -> Result<ResourceState<T>, CacheError> {
        Ok(self.read_key(self.url(path)).await?.decode())
    }

    pub async fn subscribe_key<T: DeserializeOwned>(
        &self,
        key: ResourceKey,
    ) -> Result<Subscription<T>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Subscribe {
                key: key.clone(),
                respond_to,
            })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        let receiver = response.await.map_err(|_| CacheError::ActorDropped)?;
        Ok(Subscription {
            key,
            receiver,
            inbox: self.sender.downgrade(),
            subscribed: true,
            _marker: PhantomData,
        })
    }

    pub async fn subscribe<T: DeserializeOwned>(&self, path: &str) -> Result<Subscription<T>, CacheError> {
        self.subscribe_key(self.url(path)).await
    }

    pub async fn invalidate_key(&self, key: ResourceKey) -> Result<Invalidation, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Invalidate { key, respond_to })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)
    }

    pub async fn invalidate(&self, path: &str) -> Result<Invalidation, CacheError> {
        self.invalidate_key(self.url(path)).await
    }

    /// Write handle for `{api_base}{path}`.
    pub fn mutate(&self, method: HttpMethod, path: &str) -> MutationHandle {
        self.mutate_at(&self.api_base, method, Some(path))
    }

    /// Write handle against any base URL. `PUT` and `DELETE` handles are
    /// usually bound to a prefix ending in `/` and triggered with a path.
    pub fn mutate_at(&self, endpoint_base: &str, method: HttpMethod, path: Option<&str>) -> MutationHandle {
        let endpoint = format!("{}{}", endpoint_base, path.unwrap_or_default());
        MutationHandle::new(self.transport.clone(), endpoint, method)
    }
}

// =============================================================================
// 5. SUBSCRIPTIONS
// =============================================================================

/// A mounted consumer of one key.
///
/// Dropping the subscription unsubscribes. Unsubscribing twice, or after the
/// cache has shut down, does nothing.
pub struct Subscription<T> {
    key: ResourceKey,
    receiver: watch::Receiver<ResourceState<Value>>,
    inbox: mpsc::WeakSender<CacheRequest>,
    subscribed: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    pub fn current(&self) -> ResourceState<T> {
        self.receiver.borrow().decode()
    }

    /// Waits for the next state change. `None` once the cache is gone.
    pub async fn changed(&mut self) -> Option<ResourceState<T>> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }

    /// Waits until no fetch is in flight for this key.
    pub async fn settled(&mut self) -> ResourceState<T> {
        let settled = self
            .receiver
            .wait_for(|state| !state.is_validating)
            .await
            .map(|state| state.decode());
        match settled {
            Ok(state) => state,
            Err(_) => self.current(),
        }
    }
}

impl<T> Subscription<T> {
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn unsubscribe(&mut self) {
        if !std::mem::replace(&mut self.subscribed, false) {
            return;
        }
        let Some(inbox) = self.inbox.upgrade() else {
            return;
        };
        let msg = CacheRequest::Unsubscribe { key: self.key.clone() };
        if let Err(TrySendError::Full(msg)) = inbox.try_send(msg) {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = inbox.send(msg).await;
                });
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// =============================================================================
// 6. TESTS
// =============================================================================
