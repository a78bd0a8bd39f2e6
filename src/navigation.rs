//! In-app routing and whole-client redirects.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::alerts::{AlertBus, DEFAULT_CHANNEL};

/// Locations kept in the history; older ones are dropped.
pub const HISTORY_LIMIT: usize = 32;

/// Where the client currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// An in-app path such as `/networks`.
    Internal(String),
    /// The whole client left for an external URL.
    External(String),
}

impl Location {
    pub fn path(&self) -> &str {
        match self {
            Location::Internal(path) | Location::External(path) => path,
        }
    }
}

#[derive(Debug, Clone)]
struct RouterState {
    current: Location,
    history: Vec<Location>,
}

/// Cloneable router. Clones share location and history.
#[derive(Clone)]
pub struct Router {
    state: Arc<watch::Sender<RouterState>>,
    alerts: AlertBus,
}

impl Router {
    pub fn new(alerts: AlertBus) -> Self {
        let (state, _) = watch::channel(RouterState {
            current: Location::Internal("/".to_string()),
            history: Vec::new(),
        });
        Self {
            state: Arc::new(state),
            alerts,
        }
    }

    /// Navigates to `path`. Absolute URLs leave the app as a redirect.
    ///
    /// An in-app navigation is a route change: the default alert channel is
    /// cleared.
    pub fn push(&self, path: &str) {
        if path.starts_with("http://") || path.starts_with("https://") {
            self.redirect(path);
            return;
        }
        info!(path, "Navigate");
        self.alerts.clear(DEFAULT_CHANNEL);
        self.set(Location::Internal(path.to_string()));
    }

    /// Replaces the whole client location. Repeating the current redirect
    /// does nothing.
    pub fn redirect(&self, url: &str) {
        let target = Location::External(url.to_string());
        if self.state.borrow().current == target {
            return;
        }
        info!(url, "Redirect");
        self.set(target);
    }

    fn set(&self, location: Location) {
        self.state.send_modify(|state| {
            let previous = std::mem::replace(&mut state.current, location);
            state.history.push(previous);
            if state.history.len() > HISTORY_LIMIT {
                state.history.remove(0);
            }
        });
    }

    pub fn location(&self) -> Location {
        self.state.borrow().current.clone()
    }

    /// The last [`HISTORY_LIMIT`] locations left behind, oldest first.
    pub fn history(&self) -> Vec<Location> {
        self.state.borrow().history.clone()
    }
}
