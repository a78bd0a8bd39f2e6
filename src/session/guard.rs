//! Redirect-on-failure session handling.
//!
//! The guard never retries. A failed identity read sends the whole client to
//! the external authorization page; a successful one publishes the identity.

use tracing::{info, warn};

use super::context::SessionContext;
use crate::framework::ResourceState;
use crate::model::User;
use crate::navigation::Router;

/// What a guarded view should do with a read.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome<T> {
    /// Still loading; render a placeholder.
    Pending,
    /// The client was sent to this URL.
    Redirected(String),
    Ready(T),
}

impl<T> GuardOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            GuardOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionGuard {
    login_url: String,
    session: SessionContext,
    router: Router,
}

impl SessionGuard {
    pub fn new(oauth_base_url: &str, session: SessionContext, router: Router) -> Self {
        Self {
            login_url: format!("{}/auth/google", oauth_base_url),
            session,
            router,
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Applies the current-user read: error redirects, data is stored in the
    /// session context.
    pub fn resolve_identity(&self, state: &ResourceState<User>) -> GuardOutcome<User> {
        match self.handle_failures(state) {
            GuardOutcome::Ready(user) => {
                self.session.set_user(user.clone());
                GuardOutcome::Ready(user)
            }
            other => other,
        }
    }

    /// Redirects on any errored read, whatever the resource.
    pub fn handle_failures<T: Clone>(&self, state: &ResourceState<T>) -> GuardOutcome<T> {
        if let Some(error) = &state.error {
            warn!(%error, url = %self.login_url, "Read failed, redirecting to login");
            self.router.redirect(&self.login_url);
            return GuardOutcome::Redirected(self.login_url.clone());
        }
        match &state.data {
            Some(data) => GuardOutcome::Ready(data.clone()),
            None => GuardOutcome::Pending,
        }
    }

    /// Explicit logout: straight to the login page.
    pub fn logout(&self) {
        info!("Logout");
        self.router.redirect(&self.login_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertBus;
    use crate::framework::FetchError;
    use crate::navigation::Location;

    fn guard() -> (SessionGuard, SessionContext, Router) {
        let session = SessionContext::new();
        let router = Router::new(AlertBus::new());
        let guard = SessionGuard::new("https://oauth.test", session.clone(), router.clone());
        (guard, session, router)
    }

    #[test]
    fn test_error_redirects_once() {
        let (guard, session, router) = guard();
        let failed = ResourceState::<User> {
            error: Some(FetchError::Unauthorized),
            ..ResourceState::default()
        };

        let outcome = guard.resolve_identity(&failed);
        guard.resolve_identity(&failed);

        assert_eq!(outcome, GuardOutcome::Redirected("https://oauth.test/auth/google".into()));
        assert_eq!(
            router.location(),
            Location::External("https://oauth.test/auth/google".into())
        );
        assert_eq!(router.history().len(), 1);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_loading_does_nothing() {
        let (guard, session, router) = guard();
        let loading = ResourceState::<User> {
            is_validating: true,
            ..ResourceState::default()
        };

        assert_eq!(guard.resolve_identity(&loading), GuardOutcome::Pending);
        assert_eq!(router.location(), Location::Internal("/".into()));
        assert!(session.user().is_none());
    }

    #[test]
    fn test_success_publishes_identity() {
        let (guard, session, _) = guard();
        let user = User {
            email: Some("me@solo.dev".into()),
            ..User::default()
        };
        let ok = ResourceState {
            data: Some(user.clone()),
            ..ResourceState::default()
        };

        assert_eq!(guard.resolve_identity(&ok), GuardOutcome::Ready(user.clone()));
        assert_eq!(session.user(), Some(user));
    }
}
