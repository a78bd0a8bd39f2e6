use std::fmt;

use tracing::warn;

use crate::alerts::{AlertBus, AlertOptions};
use crate::framework::ResourceClient;
use crate::layout::Viewport;
use crate::navigation::Router;
use crate::session::{SessionContext, SessionGuard};

/// Everything a view needs, handed to it explicitly.
///
/// Cheap to clone: every field is a shared handle except the viewport,
/// which a UI binding updates per render with [`with_viewport`](Self::with_viewport).
#[derive(Clone)]
pub struct DashboardContext {
    pub client: ResourceClient,
    pub alerts: AlertBus,
    pub session: SessionContext,
    pub router: Router,
    pub guard: SessionGuard,
    pub oauth_base_url: String,
    pub viewport: Viewport,
}

impl DashboardContext {
    pub fn new(client: ResourceClient, oauth_base_url: impl Into<String>) -> Self {
        let oauth_base_url = oauth_base_url.into();
        let alerts = AlertBus::new();
        let session = SessionContext::new();
        let router = Router::new(alerts.clone());
        let guard = SessionGuard::new(&oauth_base_url, session.clone(), router.clone());
        Self {
            client,
            alerts,
            session,
            router,
            guard,
            oauth_base_url,
            viewport: Viewport::default(),
        }
    }

    pub fn with_viewport(&self, viewport: Viewport) -> Self {
        Self {
            viewport,
            ..self.clone()
        }
    }

    pub fn api_base_url(&self) -> &str {
        self.client.api_base()
    }

    /// Publishes `{prefix}{error}` as an error alert on the default channel.
    pub fn report_failure(&self, prefix: &str, error: &dyn fmt::Display) {
        warn!(%error, "{}", prefix.trim_end_matches([':', ' ']));
        self.alerts.error(format!("{}{}", prefix, error), AlertOptions::default());
    }
}
