use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::alerts::{AlertRegion, AlertRegionHandle, RegionTimings};
use crate::config::DashboardConfig;
use crate::context::DashboardContext;
use crate::framework::{HttpTransport, ResourceCache, Transport, TransportError};

/// The runtime root of the dashboard.
///
/// `Dashboard` is responsible for:
/// - **Lifecycle Management**: starting the resource cache and stopping it on shutdown
/// - **Dependency Wiring**: creating the alert bus, session, router and guard once,
///   and handing them to views through [`DashboardContext`]
///
/// # Example
///
/// ```ignore
/// let dashboard = Dashboard::new(&DashboardConfig::from_env()?)?;
/// let view = AccountsView::new(dashboard.context());
/// // ...
/// drop(view);
/// dashboard.shutdown().await?;
/// ```
pub struct Dashboard {
    context: DashboardContext,
    timings: RegionTimings,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Dashboard {
    /// Builds the HTTP transport from `config` and starts the cache.
    pub fn new(config: &DashboardConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Starts the cache on any transport; tests pass a mock.
    pub fn with_transport(config: &DashboardConfig, transport: Arc<dyn Transport>) -> Self {
        let (cache, client) = ResourceCache::new(
            config.cache_buffer,
            transport,
            config.api_base_url.clone(),
            config.dedupe_interval(),
        );
        let cache_handle = tokio::spawn(cache.run());
        info!(api = %config.api_base_url, oauth = %config.oauth_base_url, "Dashboard started");

        Self {
            context: DashboardContext::new(client, config.oauth_base_url.clone()),
            timings: RegionTimings {
                auto_close: Duration::from_millis(config.alert_auto_close_ms),
                fade: Duration::from_millis(config.alert_fade_ms),
            },
            handles: vec![cache_handle],
        }
    }

    /// A context for one view. Every clone shares the same cache, bus,
    /// session and router.
    pub fn context(&self) -> DashboardContext {
        self.context.clone()
    }

    /// Mounts an alert region rendering `channel`.
    pub fn mount_alerts(&self, channel: &str, fade: bool) -> AlertRegionHandle {
        let subscription = self.context.alerts.subscribe(channel);
        AlertRegion::new(fade, self.timings).spawn(subscription)
    }

    /// Stops the cache and waits for it.
    ///
    /// The cache exits once every handle to it is gone, so views and
    /// contexts obtained from [`context`](Self::context) must be dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down dashboard...");
        drop(self.context);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Cache task failed: {:?}", e);
                return Err(format!("Cache task failed: {:?}", e));
            }
        }

        info!("Dashboard shutdown complete.");
        Ok(())
    }
}
