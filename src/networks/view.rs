use tracing::info;

use super::error::NetworkError;
use super::form::{validate, NetworkField};
use crate::clients::{CollectionClient, NetworkClient};
use crate::context::DashboardContext;
use crate::forms::Form;
use crate::framework::{ResourceState, Subscription};
use crate::model::Network;
use crate::session::GuardOutcome;

pub const DELETE_FAILED: &str = "Deleting network failed with: ";
pub const SESSION_FAILED: &str = "Network session failed with: ";
pub const ADD_FAILED: &str = "Adding network failed with: ";
pub const EDIT_FAILED: &str = "Editing network failed with: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRow {
    pub id: Option<u64>,
    pub name: String,
    pub cidr: String,
}

/// The `/networks` list.
pub struct NetworksView {
    ctx: DashboardContext,
    client: NetworkClient,
}

impl NetworksView {
    pub fn new(ctx: DashboardContext) -> Self {
        let client = NetworkClient::new(ctx.client.clone());
        Self { ctx, client }
    }

    pub fn client(&self) -> &NetworkClient {
        &self.client
    }

    pub async fn mount(&self) -> Result<Subscription<Vec<Network>>, NetworkError> {
        self.client.watch().await
    }

    pub fn rows(&self, state: &ResourceState<Vec<Network>>) -> GuardOutcome<Vec<NetworkRow>> {
        match self.ctx.guard.handle_failures(state) {
            GuardOutcome::Ready(networks) => GuardOutcome::Ready(
                networks
                    .into_iter()
                    .map(|n| NetworkRow {
                        id: n.id,
                        name: n.name,
                        cidr: n.cidr,
                    })
                    .collect(),
            ),
            GuardOutcome::Pending => GuardOutcome::Pending,
            GuardOutcome::Redirected(url) => GuardOutcome::Redirected(url),
        }
    }

    /// Shows the nodes of one network.
    pub fn open(&self, id: u64) {
        self.ctx.router.push(&format!("/nodes/network/{}", id));
    }

    pub async fn delete(&self, id: u64) -> Result<(), NetworkError> {
        self.client
            .delete(id)
            .await
            .inspect_err(|e| self.ctx.report_failure(DELETE_FAILED, e))
    }

    pub async fn session(&self, id: u64) -> Result<(), NetworkError> {
        self.client
            .open_session(id)
            .await
            .inspect_err(|e| self.ctx.report_failure(SESSION_FAILED, e))
    }

    pub fn edit(&self, id: u64) -> EditNetworkView {
        EditNetworkView::new(self.ctx.clone(), id)
    }
}

/// The add-network form.
pub struct AddNetworkView {
    ctx: DashboardContext,
    client: NetworkClient,
    form: Form<Network>,
}

impl AddNetworkView {
    pub fn new(ctx: DashboardContext) -> Self {
        let client = NetworkClient::new(ctx.client.clone());
        Self {
            ctx,
            client,
            form: Form::new(Network::blank()),
        }
    }

    pub fn form(&self) -> &Form<Network> {
        &self.form
    }

    pub fn edit(&mut self, field: NetworkField) {
        self.form.edit(field);
    }

    pub fn is_submitting(&self) -> bool {
        self.client.is_saving()
    }

    /// Creates the network, then goes back to the list.
    pub async fn submit(&mut self) -> Result<(), NetworkError> {
        if let Err(e) = validate(self.form.value()) {
            self.form.mark_validated();
            return Err(e.into());
        }
        match self.client.create_network(self.form.value()).await {
            Ok(()) => {
                info!(name = %self.form.value().name, "Network added");
                self.form.reset();
                self.ctx.router.push("/networks");
                Ok(())
            }
            Err(e) => {
                self.ctx.report_failure(ADD_FAILED, &e);
                Err(e)
            }
        }
    }
}

/// The edit-network modal.
pub struct EditNetworkView {
    ctx: DashboardContext,
    client: NetworkClient,
    id: u64,
    form: Form<Network>,
    open: bool,
}

impl EditNetworkView {
    pub fn new(ctx: DashboardContext, id: u64) -> Self {
        let client = NetworkClient::new(ctx.client.clone());
        Self {
            ctx,
            client,
            id,
            form: Form::new(Network::blank()),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form(&self) -> &Form<Network> {
        &self.form
    }

    pub fn edit(&mut self, field: NetworkField) {
        self.form.edit(field);
    }

    pub async fn show(&mut self) -> Result<(), NetworkError> {
        let mut network = self.client.network(self.id).await?;
        let state = network.settled().await;
        if let GuardOutcome::Ready(loaded) = self.ctx.guard.handle_failures(&state) {
            self.form.load(loaded);
            self.open = true;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub async fn submit(&mut self) -> Result<(), NetworkError> {
        if let Err(e) = validate(self.form.value()) {
            self.form.mark_validated();
            return Err(e.into());
        }
        match self.client.update_network(self.form.value()).await {
            Ok(()) => {
                info!(id = self.id, "Network edited");
                self.form.reset();
                self.close();
                Ok(())
            }
            Err(e) => {
                self.ctx.report_failure(EDIT_FAILED, &e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::DEFAULT_CHANNEL;
    use crate::framework::mock::MockTransport;
    use crate::framework::{HttpMethod, ResourceCache};
    use crate::navigation::Location;
    use std::sync::Arc;
    use std::time::Duration;

    fn context(mock: &MockTransport) -> DashboardContext {
        let (cache, client) =
            ResourceCache::new(16, Arc::new(mock.clone()), "http://api.test", Duration::from_secs(2));
        tokio::spawn(cache.run());
        DashboardContext::new(client, "http://oauth.test")
    }

    #[tokio::test]
    async fn test_open_navigates_to_network_nodes() {
        let ctx = context(&MockTransport::new());
        let view = NetworksView::new(ctx.clone());

        view.open(9);

        assert_eq!(ctx.router.location(), Location::Internal("/nodes/network/9".into()));
    }

    #[tokio::test]
    async fn test_add_network_navigates_back_to_list() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Post, "http://api.test/network").return_text(201, "{}");
        let ctx = context(&mock);
        let mut view = AddNetworkView::new(ctx.clone());
        view.edit(NetworkField::Name("lab".into()));
        view.edit(NetworkField::Cidr("10.0.0.0/24".into()));

        view.submit().await.unwrap();

        assert_eq!(view.form().value(), &Network::blank());
        assert_eq!(ctx.router.location(), Location::Internal("/networks".into()));
        let body = mock.calls()[0].body.clone().unwrap();
        assert_eq!(body["name"], "lab");
        assert_eq!(body["cidr"], "10.0.0.0/24");
        mock.verify();
    }

    #[tokio::test]
    async fn test_session_failure_alerts_with_body() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Put, "http://api.test/network/4/session")
            .return_text(409, "already open");
        let ctx = context(&mock);
        let mut alerts = ctx.alerts.subscribe(DEFAULT_CHANNEL);
        let view = NetworksView::new(ctx);

        let result = view.session(4).await;

        assert_eq!(
            result,
            Err(NetworkError::Rejected { status: 409, body: "already open".into() })
        );
        let alert = alerts.try_recv().unwrap();
        assert_eq!(alert.message.as_deref(), Some("Network session failed with: already open"));
    }

    #[tokio::test]
    async fn test_edit_stays_closed_when_network_read_fails() {
        let mock = MockTransport::new();
        mock.expect_get("http://api.test/network/6").return_text(401, "Unauthorized");
        let ctx = context(&mock);
        let mut view = EditNetworkView::new(ctx.clone(), 6);

        view.show().await.unwrap();

        assert!(!view.is_open());
        assert_eq!(view.form().value(), &Network::blank());
        assert_eq!(ctx.router.location(), Location::External("http://oauth.test/auth/google".into()));
    }
}
