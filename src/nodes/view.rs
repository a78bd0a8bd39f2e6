use tracing::info;

use super::error::NodeError;
use super::form::{validate, NodeField, NodeRegistration};
use super::scope::NodeScope;
use crate::clients::{CollectionClient, NodeClient};
use crate::context::DashboardContext;
use crate::forms::Form;
use crate::framework::{ResourceState, Subscription};
use crate::layout::Icon;
use crate::model::{Network, NetworkNode, NodeListing};
use crate::session::GuardOutcome;

pub const DELETE_FAILED: &str = "Deleting node failed with: ";
pub const REGISTER_FAILED: &str = "Adding node failed with: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: Option<u64>,
    pub os: Option<Icon>,
    pub hostname: String,
    pub arch: String,
    pub ip: String,
}

impl From<NetworkNode> for NodeRow {
    fn from(node: NetworkNode) -> Self {
        Self {
            id: node.id,
            os: node.os.as_deref().and_then(Icon::for_os),
            hostname: node.hostname.unwrap_or_default(),
            arch: node.arch.unwrap_or_default(),
            ip: node.ip.unwrap_or_default(),
        }
    }
}

/// Node list for one scope.
pub struct NodesView {
    ctx: DashboardContext,
    client: NodeClient,
}

impl NodesView {
    pub fn new(ctx: DashboardContext, scope: NodeScope) -> Self {
        let client = NodeClient::new(ctx.client.clone(), scope);
        Self { ctx, client }
    }

    pub fn scope(&self) -> NodeScope {
        self.client.scope()
    }

    pub fn client(&self) -> &NodeClient {
        &self.client
    }

    pub async fn mount(&self) -> Result<Subscription<NodeListing>, NodeError> {
        self.client.watch().await
    }

    pub fn rows(&self, state: &ResourceState<NodeListing>) -> GuardOutcome<Vec<NodeRow>> {
        match self.ctx.guard.handle_failures(state) {
            GuardOutcome::Ready(listing) => {
                GuardOutcome::Ready(listing.into_nodes().into_iter().map(NodeRow::from).collect())
            }
            GuardOutcome::Pending => GuardOutcome::Pending,
            GuardOutcome::Redirected(url) => GuardOutcome::Redirected(url),
        }
    }

    /// Deletes a node and refreshes this scope's listing.
    pub async fn delete(&self, id: u64) -> Result<(), NodeError> {
        self.client
            .delete(id)
            .await
            .inspect_err(|e| self.ctx.report_failure(DELETE_FAILED, e))
    }
}

/// The register-node form.
pub struct RegisterNodeView {
    ctx: DashboardContext,
    client: NodeClient,
    form: Form<NodeRegistration>,
}

impl RegisterNodeView {
    pub fn new(ctx: DashboardContext) -> Self {
        Self {
            client: NodeClient::new(ctx.client.clone(), NodeScope::All),
            form: Form::new(NodeRegistration::default()),
            ctx,
        }
    }

    pub fn form(&self) -> &Form<NodeRegistration> {
        &self.form
    }

    pub fn edit(&mut self, field: NodeField) {
        self.form.edit(field);
    }

    /// Networks offered by the selector.
    pub async fn networks(&self) -> Result<Subscription<Vec<Network>>, NodeError> {
        Ok(self.ctx.client.subscribe("/networks").await?)
    }

    pub fn is_submitting(&self) -> bool {
        self.client.is_registering()
    }

    /// Registers the node. Succeeds only on 200, then goes to the networks.
    pub async fn submit(&mut self) -> Result<(), NodeError> {
        if let Err(e) = validate(self.form.value()) {
            self.form.mark_validated();
            return Err(e.into());
        }
        let NodeRegistration { code, network_id } = self.form.value().clone();
        match self.client.register(&network_id, &code).await {
            Ok(()) => {
                info!(%network_id, "Node registered");
                self.form.reset();
                self.ctx.router.push("/networks");
                Ok(())
            }
            Err(e) => {
                self.ctx.report_failure(REGISTER_FAILED, &e);
                Err(e)
            }
        }
    }
}
