use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::clients::collection::CollectionClient;
use crate::framework::{expect_status, HttpMethod, MutationArg, MutationHandle, ResourceClient, ResourceState};
use crate::model::{NetworkNode, NodeListing};
use crate::nodes::{NodeError, NodeScope};

/// Client for the node endpoints, bound to one [`NodeScope`].
#[derive(Clone)]
pub struct NodeClient {
    inner: ResourceClient,
    scope: NodeScope,
    delete: MutationHandle,
    register: MutationHandle,
}

impl NodeClient {
    pub fn new(inner: ResourceClient, scope: NodeScope) -> Self {
        Self {
            delete: inner.mutate(HttpMethod::Delete, "/node/"),
            register: inner.mutate(HttpMethod::Put, "/network/"),
            scope,
            inner,
        }
    }

    pub fn scope(&self) -> NodeScope {
        self.scope
    }

    /// The listing flattened to its nodes, whatever the scope.
    pub async fn nodes(&self) -> Result<ResourceState<Vec<NetworkNode>>, NodeError> {
        let state = self.list().await?;
        Ok(ResourceState {
            data: state.data.map(NodeListing::into_nodes),
            error: state.error,
            is_validating: state.is_validating,
            fetched_at: state.fetched_at,
            fetch_count: state.fetch_count,
        })
    }

    /// Joins a host to `network_id` with its activation code. Succeeds only
    /// on 200.
    #[instrument(skip(self, code))]
    pub async fn register(&self, network_id: &str, code: &str) -> Result<(), NodeError> {
        debug!("Sending request");
        let result = self
            .register
            .trigger(MutationArg::path(format!("{}/{}", network_id, code)))
            .await;
        expect_status(result, 200)?;
        Ok(())
    }

    pub fn is_registering(&self) -> bool {
        self.register.is_mutating()
    }
}

#[async_trait]
impl CollectionClient for NodeClient {
    type Listing = NodeListing;
    type Error = NodeError;

    fn inner(&self) -> &ResourceClient {
        &self.inner
    }

    fn collection_path(&self) -> String {
        self.scope.path()
    }

    fn delete_handle(&self) -> &MutationHandle {
        &self.delete
    }
}
