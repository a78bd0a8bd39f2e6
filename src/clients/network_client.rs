use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::clients::collection::CollectionClient;
use crate::framework::{expect_status, HttpMethod, MutationArg, MutationHandle, ResourceClient, Subscription};
use crate::model::Network;
use crate::networks::NetworkError;

/// Client for the network endpoints.
#[derive(Clone)]
pub struct NetworkClient {
    inner: ResourceClient,
    delete: MutationHandle,
    session: MutationHandle,
    create: MutationHandle,
    update: MutationHandle,
}

impl NetworkClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self {
            delete: inner.mutate(HttpMethod::Delete, "/network/"),
            session: inner.mutate(HttpMethod::Put, "/network/"),
            create: inner.mutate(HttpMethod::Post, "/network"),
            update: inner.mutate(HttpMethod::Put, "/network"),
            inner,
        }
    }
}

#[async_trait]
impl CollectionClient for NetworkClient {
    type Listing = Vec<Network>;
    type Error = NetworkError;

    fn inner(&self) -> &ResourceClient {
        &self.inner
    }

    fn collection_path(&self) -> String {
        "/networks".to_string()
    }

    fn delete_handle(&self) -> &MutationHandle {
        &self.delete
    }
}

impl NetworkClient {
    pub async fn network(&self, id: u64) -> Result<Subscription<Network>, NetworkError> {
        Ok(self.inner.subscribe(&format!("/network/{}", id)).await?)
    }

    /// Opens a session on the network. Succeeds only on 201.
    #[instrument(skip(self))]
    pub async fn open_session(&self, id: u64) -> Result<(), NetworkError> {
        debug!("Sending request");
        let result = self.session.trigger(MutationArg::path(format!("{}/session", id))).await;
        expect_status(result, 201)?;
        self.refresh().await?;
        Ok(())
    }

    #[instrument(skip(self, network), fields(name = %network.name))]
    pub async fn create_network(&self, network: &Network) -> Result<(), NetworkError> {
        debug!(cidr = %network.cidr, "Sending request");
        let result = self.create.trigger(MutationArg::body(network)?).await;
        expect_status(result, 201)?;
        self.refresh().await?;
        Ok(())
    }

    #[instrument(skip(self, network), fields(id = ?network.id))]
    pub async fn update_network(&self, network: &Network) -> Result<(), NetworkError> {
        debug!("Sending request");
        let result = self.update.trigger(MutationArg::body(network)?).await;
        expect_status(result, 201)?;
        self.refresh().await?;
        Ok(())
    }

    pub fn is_saving(&self) -> bool {
        self.create.is_mutating() || self.update.is_mutating()
    }
}
