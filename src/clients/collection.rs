use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::framework::{
    expect_status, CacheError, Invalidation, MutationArg, MutationHandle, ResourceClient, ResourceState,
    Subscription, WriteFailure,
};

/// Shared read/refresh/delete behaviour of the entity clients.
///
/// Every listed entity follows the same loop: one cached collection read,
/// deletes against `{item_path}{id}` answering 204, and an invalidation of
/// the collection once a write succeeds.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Body of the collection read.
    type Listing: DeserializeOwned + Send + 'static;

    /// The entity-specific error type.
    type Error: From<CacheError> + From<WriteFailure> + Send + Sync;

    /// Access the inner [`ResourceClient`].
    fn inner(&self) -> &ResourceClient;

    /// Path of the cached collection, e.g. `/accounts`.
    fn collection_path(&self) -> String;

    /// Bound `DELETE {item_path}` handle.
    fn delete_handle(&self) -> &MutationHandle;

    /// Current state of the collection.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<ResourceState<Self::Listing>, Self::Error> {
        tracing::debug!("Sending request");
        Ok(self.inner().read(&self.collection_path()).await?)
    }

    /// Live view of the collection, for a mounted list.
    async fn watch(&self) -> Result<Subscription<Self::Listing>, Self::Error> {
        Ok(self.inner().subscribe(&self.collection_path()).await?)
    }

    /// Forces a refetch of the collection for its subscribers.
    #[tracing::instrument(skip(self))]
    async fn refresh(&self) -> Result<Invalidation, Self::Error> {
        Ok(self.inner().invalidate(&self.collection_path()).await?)
    }

    /// Deletes one entity. Succeeds only on 204, then refreshes the collection.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        let result = self.delete_handle().trigger(MutationArg::path(id)).await;
        expect_status(result, 204)?;
        self.refresh().await?;
        Ok(())
    }

    fn is_deleting(&self) -> bool {
        self.delete_handle().is_mutating()
    }
}
