use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::accounts::AccountError;
use crate::clients::collection::CollectionClient;
use crate::framework::{
    expect_status, HttpMethod, MutationArg, MutationHandle, ResourceClient, Subscription,
};
use crate::model::{Account, Insights, Provider};

/// Client for the account endpoints.
///
/// Write handles are created once, so their in-flight flags are shared by
/// every clone of the client.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient,
    delete: MutationHandle,
    session: MutationHandle,
    create: MutationHandle,
    update: MutationHandle,
}

impl AccountClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self {
            delete: inner.mutate(HttpMethod::Delete, "/account/"),
            session: inner.mutate(HttpMethod::Put, "/account/"),
            create: inner.mutate(HttpMethod::Post, "/account"),
            update: inner.mutate(HttpMethod::Put, "/account"),
            inner,
        }
    }
}

#[async_trait]
impl CollectionClient for AccountClient {
    type Listing = Vec<Account>;
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient {
        &self.inner
    }

    fn collection_path(&self) -> String {
        "/accounts".to_string()
    }

    fn delete_handle(&self) -> &MutationHandle {
        &self.delete
    }
}

impl AccountClient {
    pub async fn account(&self, id: u64) -> Result<Subscription<Account>, AccountError> {
        Ok(self.inner.subscribe(&format!("/account/{}", id)).await?)
    }

    /// Providers, optionally filtered by authentication type.
    pub async fn providers(&self, auth_type: Option<&str>) -> Result<Subscription<Vec<Provider>>, AccountError> {
        let path = match auth_type {
            Some(kind) => format!("/providers?type={}", kind),
            None => "/providers".to_string(),
        };
        Ok(self.inner.subscribe(&path).await?)
    }

    pub async fn insights(&self, id: u64) -> Result<Subscription<Insights>, AccountError> {
        Ok(self.inner.subscribe(&format!("/account/{}/info/insights", id)).await?)
    }

    /// Logs the account in (or refreshes its token). Succeeds only on 201.
    #[instrument(skip(self))]
    pub async fn login(&self, id: u64) -> Result<(), AccountError> {
        debug!("Sending request");
        let result = self.session.trigger(MutationArg::path(format!("{}/session", id))).await;
        expect_status(result, 201)?;
        self.refresh().await?;
        Ok(())
    }

    #[instrument(skip(self, account), fields(login = %account.login))]
    pub async fn create_account(&self, account: &Account) -> Result<(), AccountError> {
        debug!(provider = %account.provider.name, "Sending request");
        let result = self.create.trigger(MutationArg::body(account)?).await;
        expect_status(result, 201)?;
        self.refresh().await?;
        Ok(())
    }

    #[instrument(skip(self, account), fields(id = ?account.id))]
    pub async fn update_account(&self, account: &Account) -> Result<(), AccountError> {
        debug!("Sending request");
        let result = self.update.trigger(MutationArg::body(account)?).await;
        expect_status(result, 201)?;
        self.refresh().await?;
        Ok(())
    }

    pub fn is_logging_in(&self) -> bool {
        self.session.is_mutating()
    }

    pub fn is_saving(&self) -> bool {
        self.create.is_mutating() || self.update.is_mutating()
    }
}
