use tracing::info;

use super::error::AccountError;
use super::form::{validate, AccountField};
use crate::chrome::images::{avatar_or, DEFAULT_ACCOUNT_AVATAR};
use crate::clients::{AccountClient, CollectionClient};
use crate::context::DashboardContext;
use crate::forms::Form;
use crate::framework::{ResourceState, Subscription};
use crate::layout::{labelled, Icon, Labelled};
use crate::model::{Account, Provider};
use crate::session::GuardOutcome;

pub const DELETE_FAILED: &str = "Deleting account failed with: ";
pub const LOGIN_FAILED: &str = "Login account failed with: ";
pub const ADD_FAILED: &str = "Adding account failed with: ";
pub const EDIT_FAILED: &str = "Editing account failed with: ";

/// Row actions offered for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Delete,
    Edit,
    /// Only for accounts that never logged in.
    Login,
    /// Only for OAuth providers.
    RefreshToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRow {
    pub id: Option<u64>,
    pub name: String,
    pub avatar: String,
    pub provider: Labelled,
    pub actions: Vec<AccountAction>,
}

/// The `/accounts` list.
pub struct AccountsView {
    ctx: DashboardContext,
    client: AccountClient,
}

impl AccountsView {
    pub fn new(ctx: DashboardContext) -> Self {
        let client = AccountClient::new(ctx.client.clone());
        Self { ctx, client }
    }

    pub fn client(&self) -> &AccountClient {
        &self.client
    }

    /// Subscribes the list read; the subscription lives as long as the
    /// mounted view.
    pub async fn mount(&self) -> Result<Subscription<Vec<Account>>, AccountError> {
        self.client.watch().await
    }

    /// Rows for the current read. A failed read redirects to the login page.
    pub fn rows(&self, state: &ResourceState<Vec<Account>>) -> GuardOutcome<Vec<AccountRow>> {
        match self.ctx.guard.handle_failures(state) {
            GuardOutcome::Ready(accounts) => {
                GuardOutcome::Ready(accounts.iter().map(|a| self.row(a)).collect())
            }
            GuardOutcome::Pending => GuardOutcome::Pending,
            GuardOutcome::Redirected(url) => GuardOutcome::Redirected(url),
        }
    }

    fn row(&self, account: &Account) -> AccountRow {
        let mut actions = vec![AccountAction::Delete, AccountAction::Edit];
        if account.session.is_none() {
            actions.push(AccountAction::Login);
        }
        if account.provider.is_oauth() {
            actions.push(AccountAction::RefreshToken);
        }
        AccountRow {
            id: account.id,
            name: account.name.clone(),
            avatar: avatar_or(self.ctx.api_base_url(), account.avatar.as_deref(), DEFAULT_ACCOUNT_AVATAR),
            provider: labelled(
                account.provider.name.clone(),
                Icon::for_provider(&account.provider.name),
                self.ctx.viewport,
            ),
            actions,
        }
    }

    pub async fn delete(&self, id: u64) -> Result<(), AccountError> {
        self.client
            .delete(id)
            .await
            .inspect_err(|e| self.ctx.report_failure(DELETE_FAILED, e))
    }

    /// Login, or token refresh for OAuth accounts: same endpoint.
    pub async fn login(&self, id: u64) -> Result<(), AccountError> {
        self.client
            .login(id)
            .await
            .inspect_err(|e| self.ctx.report_failure(LOGIN_FAILED, e))
    }

    pub fn edit(&self, id: u64) -> EditAccountView {
        EditAccountView::new(self.ctx.clone(), id)
    }
}

/// The add-account form.
pub struct AddAccountView {
    ctx: DashboardContext,
    client: AccountClient,
    form: Form<Account>,
}

impl AddAccountView {
    pub fn new(ctx: DashboardContext) -> Self {
        let client = AccountClient::new(ctx.client.clone());
        Self {
            ctx,
            client,
            form: Form::new(Account::blank()),
        }
    }

    pub fn form(&self) -> &Form<Account> {
        &self.form
    }

    pub fn edit(&mut self, field: AccountField) {
        self.form.edit(field);
    }

    /// Providers a login/password account can use.
    pub async fn providers(&self) -> Result<Subscription<Vec<Provider>>, AccountError> {
        self.client.providers(Some("loginpassword")).await
    }

    pub fn is_submitting(&self) -> bool {
        self.client.is_saving()
    }

    /// Validates and creates the account. On 201 the form returns to its
    /// initial state.
    pub async fn submit(&mut self) -> Result<(), AccountError> {
        if let Err(e) = validate(self.form.value()) {
            self.form.mark_validated();
            return Err(e.into());
        }
        let account = self.form.value_mut();
        account.name = account.login.clone();

        match self.client.create_account(self.form.value()).await {
            Ok(()) => {
                info!(login = %self.form.value().login, "Account added");
                self.form.reset();
                Ok(())
            }
            Err(e) => {
                self.ctx.report_failure(ADD_FAILED, &e);
                Err(e)
            }
        }
    }
}

/// The edit-account modal.
pub struct EditAccountView {
    ctx: DashboardContext,
    client: AccountClient,
    id: u64,
    form: Form<Account>,
    open: bool,
}

impl EditAccountView {
    pub fn new(ctx: DashboardContext, id: u64) -> Self {
        let client = AccountClient::new(ctx.client.clone());
        Self {
            ctx,
            client,
            id,
            form: Form::new(Account::blank()),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form(&self) -> &Form<Account> {
        &self.form
    }

    pub fn edit(&mut self, field: AccountField) {
        self.form.edit(field);
    }

    pub async fn providers(&self) -> Result<Subscription<Vec<Provider>>, AccountError> {
        self.client.providers(None).await
    }

    /// Opens the modal with the account as the server has it. Stays closed
    /// until the account is loaded.
    pub async fn show(&mut self) -> Result<(), AccountError> {
        let mut account = self.client.account(self.id).await?;
        let state = account.settled().await;
        if let GuardOutcome::Ready(loaded) = self.ctx.guard.handle_failures(&state) {
            self.form.load(loaded);
            self.open = true;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub async fn submit(&mut self) -> Result<(), AccountError> {
        if let Err(e) = validate(self.form.value()) {
            self.form.mark_validated();
            return Err(e.into());
        }
        let account = self.form.value_mut();
        account.name = account.login.clone();

        match self.client.update_account(self.form.value()).await {
            Ok(()) => {
                info!(id = self.id, "Account edited");
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
    use crate::framework::{FetchError, ResourceCache};
    use crate::framework::mock::MockTransport;
    use crate::layout::{OneOrBoth, Viewport};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn context(mock: &MockTransport) -> DashboardContext {
        let (cache, client) =
            ResourceCache::new(16, Arc::new(mock.clone()), "http://api.test", Duration::from_secs(2));
        tokio::spawn(cache.run());
        DashboardContext::new(client, "http://oauth.test")
    }

    #[tokio::test]
    async fn test_row_actions_follow_session_and_provider() {
        let ctx = context(&MockTransport::new()).with_viewport(Viewport::new(400));
        let view = AccountsView::new(ctx);
        let accounts: Vec<Account> = serde_json::from_value(json!([
            {"ID": 1, "name": "fresh", "session": null, "provider": {"name": "Instagram"}},
            {"ID": 2, "name": "oauth", "session": {"t": 1},
             "provider": {"name": "Youtube", "authenticationType": "oauth"}}
        ]))
        .unwrap();
        let state = ResourceState {
            data: Some(accounts),
            ..ResourceState::default()
        };

        let rows = view.rows(&state).ready().unwrap();

        assert_eq!(
            rows[0].actions,
            vec![AccountAction::Delete, AccountAction::Edit, AccountAction::Login]
        );
        assert_eq!(
            rows[1].actions,
            vec![AccountAction::Delete, AccountAction::Edit, AccountAction::RefreshToken]
        );
        assert_eq!(rows[0].provider, OneOrBoth::Small(Icon::Instagram));
        assert_eq!(
            rows[0].avatar,
            format!("http://api.test/image?url={}", DEFAULT_ACCOUNT_AVATAR)
        );
    }

    #[tokio::test]
    async fn test_errored_list_redirects() {
        let ctx = context(&MockTransport::new());
        let view = AccountsView::new(ctx.clone());
        let state = ResourceState::<Vec<Account>> {
            error: Some(FetchError::Transport("down".into())),
            ..ResourceState::default()
        };

        assert!(matches!(view.rows(&state), GuardOutcome::Redirected(_)));
        assert_eq!(ctx.router.location().path(), "http://oauth.test/auth/google");
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let mock = MockTransport::new();
        let ctx = context(&mock);
        let mut view = AddAccountView::new(ctx);
        view.edit(AccountField::Login("not-an-email".into()));

        let result = view.submit().await;

        assert!(matches!(result, Err(AccountError::Validation(_))));
        assert!(view.form().is_validated());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_submit_closes_on_201() {
        let mock = MockTransport::new();
        mock.expect_get("http://api.test/account/5").return_json(
            200,
            json!({"ID": 5, "name": "x@y.io", "login": "x@y.io", "password": "p", "twofa": "1",
                   "provider": {"name": "Instagram"}}),
        );
        mock.expect(crate::framework::HttpMethod::Put, "http://api.test/account")
            .return_text(201, "{}");
        let mut view = EditAccountView::new(context(&mock), 5);

        view.show().await.unwrap();
        assert!(view.is_open());
        assert_eq!(view.form().value().id, Some(5));

        view.edit(AccountField::Login("new@y.io".into()));
        view.submit().await.unwrap();

        assert!(!view.is_open());
        assert_eq!(view.form().value(), &Account::blank());
        let body = mock.calls()[1].body.clone().unwrap();
        assert_eq!(body["name"], "new@y.io");
        assert_eq!(body["ID"], 5);
        mock.verify();
    }

    #[tokio::test]
    async fn test_edit_stays_closed_when_account_read_fails() {
        let mock = MockTransport::new();
        mock.expect_get("http://api.test/account/5").return_text(401, "Unauthorized");
        let ctx = context(&mock);
        let mut view = EditAccountView::new(ctx.clone(), 5);

        view.show().await.unwrap();

        assert!(!view.is_open());
        assert_eq!(view.form().value(), &Account::blank());
        assert_eq!(ctx.router.location().path(), "http://oauth.test/auth/google");
    }
}
