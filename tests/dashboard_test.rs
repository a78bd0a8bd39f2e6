use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use solo_dashboard::accounts::{AccountError, AccountField, AccountsView, AddAccountView};
use solo_dashboard::alerts::{AlertOptions, DEFAULT_CHANNEL};
use solo_dashboard::chrome::NavView;
use solo_dashboard::config::DashboardConfig;
use solo_dashboard::framework::mock::MockTransport;
use solo_dashboard::framework::{HttpMethod, TransportError};
use solo_dashboard::lifecycle::Dashboard;
use solo_dashboard::model::Account;
use solo_dashboard::navigation::Location;
use solo_dashboard::session::GuardOutcome;

const API: &str = "http://api.test";
const LOGIN_URL: &str = "http://oauth.test/auth/google";

fn config() -> DashboardConfig {
    DashboardConfig {
        api_base_url: API.to_string(),
        oauth_base_url: "http://oauth.test".to_string(),
        ..DashboardConfig::default()
    }
}

fn start(mock: &MockTransport) -> Dashboard {
    Dashboard::with_transport(&config(), Arc::new(mock.clone()))
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Adding an account resets the form and refetches the mounted list.
#[tokio::test]
async fn test_add_account_end_to_end() {
    let mock = MockTransport::new();
    let accounts = format!("{API}/accounts");
    mock.expect_get(accounts.clone()).return_json(200, json!([]));
    mock.expect(HttpMethod::Post, format!("{API}/account")).return_text(201, "{}");
    mock.expect_get(accounts.clone())
        .return_json(200, json!([{"ID": 1, "name": "a@b.com", "login": "a@b.com"}]));
    let dashboard = start(&mock);

    let list_view = AccountsView::new(dashboard.context());
    let mut list = list_view.mount().await.expect("mount");
    assert_eq!(list.settled().await.data, Some(vec![]));

    let mut form = AddAccountView::new(dashboard.context());
    form.edit(AccountField::Login("a@b.com".into()));
    form.edit(AccountField::Password("p".into()));
    form.edit(AccountField::Twofa("123456".into()));
    form.submit().await.expect("submit");

    assert_eq!(form.form().value(), &Account::blank());
    assert!(!form.form().is_validated());

    let refreshed = list.settled().await;
    assert_eq!(refreshed.data.map(|a| a.len()), Some(1));
    assert_eq!(mock.call_count(HttpMethod::Get, &accounts), 2);

    let sent = mock.calls()[1].body.clone().expect("body");
    assert_eq!(sent["name"], "a@b.com");
    assert_eq!(sent["login"], "a@b.com");
    assert_eq!(sent["provider"]["name"], "Instagram");
    mock.verify();

    drop((list, list_view, form));
    dashboard.shutdown().await.expect("shutdown");
}

/// A 204 refetches the list; any other status alerts with the body and
/// leaves the cache alone.
#[tokio::test]
async fn test_delete_account_outcomes() {
    let mock = MockTransport::new();
    let accounts = format!("{API}/accounts");
    mock.expect_get(accounts.clone()).return_json(200, json!([{"ID": 42}]));
    mock.expect(HttpMethod::Delete, format!("{API}/account/42")).return_text(204, "");
    mock.expect_get(accounts.clone()).return_json(200, json!([]));
    mock.expect(HttpMethod::Delete, format!("{API}/account/43")).return_text(500, "boom");
    let dashboard = start(&mock);
    let mut alerts = dashboard.context().alerts.subscribe(DEFAULT_CHANNEL);

    let view = AccountsView::new(dashboard.context());
    let mut list = view.mount().await.expect("mount");
    list.settled().await;

    view.delete(42).await.expect("delete 42");
    assert_eq!(list.settled().await.data, Some(vec![]));
    assert_eq!(mock.call_count(HttpMethod::Get, &accounts), 2);

    let result = view.delete(43).await;
    assert_eq!(
        result,
        Err(AccountError::Rejected { status: 500, body: "boom".into() })
    );
    let alert = alerts.try_recv().expect("alert");
    assert_eq!(alert.message.as_deref(), Some("Deleting account failed with: boom"));
    assert_eq!(alert.severity.map(|s| s.variant()), Some("danger"));

    settle().await;
    assert_eq!(mock.call_count(HttpMethod::Get, &accounts), 2);
    mock.verify();
}

/// A transport failure on the identity read sends the client to the login
/// page once, without retrying.
#[tokio::test]
async fn test_identity_transport_failure_redirects() {
    let mock = MockTransport::new();
    let identity_url = format!("{API}/user/login");
    mock.expect_get(identity_url.clone())
        .return_err(TransportError::Request("connection refused".into()));
    let dashboard = start(&mock);
    let ctx = dashboard.context();

    let nav = NavView::new(ctx.clone());
    let mut identity = nav.mount().await.expect("mount");
    let outcome = nav.identity(&identity.settled().await);

    assert_eq!(outcome, GuardOutcome::Redirected(LOGIN_URL.into()));
    assert_eq!(ctx.router.location(), Location::External(LOGIN_URL.into()));
    assert!(ctx.session.user().is_none());

    settle().await;
    assert_eq!(mock.call_count(HttpMethod::Get, &identity_url), 1);
}

#[tokio::test]
async fn test_identity_unauthorized_redirects() {
    let mock = MockTransport::new();
    mock.expect_get(format!("{API}/user/login")).return_text(401, "Unauthorized");
    let dashboard = start(&mock);
    let ctx = dashboard.context();

    let nav = NavView::new(ctx.clone());
    let mut identity = nav.mount().await.expect("mount");
    nav.identity(&identity.settled().await);

    assert_eq!(ctx.router.location(), Location::External(LOGIN_URL.into()));
    assert_eq!(nav.greeting(), None);
}

/// Alerts mounted through the dashboard use the configured timings.
#[tokio::test(start_paused = true)]
async fn test_mounted_region_auto_closes() {
    let dashboard = start(&MockTransport::new());
    let region = dashboard.mount_alerts(DEFAULT_CHANNEL, false);
    let alerts = dashboard.context().alerts;

    alerts.success("Saved", AlertOptions::default().auto_close());
    settle().await;
    assert_eq!(region.alerts().len(), 1);

    tokio::time::advance(Duration::from_millis(2999)).await;
    settle().await;
    assert_eq!(region.alerts().len(), 1);

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert!(region.alerts().is_empty());
}

/// Navigating drops alerts that do not survive route changes.
#[tokio::test]
async fn test_route_change_clears_alerts() {
    let dashboard = start(&MockTransport::new());
    let region = dashboard.mount_alerts(DEFAULT_CHANNEL, false);
    let ctx = dashboard.context();

    ctx.alerts.error("transient", AlertOptions::default());
    ctx.alerts.info("sticky", AlertOptions::default().keep_after_route_change());
    settle().await;
    assert_eq!(region.alerts().len(), 2);

    ctx.router.push("/networks");
    settle().await;

    let shown = region.alerts();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].alert.message.as_deref(), Some("sticky"));
    assert!(!shown[0].alert.keep_after_route_change);
}
