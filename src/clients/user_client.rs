use serde_json::Value;

use crate::framework::{CacheError, ResourceClient, ResourceKey, ResourceState, Subscription};
use crate::model::User;

/// Client for the identity endpoints of both base URLs.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient,
    oauth_base_url: String,
}

impl UserClient {
    pub fn new(inner: ResourceClient, oauth_base_url: impl Into<String>) -> Self {
        Self {
            inner,
            oauth_base_url: oauth_base_url.into(),
        }
    }

    /// The "who am I" read.
    pub async fn identity(&self) -> Result<Subscription<User>, CacheError> {
        self.inner.subscribe("/user/login").await
    }

    pub async fn current(&self) -> Result<ResourceState<User>, CacheError> {
        self.inner.read("/user/login").await
    }

    /// Token exchange read on the OAuth endpoint.
    pub async fn token(&self, state: &str) -> Result<ResourceState<Value>, CacheError> {
        let key = ResourceKey::from(format!("{}/token?state={}", self.oauth_base_url, state));
        self.inner.read_key(key).await
    }

    pub fn login_url(&self) -> String {
        format!("{}/auth/google", self.oauth_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{HttpMethod, ResourceCache};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(mock: &MockTransport) -> UserClient {
        let (cache, inner) =
            ResourceCache::new(8, Arc::new(mock.clone()), "http://api.test", Duration::from_secs(60));
        tokio::spawn(cache.run());
        UserClient::new(inner, "http://oauth.test")
    }

    #[tokio::test]
    async fn test_token_is_read_from_oauth_base() {
        let mock = MockTransport::new();
        let url = "http://oauth.test/token?state=abc123";
        mock.expect_get(url).return_json(200, json!({"token": "t"}));
        let users = client(&mock);

        let first = users.token("abc123").await.unwrap();
        assert!(first.is_validating);

        let mut token = users
            .inner
            .subscribe_key::<Value>(ResourceKey::from(url))
            .await
            .unwrap();
        let state = token.settled().await;

        assert_eq!(state.data, Some(json!({"token": "t"})));
        assert_eq!(mock.call_count(HttpMethod::Get, url), 1);
        mock.verify();
    }

    #[test]
    fn test_login_url() {
        let (_, inner) = ResourceCache::new(
            1,
            Arc::new(MockTransport::new()),
            "http://api.test",
            Duration::from_secs(1),
        );
        assert_eq!(
            UserClient::new(inner, "http://oauth.test").login_url(),
            "http://oauth.test/auth/google"
        );
    }
}
