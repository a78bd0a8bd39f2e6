use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider selected when none is chosen in the account form.
pub const DEFAULT_PROVIDER: &str = "Instagram";

/// A social-media login stored on the server.
///
/// The same shape is used for listing, for the add/edit form state and for
/// the request body, so an edited account round-trips every field the
/// server sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub twofa: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Opaque server session; `None` means the account never logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Value>,
    #[serde(default)]
    pub provider: Provider,
}

/// A social network an account belongs to (listed by `/providers`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "authenticationType", default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
}

impl Provider {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_oauth(&self) -> bool {
        self.authentication_type.as_deref() == Some("oauth")
    }
}

impl Account {
    /// Initial state of the account form.
    pub fn blank() -> Self {
        Self {
            provider: Provider::named(DEFAULT_PROVIDER),
            ..Self::default()
        }
    }
}
