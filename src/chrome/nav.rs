//! Page frame: navbar, "New" menu and the home greeting, all driven by the
//! guarded identity read.

use super::images::{avatar_or, DEFAULT_USER_AVATAR};
use crate::clients::UserClient;
use crate::context::DashboardContext;
use crate::framework::{CacheError, ResourceState, Subscription};
use crate::layout::{one_or_other, StackDirection};
use crate::model::User;
use crate::session::GuardOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

const NAV_ITEMS: [(&str, &str); 3] = [("Home", "/"), ("Networks", "/networks"), ("Nodes", "/nodes")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navbar {
    pub items: Vec<NavItem>,
    pub direction: StackDirection,
    pub avatar: String,
    /// `Logged as {email}`, once known.
    pub header: Option<String>,
}

/// What a "New" menu entry does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    Route(String),
    External(String),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub target: MenuTarget,
}

/// Frame shared by every page.
pub struct NavView {
    ctx: DashboardContext,
    users: UserClient,
}

impl NavView {
    pub fn new(ctx: DashboardContext) -> Self {
        let users = UserClient::new(ctx.client.clone(), ctx.oauth_base_url.clone());
        Self { ctx, users }
    }

    /// Subscribes the identity read for as long as the frame is mounted.
    pub async fn mount(&self) -> Result<Subscription<User>, CacheError> {
        self.users.identity().await
    }

    /// Applies the identity read through the session guard.
    pub fn identity(&self, state: &ResourceState<User>) -> GuardOutcome<User> {
        self.ctx.guard.resolve_identity(state)
    }

    pub fn navbar(&self, current_path: &str) -> Navbar {
        let user = self.ctx.session.user();
        let items = NAV_ITEMS
            .iter()
            .map(|&(label, path)| NavItem {
                label,
                path,
                active: is_active(path, current_path),
            })
            .collect();
        Navbar {
            items,
            direction: one_or_other(StackDirection::Horizontal, StackDirection::Vertical, self.ctx.viewport),
            avatar: avatar_or(
                self.ctx.api_base_url(),
                user.as_ref().and_then(|u| u.avatar.as_deref()),
                DEFAULT_USER_AVATAR,
            ),
            header: user.and_then(|u| u.email).map(|email| format!("Logged as {}", email)),
        }
    }

    pub fn new_menu(&self) -> Vec<MenuItem> {
        vec![
            MenuItem {
                label: "Add Instagram (non-official)",
                target: MenuTarget::Route("/accounts/add".to_string()),
            },
            MenuItem {
                label: "Add Instagram (official)",
                target: MenuTarget::External(format!("{}/provider/Instagram", self.ctx.api_base_url())),
            },
            MenuItem {
                label: "Add Youtube",
                target: MenuTarget::Unavailable,
            },
        ]
    }

    /// Follows a menu entry. Unavailable entries do nothing.
    pub fn select(&self, item: &MenuItem) {
        match &item.target {
            MenuTarget::Route(path) => self.ctx.router.push(path),
            MenuTarget::External(url) => self.ctx.router.redirect(url),
            MenuTarget::Unavailable => {}
        }
    }

    /// Home page greeting; `None` while the identity is loading.
    pub fn greeting(&self) -> Option<String> {
        let email = self.ctx.session.user()?.email?;
        Some(format!("Hello {}", email))
    }

    pub fn logout(&self) {
        self.ctx.guard.logout();
    }
}

fn is_active(item: &str, current: &str) -> bool {
    if item == "/" {
        current == "/"
    } else {
        current == item || current.starts_with(&format!("{}/", item))
    }
}
