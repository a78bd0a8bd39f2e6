use std::sync::Arc;

use tokio::sync::watch;

use crate::model::User;

/// What every view can know about who is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    pub user: Option<User>,
}

/// Process-wide session state, created once at the root.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<watch::Sender<SessionStore>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        let (store, _) = watch::channel(SessionStore::default());
        Self { store: Arc::new(store) }
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionStore {
        self.store.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.store.borrow().user.clone()
    }

    pub fn set_session(&self, session: SessionStore) {
        self.store.send_replace(session);
    }

    /// Stores the identity. Setting the same user again notifies nobody.
    pub fn set_user(&self, user: User) {
        self.store.send_if_modified(|store| {
            if store.user.as_ref() == Some(&user) {
                return false;
            }
            store.user = Some(user);
            true
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStore> {
        self.store.subscribe()
    }
}
