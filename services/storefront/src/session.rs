//! Session management over the session scalar
//!
//! The logged-in user is identified by a decimal user id stored under the
//! session key of the store's backend. There are no passwords.

use common::KeyValueStore;
use tracing::{debug, info};

use crate::error::{ShopError, ShopResult};
use crate::models::{Registration, User, UserId};
use crate::store::Store;

/// Session manager for login state
pub struct SessionManager<'a, S> {
    store: &'a mut Store<S>,
}

impl<'a, S: KeyValueStore> SessionManager<'a, S> {
    /// Create a new session manager
    pub fn new(store: &'a mut Store<S>) -> Self {
        Self { store }
    }

    /// Id stored in the session scalar, if it parses
    pub fn current_user_id(&self) -> ShopResult<Option<UserId>> {
        let raw = self.store.storage().load(&self.store.keys().session)?;
        Ok(raw.and_then(|raw| raw.parse().ok()))
    }

    /// The logged-in user. A missing, malformed or dangling session
    /// scalar all mean nobody is logged in.
    pub fn current_user(&self) -> ShopResult<Option<User>> {
        let Some(user_id) = self.current_user_id()? else {
            return Ok(None);
        };
        let user = self.store.find_user(user_id).cloned();
        if user.is_none() {
            debug!("Session points at unknown user {}", user_id);
        }
        Ok(user)
    }

    /// Log in by username, ignoring case
    pub fn login(&mut self, username: &str) -> ShopResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ShopError::MissingField("username"));
        }
        let user = self
            .store
            .find_user_by_name(username)
            .cloned()
            .ok_or_else(|| ShopError::NotFound(format!("user {username}")))?;

        self.start(user.id)?;
        Ok(user)
    }

    /// Create an account and log it in
    pub fn register(&mut self, registration: Registration) -> ShopResult<User> {
        let user = self.store.create_user(registration)?;
        self.start(user.id)?;
        Ok(user)
    }

    /// Clear the session scalar
    pub fn logout(&mut self) -> ShopResult<()> {
        let key = self.store.keys().session.clone();
        self.store.storage_mut().remove(&key)?;
        info!("Session cleared");
        Ok(())
    }

    fn start(&mut self, user_id: UserId) -> ShopResult<()> {
        let key = self.store.keys().session.clone();
        self.store
            .storage_mut()
            .save(&key, &user_id.to_string())?;
        info!("Session started for user {}", user_id);
        Ok(())
    }
}
