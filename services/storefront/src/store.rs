//! Domain store over a single persisted document
//!
//! The store loads the document once, keeps it in memory and writes the
//! whole document back after every successful mutation. Mutations run
//! against a working copy that replaces the cached document only once it
//! has been saved, so a failed operation changes nothing.

use chrono::Utc;
use common::KeyValueStore;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ShopError, ShopResult};
use crate::models::{Document, Role, User, UserId};
use crate::session::SessionManager;

/// Storage keys for the document and the session scalar
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub document: String,
    pub session: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            document: "kaspi_demo_db_v2".to_string(),
            session: "kaspi_demo_auth_v2".to_string(),
        }
    }
}

/// Cached storefront document bound to a storage backend
pub struct Store<S> {
    storage: S,
    keys: StoreKeys,
    document: Document,
}

impl<S: KeyValueStore> Store<S> {
    /// Load the document from `storage`. A missing or unreadable document
    /// yields an empty one.
    pub fn open(storage: S, keys: StoreKeys) -> ShopResult<Self> {
        let document = read_document(&storage, &keys.document)?;
        info!(
            "Store opened with {} users, {} products, {} orders",
            document.users.len(),
            document.products.len(),
            document.orders.len()
        );
        Ok(Self {
            storage,
            keys,
            document,
        })
    }

    /// Write the seed document if none exists yet. Returns whether it seeded.
    ///
    /// An existing document is never replaced, even one that fails to parse.
    pub fn initialize(&mut self) -> ShopResult<bool> {
        let existing = self.storage.load(&self.keys.document)?;
        if existing.is_some_and(|raw| !raw.is_empty()) {
            debug!("Document already present at {}", self.keys.document);
            return Ok(false);
        }

        let seed = Document::seed();
        self.storage
            .save(&self.keys.document, &serde_json::to_string(&seed)?)?;
        self.document = seed;
        info!("Seeded document at {}", self.keys.document);
        Ok(true)
    }

    /// Discard the cache and read the document again
    pub fn reload(&mut self) -> ShopResult<()> {
        self.document = read_document(&self.storage, &self.keys.document)?;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Session operations over this store
    pub fn session(&mut self) -> SessionManager<'_, S> {
        SessionManager::new(self)
    }

    /// Close the store and hand back the backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Apply `f` to a copy of the document and persist the result.
    ///
    /// The cache is only replaced after the save succeeds.
    pub(crate) fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut Document) -> ShopResult<T>,
    ) -> ShopResult<T> {
        let mut working = self.document.clone();
        let out = f(&mut working)?;
        let raw = serde_json::to_string(&working)?;
        self.storage.save(&self.keys.document, &raw)?;
        self.document = working;
        Ok(out)
    }
}

fn read_document<S: KeyValueStore>(storage: &S, key: &str) -> ShopResult<Document> {
    let Some(raw) = storage.load(key)? else {
        return Ok(Document::default());
    };
    if raw.is_empty() {
        return Ok(Document::default());
    }
    match serde_json::from_str(&raw) {
        Ok(document) => Ok(document),
        Err(e) => {
            warn!("Document at {} is unreadable, treating it as empty: {}", key, e);
            Ok(Document::default())
        }
    }
}

/// Next record id: the current time in milliseconds, bumped past every id
/// already in the document.
pub(crate) fn next_id(document: &Document) -> ShopResult<u64> {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let above = document
        .max_id()
        .checked_add(1)
        .ok_or(ShopError::IdsExhausted)?;
    Ok(now.max(above))
}

/// Resolve `user_id` to a user holding `role`
pub(crate) fn require_role<'d>(
    document: &'d Document,
    user_id: UserId,
    role: Role,
    action: &str,
) -> ShopResult<&'d User> {
    match document.user(user_id) {
        Some(user) if user.role() == role => Ok(user),
        Some(user) => Err(ShopError::Unauthorized(format!(
            "{action} requires role {role}, user {} is {}",
            user.id,
            user.role()
        ))),
        None => Err(ShopError::Unauthorized(format!(
            "{action} requires role {role}, user {user_id} does not exist"
        ))),
    }
}
