//! Redis storage backend
//!
//! This module provides a `KeyValueStore` backed by Redis, using plain
//! `GET`/`SET`/`DEL` without expiry.

use redis::{Client, Commands, Connection};
use tracing::info;

use crate::error::StorageResult;
use crate::storage::KeyValueStore;

/// Redis-backed key-value store
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Create a client for the given URL. No connection is made until the
    /// first operation.
    pub fn new(url: &str) -> StorageResult<Self> {
        let client = Client::open(url)?;
        info!("Redis client initialized with URL: {}", url);
        Ok(RedisStore { client })
    }

    /// Get a connection from the client
    fn get_connection(&self) -> StorageResult<Connection> {
        Ok(self.client.get_connection()?)
    }

    /// Check if Redis is reachable
    pub fn health_check(&self) -> StorageResult<bool> {
        let mut conn = self.get_connection()?;
        let pong: String = redis::cmd("PING").query(&mut conn)?;
        Ok(pong == "PONG")
    }
}

impl KeyValueStore for RedisStore {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.get_connection()?;
        let value: Option<String> = conn.get(key)?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let _: () = conn.set(key, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let _: u64 = conn.del(key)?;
        Ok(())
    }
}
