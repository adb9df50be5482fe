//! Common library for the storefront workspace
//!
//! This crate provides the key-value storage layer shared by the
//! storefront: the `KeyValueStore` contract, its in-memory, file and Redis
//! backends, and the error type they report.
//!
//! ```rust
//! use common::{KeyValueStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.save("greeting", "hello").unwrap();
//! assert_eq!(store.load("greeting").unwrap().as_deref(), Some("hello"));
//! ```

pub mod cache;
pub mod error;
pub mod storage;

pub use cache::RedisStore;
pub use error::{StorageError, StorageResult};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StorageBackend, StorageConfig, open_store,
};
