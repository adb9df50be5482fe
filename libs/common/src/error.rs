//! Custom error types for the common library
//!
//! This module defines the error type shared by every key-value storage
//! backend.

use redis::RedisError;
use thiserror::Error;

/// Custom error type for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing the local filesystem
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error occurred while talking to Redis
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// The key cannot be mapped onto the backend
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
