//! Custom error types for the storefront

use common::StorageError;
use thiserror::Error;

use crate::models::PriceError;

/// Custom error type for storefront operations
#[derive(Error, Debug)]
pub enum ShopError {
    /// Caller's role or ownership does not allow the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced user or product does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Username already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Checkout attempted with nothing to buy
    #[error("Cart is empty")]
    EmptyCart,

    /// Price input that cannot be stored
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// A money amount does not fit in a `Decimal`
    #[error("Amount is too large")]
    AmountOverflow,

    /// No id is left above the largest one in the document
    #[error("Record ids exhausted")]
    IdsExhausted,

    /// Required input was blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Document could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for storefront results
pub type ShopResult<T> = Result<T, ShopError>;
