//! Product model and related functionality

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ProductId, UserId};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub seller_id: UserId,
    pub name: String,
    #[serde(with = "super::money")]
    pub price: Decimal,
    #[serde(default)]
    pub desc: String,
    /// URI or data URI
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Case-insensitive match of `needle` against name or description.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.desc.to_lowercase().contains(needle)
    }
}

/// New product payload, as typed into the product form
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    /// Raw price text. Anything that is not a non-negative number becomes 0;
    /// a number above [`MAX_PRICE`] is rejected.
    pub price: String,
    pub desc: String,
    /// Blank means a generated placeholder
    pub image: String,
}

/// Largest accepted price. Any accepted price times any `u32` quantity
/// still fits in a `Decimal`.
pub const MAX_PRICE: u64 = 1_000_000_000_000;

/// Why a typed price could not be used as-is
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// Not a number, or negative. Callers store zero instead.
    #[error("price is not a non-negative number")]
    Invalid,

    #[error("price exceeds {}", MAX_PRICE)]
    TooLarge,
}

/// Parse a price typed by a seller. Blank input means zero.
pub fn parse_price(raw: &str) -> Result<Decimal, PriceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| match raw.parse::<f64>() {
            // Numeric, but past what a Decimal can hold
            Ok(f) if f.is_finite() && f > MAX_PRICE as f64 => PriceError::TooLarge,
            _ => PriceError::Invalid,
        })?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Invalid);
    }
    if price > Decimal::from(MAX_PRICE) {
        return Err(PriceError::TooLarge);
    }
    Ok(price.abs())
}
