//! Order model and related functionality

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use super::product::Product;
use crate::error::{ShopError, ShopResult};

/// Snapshot of a cart line taken at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub qty: u32,
    #[serde(with = "super::money")]
    pub price_at_purchase: Decimal,
    pub seller_id: UserId,
}

impl OrderItem {
    /// Freeze the product's current name, price and seller
    pub fn snapshot(product: &Product, qty: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            qty,
            price_at_purchase: product.price,
            seller_id: product.seller_id,
        }
    }

    /// `qty × price_at_purchase`, `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        line_subtotal(self.price_at_purchase, self.qty)
    }
}

/// Order entity. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    #[serde(with = "super::money")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: OrderId,
        user_id: UserId,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
    ) -> ShopResult<Self> {
        let total = checked_total(items.iter().map(OrderItem::subtotal))?;
        Ok(Self {
            id,
            user_id,
            items,
            total,
            created_at,
        })
    }
}

pub(crate) fn line_subtotal(price: Decimal, qty: u32) -> Option<Decimal> {
    price.checked_mul(Decimal::from(qty))
}

/// Sum subtotals, failing if any of them or the sum overflowed
pub(crate) fn checked_total(
    subtotals: impl IntoIterator<Item = Option<Decimal>>,
) -> ShopResult<Decimal> {
    subtotals
        .into_iter()
        .try_fold(Decimal::ZERO, |total, subtotal| total.checked_add(subtotal?))
        .ok_or(ShopError::AmountOverflow)
}
