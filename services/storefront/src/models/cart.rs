//! Cart model and related functionality

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product line in a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub qty: u32,
}

/// A buyer's cart, one per user id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `qty` of a product, merging into an existing line
    pub fn add(&mut self, product_id: ProductId, qty: u32) {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.qty = item.qty.saturating_add(qty),
            None => self.items.push(LineItem { product_id, qty }),
        }
    }

    /// Drop the line for a product. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Merge lines for the same product and drop zero-quantity lines,
    /// keeping first-seen order
    pub fn normalize(&mut self) {
        for item in std::mem::take(&mut self.items) {
            if item.qty > 0 {
                self.add(item.product_id, item.qty);
            }
        }
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map_or(0, |i| i.qty)
    }
}

/// Cart line joined with the live product
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub qty: u32,
    pub subtotal: Decimal,
}

/// Cart priced at current product prices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}
