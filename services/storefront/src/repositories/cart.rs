//! Cart operations

use common::KeyValueStore;
use tracing::{debug, info};

use crate::error::{ShopError, ShopResult};
use crate::models::order::{checked_total, line_subtotal};
use crate::models::{Cart, CartLine, CartSummary, ProductId, Role, UserId};
use crate::store::{Store, require_role};

impl<S: KeyValueStore> Store<S> {
    /// The user's cart. A user without one gets an empty cart; nothing is
    /// written until the cart changes.
    pub fn get_cart(&self, user_id: UserId) -> Cart {
        self.document()
            .carts
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a buyer's cart wholesale. Lines for the same product are
    /// merged and zero-quantity lines dropped before saving.
    pub fn save_cart(&mut self, user_id: UserId, mut cart: Cart) -> ShopResult<Cart> {
        self.mutate(|doc| {
            require_role(doc, user_id, Role::User, "saving a cart")?;
            cart.normalize();
            doc.carts.insert(user_id, cart.clone());
            Ok(cart)
        })
    }

    /// Add `qty` of a product to a buyer's cart, merging with an existing
    /// line. A quantity of zero is treated as one.
    pub fn add_to_cart(&mut self, user_id: UserId, product_id: ProductId, qty: u32) -> ShopResult<Cart> {
        self.mutate(|doc| {
            require_role(doc, user_id, Role::User, "adding to cart")?;
            if doc.product(product_id).is_none() {
                return Err(ShopError::NotFound(format!("product {product_id}")));
            }
            let qty = if qty == 0 {
                debug!("Quantity 0 for product {} coerced to 1", product_id);
                1
            } else {
                qty
            };

            let cart = doc.carts.entry(user_id).or_default();
            cart.add(product_id, qty);
            info!("User {} added {} x product {} to cart", user_id, qty, product_id);
            Ok(cart.clone())
        })
    }

    /// Drop a product's line from the cart. Absent lines are ignored.
    pub fn remove_from_cart(&mut self, user_id: UserId, product_id: ProductId) -> ShopResult<Cart> {
        self.mutate(|doc| match doc.carts.get_mut(&user_id) {
            Some(cart) => {
                if cart.remove(product_id) {
                    info!("User {} removed product {} from cart", user_id, product_id);
                }
                Ok(cart.clone())
            }
            None => Ok(Cart::default()),
        })
    }

    /// Price the cart at current product prices.
    ///
    /// Lines for products that have since been deleted are left out.
    pub fn cart_summary(&self, user_id: UserId) -> ShopResult<CartSummary> {
        let mut lines = Vec::new();
        for item in self.get_cart(user_id).items {
            let Some(product) = self.find_product(item.product_id) else {
                continue;
            };
            let subtotal =
                line_subtotal(product.price, item.qty).ok_or(ShopError::AmountOverflow)?;
            lines.push(CartLine {
                product: product.clone(),
                qty: item.qty,
                subtotal,
            });
        }
        let total = checked_total(lines.iter().map(|l| Some(l.subtotal)))?;
        Ok(CartSummary { lines, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use crate::store::tests::seeded_store;
    use rust_decimal::Decimal;

    const BUYER: UserId = UserId::new(1);
    const MEGACORP: UserId = UserId::new(2);
    const LAPTOP: ProductId = ProductId::new(100);
    const MOUSE: ProductId = ProductId::new(101);

    #[test]
    fn test_get_cart_is_lazy() {
        let store = seeded_store();
        assert!(store.get_cart(BUYER).is_empty());
        assert!(store.document().carts.is_empty());
    }

    #[test]
    fn test_add_to_cart_merges_quantities() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        let cart = store.add_to_cart(BUYER, LAPTOP, 2).unwrap();

        assert_eq!(
            cart.items,
            vec![LineItem {
                product_id: LAPTOP,
                qty: 3
            }]
        );
        store.reload().unwrap();
        assert_eq!(store.get_cart(BUYER), cart);
    }

    #[test]
    fn test_add_to_cart_zero_quantity_counts_as_one() {
        let mut store = seeded_store();
        let cart = store.add_to_cart(BUYER, MOUSE, 0).unwrap();
        assert_eq!(cart.quantity_of(MOUSE), 1);
    }

    #[test]
    fn test_add_to_cart_requires_buyer() {
        let mut store = seeded_store();
        let result = store.add_to_cart(MEGACORP, LAPTOP, 1);
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));
        assert!(store.document().carts.is_empty());
    }

    #[test]
    fn test_add_to_cart_unknown_product() {
        let mut store = seeded_store();
        let result = store.add_to_cart(BUYER, ProductId::new(999), 1);
        assert!(matches!(result, Err(ShopError::NotFound(_))));
    }

    #[test]
    fn test_remove_from_cart() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        store.add_to_cart(BUYER, MOUSE, 1).unwrap();

        let cart = store.remove_from_cart(BUYER, LAPTOP).unwrap();
        assert_eq!(cart.quantity_of(LAPTOP), 0);
        assert_eq!(cart.quantity_of(MOUSE), 1);

        let unchanged = store.remove_from_cart(BUYER, LAPTOP).unwrap();
        assert_eq!(unchanged, cart);

        assert!(store.remove_from_cart(UserId::new(404), LAPTOP).unwrap().is_empty());
    }

    #[test]
    fn test_save_cart_replaces_wholesale() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 5).unwrap();

        let mut replacement = Cart::default();
        replacement.add(MOUSE, 2);
        store.save_cart(BUYER, replacement.clone()).unwrap();

        store.reload().unwrap();
        assert_eq!(store.get_cart(BUYER), replacement);
    }

    #[test]
    fn test_save_cart_merges_and_drops_empty_lines() {
        let mut store = seeded_store();
        let cart = Cart {
            items: vec![
                LineItem { product_id: LAPTOP, qty: 0 },
                LineItem { product_id: MOUSE, qty: 1 },
                LineItem { product_id: MOUSE, qty: 2 },
            ],
        };

        let saved = store.save_cart(BUYER, cart).unwrap();

        assert_eq!(saved.items, vec![LineItem { product_id: MOUSE, qty: 3 }]);
        store.reload().unwrap();
        assert_eq!(store.get_cart(BUYER), saved);
    }

    #[test]
    fn test_save_cart_requires_buyer() {
        let mut store = seeded_store();
        let mut cart = Cart::default();
        cart.add(LAPTOP, 2);

        let result = store.save_cart(MEGACORP, cart.clone());
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));
        let result = store.save_cart(UserId::new(404), cart);
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));

        store.reload().unwrap();
        assert!(store.document().carts.is_empty());
    }

    #[test]
    fn test_cart_summary_uses_live_prices_and_skips_deleted() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 2).unwrap();
        store.add_to_cart(BUYER, MOUSE, 1).unwrap();

        let summary = store.cart_summary(BUYER).unwrap();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.total, Decimal::from(2 * 299_000 + 12_990));

        store.remove_product(MEGACORP, LAPTOP).unwrap();
        let summary = store.cart_summary(BUYER).unwrap();
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].subtotal, Decimal::from(12_990));
        assert_eq!(summary.total, Decimal::from(12_990));
    }

    #[test]
    fn test_cart_summary_reports_overflow() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 2).unwrap();
        store
            .mutate(|doc| {
                for p in doc.products.iter_mut().filter(|p| p.id == LAPTOP) {
                    p.price = Decimal::MAX;
                }
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            store.cart_summary(BUYER),
            Err(ShopError::AmountOverflow)
        ));
    }
}
