//! Checkout and order history

use chrono::Utc;
use common::KeyValueStore;
use tracing::{info, warn};

use crate::error::{ShopError, ShopResult};
use crate::models::{Cart, Order, OrderId, OrderItem, Profile, Role, UserId};
use crate::store::{Store, next_id, require_role};

impl<S: KeyValueStore> Store<S> {
    /// Every order ever placed, oldest first
    pub fn list_orders(&self) -> &[Order] {
        &self.document().orders
    }

    pub fn find_order(&self, order_id: OrderId) -> Option<&Order> {
        self.document().orders.iter().find(|o| o.id == order_id)
    }

    /// Orders placed by `user_id`, newest first
    pub fn orders_for_user(&self, user_id: UserId) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .list_orders()
            .iter()
            .filter(|o| o.user_id == user_id)
            .collect();
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        orders
    }

    /// Turn the buyer's cart into an order.
    ///
    /// Prices are copied from the products as they are now and never
    /// change afterwards. The order is recorded globally and on the user,
    /// and the cart is emptied, all in one write.
    pub fn checkout(&mut self, user_id: UserId) -> ShopResult<Order> {
        self.mutate(|doc| {
            require_role(doc, user_id, Role::User, "checkout")?;
            let cart = doc.carts.get(&user_id).cloned().unwrap_or_default();
            if cart.is_empty() {
                return Err(ShopError::EmptyCart);
            }

            let mut items = Vec::with_capacity(cart.items.len());
            for line in &cart.items {
                match doc.product(line.product_id) {
                    Some(product) => items.push(OrderItem::snapshot(product, line.qty)),
                    None => warn!(
                        "Skipping product {} in cart of user {}: no longer listed",
                        line.product_id, user_id
                    ),
                }
            }
            if items.is_empty() {
                return Err(ShopError::EmptyCart);
            }

            let order = Order::new(OrderId::new(next_id(doc)?), user_id, items, Utc::now())?;
            doc.orders.push(order.clone());
            if let Some(Profile::User { orders }) = doc.user_mut(user_id).map(|u| &mut u.profile) {
                orders.push(order.id);
            }
            doc.carts.insert(user_id, Cart::default());

            info!(
                "User {} placed order {} with {} items, total {}",
                user_id,
                order.id,
                order.items.len(),
                order.total
            );
            Ok(order)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, ProductId, Registration};
    use crate::store::tests::seeded_store;
    use rust_decimal::Decimal;

    const BUYER: UserId = UserId::new(1);
    const MEGACORP: UserId = UserId::new(2);
    const LAPTOP: ProductId = ProductId::new(100);
    const MOUSE: ProductId = ProductId::new(101);

    #[test]
    fn test_checkout_records_order_everywhere_and_clears_cart() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        store.add_to_cart(BUYER, MOUSE, 3).unwrap();

        let order = store.checkout(BUYER).unwrap();

        assert_eq!(order.user_id, BUYER);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, Decimal::from(299_000 + 3 * 12_990));
        assert!(store.get_cart(BUYER).is_empty());
        assert_eq!(store.find_order(order.id), Some(&order));

        let buyer = store.find_user(BUYER).unwrap();
        assert_eq!(buyer.order_ids(), &[order.id]);

        store.reload().unwrap();
        assert_eq!(store.list_orders(), &[order.clone()]);
        assert!(store.get_cart(BUYER).is_empty());
    }

    #[test]
    fn test_checkout_freezes_prices() {
        let mut store = seeded_store();
        let product = store
            .add_product(
                MEGACORP,
                NewProduct {
                    name: "Widget".to_string(),
                    price: "1000".to_string(),
                    ..NewProduct::default()
                },
            )
            .unwrap();
        store.add_to_cart(BUYER, product.id, 1).unwrap();
        let order = store.checkout(BUYER).unwrap();

        // Reprice the product after the fact
        store
            .mutate(|doc| {
                for p in doc.products.iter_mut().filter(|p| p.id == product.id) {
                    p.price = Decimal::from(2000);
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(store.find_product(product.id).unwrap().price, Decimal::from(2000));
        let stored = store.find_order(order.id).unwrap();
        assert_eq!(stored.items[0].price_at_purchase, Decimal::from(1000));
        assert_eq!(stored.total, Decimal::from(1000));
    }

    #[test]
    fn test_empty_checkout_changes_nothing() {
        let mut store = seeded_store();
        let before = store.document().clone();

        let result = store.checkout(BUYER);

        assert!(matches!(result, Err(ShopError::EmptyCart)));
        assert_eq!(store.document(), &before);
        store.reload().unwrap();
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_checkout_requires_buyer() {
        let mut store = seeded_store();
        let result = store.checkout(MEGACORP);
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));
    }

    #[test]
    fn test_checkout_skips_deleted_products() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        store.add_to_cart(BUYER, MOUSE, 1).unwrap();
        store.remove_product(MEGACORP, LAPTOP).unwrap();

        let order = store.checkout(BUYER).unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, MOUSE);
    }

    #[test]
    fn test_checkout_with_only_deleted_products_is_empty() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        store.remove_product(MEGACORP, LAPTOP).unwrap();

        assert!(matches!(store.checkout(BUYER), Err(ShopError::EmptyCart)));
        assert_eq!(store.get_cart(BUYER).quantity_of(LAPTOP), 1);
    }

    #[test]
    fn test_deleting_product_keeps_past_orders() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        let order = store.checkout(BUYER).unwrap();

        store.remove_product(MEGACORP, LAPTOP).unwrap();

        let stored = store.find_order(order.id).unwrap();
        assert_eq!(stored.items[0].product_id, LAPTOP);
        assert_eq!(stored.items[0].name, "Ноутбук 16GB RAM");
    }

    #[test]
    fn test_orders_for_user_newest_first() {
        let mut store = seeded_store();
        store.add_to_cart(BUYER, LAPTOP, 1).unwrap();
        let first = store.checkout(BUYER).unwrap();
        store.add_to_cart(BUYER, MOUSE, 1).unwrap();
        let second = store.checkout(BUYER).unwrap();

        let other = store.session().register(Registration::user("other")).unwrap();
        store.add_to_cart(other.id, MOUSE, 1).unwrap();
        store.checkout(other.id).unwrap();

        let ids: Vec<OrderId> = store.orders_for_user(BUYER).iter().map(|o| o.id).collect();
        assert_eq!(ids, [second.id, first.id]);
        assert_eq!(store.list_orders().len(), 3);
    }
}
