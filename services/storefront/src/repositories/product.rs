//! Product catalog operations

use common::KeyValueStore;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{ShopError, ShopResult};
use crate::format::placeholder_image;
use crate::models::{NewProduct, PriceError, Product, ProductId, Role, UserId, parse_price};
use crate::store::{Store, next_id, require_role};

impl<S: KeyValueStore> Store<S> {
    /// Every product, in insertion order
    pub fn list_products(&self) -> &[Product] {
        &self.document().products
    }

    /// Products whose seller is exactly `seller_id`
    pub fn list_products_by_seller(&self, seller_id: UserId) -> Vec<&Product> {
        self.list_products()
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .collect()
    }

    /// Case-insensitive search over product names and descriptions.
    /// A blank query returns the whole catalog.
    pub fn search_products(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.list_products()
            .iter()
            .filter(|p| needle.is_empty() || p.matches(&needle))
            .collect()
    }

    pub fn find_product(&self, product_id: ProductId) -> Option<&Product> {
        self.document().product(product_id)
    }

    /// Name to show for a seller, `None` if the seller does not exist
    pub fn seller_name(&self, seller_id: UserId) -> Option<&str> {
        self.document().user(seller_id).map(|u| u.display_name())
    }

    /// Add a product on behalf of a company. An unparseable price is stored
    /// as 0; one above [`MAX_PRICE`](crate::models::MAX_PRICE) is rejected.
    pub fn add_product(&mut self, seller_id: UserId, new_product: NewProduct) -> ShopResult<Product> {
        self.mutate(|doc| {
            require_role(doc, seller_id, Role::Company, "adding a product")?;

            let name = new_product.name.trim().to_string();
            if name.is_empty() {
                return Err(ShopError::MissingField("name"));
            }
            let price = match parse_price(&new_product.price) {
                Ok(price) => price,
                Err(PriceError::Invalid) => {
                    debug!("Price {:?} is not a non-negative number, using 0", new_product.price);
                    Decimal::ZERO
                }
                Err(e) => return Err(e.into()),
            };
            let image = match new_product.image.trim() {
                "" => placeholder_image(&name),
                image => image.to_string(),
            };

            let product = Product {
                id: ProductId::new(next_id(doc)?),
                seller_id,
                name,
                price,
                desc: new_product.desc,
                image,
            };
            doc.products.push(product.clone());
            info!("Seller {} added product {}", seller_id, product.id);
            Ok(product)
        })
    }

    /// Delete a product owned by the calling company.
    ///
    /// Carts and past orders that reference it are left as they are.
    pub fn remove_product(&mut self, caller_id: UserId, product_id: ProductId) -> ShopResult<Product> {
        self.mutate(|doc| {
            let Some(index) = doc.products.iter().position(|p| p.id == product_id) else {
                return Err(ShopError::NotFound(format!("product {product_id}")));
            };
            require_role(doc, caller_id, Role::Company, "removing a product")?;
            if doc.products[index].seller_id != caller_id {
                return Err(ShopError::Unauthorized(format!(
                    "product {product_id} is not owned by user {caller_id}"
                )));
            }

            let product = doc.products.remove(index);
            info!("Seller {} removed product {}", caller_id, product_id);
            Ok(product)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MAX_PRICE, Registration};
    use crate::store::tests::seeded_store;

    const BUYER: UserId = UserId::new(1);
    const MEGACORP: UserId = UserId::new(2);

    fn new_product(name: &str, price: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: price.to_string(),
            ..NewProduct::default()
        }
    }

    #[test]
    fn test_list_products_keeps_insertion_order() {
        let mut store = seeded_store();
        store.add_product(MEGACORP, new_product("Keyboard", "5000")).unwrap();

        let names: Vec<&str> = store.list_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ноутбук 16GB RAM", "Игровая мышь", "Keyboard"]);
    }

    #[test]
    fn test_add_product_trims_and_coerces() {
        let mut store = seeded_store();
        let product = store
            .add_product(MEGACORP, new_product("  Monitor  ", "not a price"))
            .unwrap();

        assert_eq!(product.name, "Monitor");
        assert_eq!(product.price, Decimal::ZERO);
        assert!(product.image.starts_with("data:image/svg+xml"));
        assert!(product.id.get() > 101);

        store.reload().unwrap();
        assert_eq!(store.find_product(product.id), Some(&product));
    }

    #[test]
    fn test_add_product_keeps_given_image() {
        let mut store = seeded_store();
        let mut input = new_product("Cable", "990");
        input.image = "https://example.com/cable.png".to_string();

        let product = store.add_product(MEGACORP, input).unwrap();
        assert_eq!(product.image, "https://example.com/cable.png");
        assert_eq!(product.price, Decimal::from(990));
    }

    #[test]
    fn test_add_product_requires_company() {
        let mut store = seeded_store();
        let result = store.add_product(BUYER, new_product("Stolen", "1"));
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));

        let result = store.add_product(UserId::new(404), new_product("Ghost", "1"));
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));
        assert_eq!(store.list_products().len(), 2);
    }

    #[test]
    fn test_add_product_requires_name() {
        let mut store = seeded_store();
        let result = store.add_product(MEGACORP, new_product("   ", "100"));
        assert!(matches!(result, Err(ShopError::MissingField("name"))));
    }

    #[test]
    fn test_add_product_rejects_oversized_price() {
        let mut store = seeded_store();
        for price in ["79228162514264337593543950335", "5e28", "1000000000000.5"] {
            let result = store.add_product(MEGACORP, new_product("Yacht", price));
            assert!(
                matches!(result, Err(ShopError::Price(PriceError::TooLarge))),
                "{price} was accepted"
            );
        }

        store.reload().unwrap();
        assert_eq!(store.list_products().len(), 2);
    }

    #[test]
    fn test_largest_price_survives_cart_checkout_and_reload() {
        let mut store = seeded_store();
        let product = store
            .add_product(MEGACORP, new_product("Yacht", "1000000000000"))
            .unwrap();
        store.add_to_cart(BUYER, product.id, u32::MAX).unwrap();

        let summary = store.cart_summary(BUYER).unwrap();
        assert_eq!(summary.total, Decimal::from(MAX_PRICE) * Decimal::from(u32::MAX));
        let order = store.checkout(BUYER).unwrap();
        assert_eq!(order.total, summary.total);

        store.reload().unwrap();
        assert_eq!(store.list_users().len(), 2);
        assert_eq!(store.find_product(product.id), Some(&product));
        assert_eq!(store.find_order(order.id), Some(&order));
    }

    #[test]
    fn test_precise_price_reads_back_exactly() {
        let mut store = seeded_store();
        let product = store
            .add_product(MEGACORP, new_product("Gold", "1234567890.123456789"))
            .unwrap();
        store.add_to_cart(BUYER, product.id, 3).unwrap();
        let order = store.checkout(BUYER).unwrap();

        store.reload().unwrap();
        let stored = store.find_product(product.id).unwrap();
        assert_eq!(stored.price.to_string(), "1234567890.123456789");
        assert_eq!(store.find_order(order.id), Some(&order));
        assert_eq!(order.total.to_string(), "3703703670.370370367");
    }

    #[test]
    fn test_ids_stay_unique_in_quick_succession() {
        let mut store = seeded_store();
        let a = store.add_product(MEGACORP, new_product("A", "1")).unwrap();
        let b = store.add_product(MEGACORP, new_product("B", "1")).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_remove_product_enforces_ownership() {
        let mut store = seeded_store();
        let rival = store
            .session()
            .register(Registration::company("rival", "Rival LLC"))
            .unwrap();

        let result = store.remove_product(rival.id, ProductId::new(100));
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));
        assert!(store.find_product(ProductId::new(100)).is_some());

        let result = store.remove_product(BUYER, ProductId::new(100));
        assert!(matches!(result, Err(ShopError::Unauthorized(_))));
    }

    #[test]
    fn test_remove_product_by_owner() {
        let mut store = seeded_store();
        let removed = store.remove_product(MEGACORP, ProductId::new(100)).unwrap();

        assert_eq!(removed.id, ProductId::new(100));
        assert!(store.find_product(ProductId::new(100)).is_none());

        let result = store.remove_product(MEGACORP, ProductId::new(100));
        assert!(matches!(result, Err(ShopError::NotFound(_))));
    }

    #[test]
    fn test_list_products_by_seller() {
        let mut store = seeded_store();
        let rival = store
            .session()
            .register(Registration::company("rival", ""))
            .unwrap();
        store.add_product(rival.id, new_product("Rival thing", "10")).unwrap();

        assert_eq!(store.list_products_by_seller(MEGACORP).len(), 2);
        assert_eq!(store.list_products_by_seller(rival.id).len(), 1);
        assert!(store.list_products_by_seller(BUYER).is_empty());
    }

    #[test]
    fn test_search_products() {
        let store = seeded_store();
        assert_eq!(store.search_products("").len(), 2);
        assert_eq!(store.search_products("  НОУТБУК ").len(), 1);
        assert_eq!(store.search_products("rgb")[0].id, ProductId::new(101));
        assert!(store.search_products("tablet").is_empty());
    }

    #[test]
    fn test_seller_name() {
        let mut store = seeded_store();
        assert_eq!(store.seller_name(MEGACORP), Some("MegaCorp"));
        assert_eq!(store.seller_name(UserId::new(404)), None);

        let rival = store
            .session()
            .register(Registration::company("rival", ""))
            .unwrap();
        assert_eq!(store.seller_name(rival.id), Some("rival"));
    }
}
