//! Storefront data store
//!
//! Catalog, registration, cart and checkout over a single JSON document
//! kept in a key-value backend from the `common` crate.
//!
//! ```rust
//! use common::MemoryStore;
//! use storefront::{ProductId, Store, StoreKeys};
//!
//! let mut store = Store::open(MemoryStore::new(), StoreKeys::default()).unwrap();
//! store.initialize().unwrap();
//!
//! let buyer = store.session().login("buyer").unwrap();
//! store.add_to_cart(buyer.id, ProductId::new(100), 2).unwrap();
//! let order = store.checkout(buyer.id).unwrap();
//! assert!(store.get_cart(buyer.id).is_empty());
//! assert_eq!(order.items[0].qty, 2);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod repositories;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use error::{ShopError, ShopResult};
pub use format::{format_price, placeholder_image};
pub use models::{
    Cart, CartLine, CartSummary, Document, LineItem, MAX_PRICE, NewProduct, Order, OrderId,
    OrderItem, PriceError, Product, ProductId, Profile, ProfileUpdate, Registration, Role, User,
    UserId,
};
pub use session::SessionManager;
pub use store::{Store, StoreKeys};
