//! Storefront models

pub mod cart;
pub mod document;
pub mod id;
mod money;
pub mod order;
pub mod product;
pub mod user;

// Re-export for convenience
pub use cart::{Cart, CartLine, CartSummary, LineItem};
pub use document::Document;
pub use id::{OrderId, ProductId, UserId};
pub use order::{Order, OrderItem};
pub use product::{MAX_PRICE, NewProduct, PriceError, Product, parse_price};
pub use user::{Profile, ProfileUpdate, Registration, Role, User};
