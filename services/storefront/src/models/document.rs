//! The persisted aggregate holding every storefront record

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::Cart;
use super::id::{ProductId, UserId};
use super::order::Order;
use super::product::Product;
use super::user::{Profile, User};
use crate::format::placeholder_image;

/// Users, products, orders and carts, serialized as one JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub carts: BTreeMap<UserId, Cart>,
}

impl Document {
    /// The document written on first run: one buyer, one company and two of
    /// its products.
    pub fn seed() -> Self {
        let buyer = User {
            id: UserId::new(1),
            username: "buyer".to_string(),
            email: "buyer@example.com".to_string(),
            phone: "+7 700 000 0000".to_string(),
            profile: Profile::User { orders: Vec::new() },
        };
        let company = User {
            id: UserId::new(2),
            username: "megacorp".to_string(),
            email: "sales@megacorp.kz".to_string(),
            phone: "+7 701 111 2233".to_string(),
            profile: Profile::Company {
                company_name: "MegaCorp".to_string(),
                desc: "Официальный магазин электроники".to_string(),
            },
        };
        let products = vec![
            Product {
                id: ProductId::new(100),
                seller_id: company.id,
                name: "Ноутбук 16GB RAM".to_string(),
                price: Decimal::from(299_000),
                desc: "Лёгкий, быстрый, рабочий зверь".to_string(),
                image: placeholder_image("Ноутбук"),
            },
            Product {
                id: ProductId::new(101),
                seller_id: company.id,
                name: "Игровая мышь".to_string(),
                price: Decimal::from(12_990),
                desc: "Сенсор 26К DPI, RGB".to_string(),
                image: placeholder_image("Мышь"),
            },
        ];

        Self {
            users: vec![buyer, company],
            products,
            orders: Vec::new(),
            carts: BTreeMap::new(),
        }
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Case-insensitive username lookup
    pub fn user_by_name(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_username(username))
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Largest id used by any record, 0 for an empty document
    pub fn max_id(&self) -> u64 {
        let users = self.users.iter().map(|u| u.id.get());
        let products = self.products.iter().map(|p| p.id.get());
        let orders = self.orders.iter().map(|o| o.id.get());
        users.chain(products).chain(orders).max().unwrap_or(0)
    }
}
