//! User model and related functionality

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::{OrderId, UserId};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A buyer, owns a cart and orders
    User,
    /// A seller, owns products
    Company,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Company => f.write_str("company"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "company" => Ok(Role::Company),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Role-specific part of a user record, tagged by `role` in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    User {
        #[serde(default)]
        orders: Vec<OrderId>,
    },
    Company {
        #[serde(rename = "companyName", default)]
        company_name: String,
        #[serde(default)]
        desc: String,
    },
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::User { .. } => Role::User,
            Profile::Company { .. } => Role::Company,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub profile: Profile,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Name shown next to a seller's products: the company name, or the
    /// username when no company name was given.
    pub fn display_name(&self) -> &str {
        match &self.profile {
            Profile::Company { company_name, .. } if !company_name.trim().is_empty() => {
                company_name.as_str()
            }
            _ => self.username.as_str(),
        }
    }

    /// Ids of the orders placed by this user, oldest first
    pub fn order_ids(&self) -> &[OrderId] {
        match &self.profile {
            Profile::User { orders } => orders.as_slice(),
            Profile::Company { .. } => &[],
        }
    }

    /// Case-insensitive username comparison
    pub fn has_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }
}

/// New user registration payload
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub role: Role,
    /// Only used for companies. Blank falls back to the username.
    pub company_name: String,
    pub email: String,
    pub phone: String,
}

impl Registration {
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: Role::User,
            company_name: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }

    pub fn company(username: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            role: Role::Company,
            company_name: company_name.into(),
            ..Self::user(username)
        }
    }
}

/// Profile edit payload
///
/// `name` renames a buyer's username or a company's display name.
/// `desc` is ignored for buyers.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub desc: String,
}
