//! JSON encoding for money amounts
//!
//! Amounts are written as JSON numbers whenever the number reads back to
//! exactly the same value, and as decimal strings otherwise. Both forms are
//! accepted on read.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.is_integer() {
        if let Some(n) = amount.to_i64() {
            return serializer.serialize_i64(n);
        }
    }
    match amount.to_f64() {
        Some(f) if reads_back(f, amount) => serializer.serialize_f64(f),
        _ => serializer.collect_str(amount),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    <Decimal as Deserialize>::deserialize(deserializer)
}

fn reads_back(f: f64, amount: &Decimal) -> bool {
    f.is_finite() && Decimal::from_str(&f.to_string()).is_ok_and(|d| d == *amount)
}
