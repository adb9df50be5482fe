//! Domain operations on the store, grouped by entity
//!
//! Each submodule adds an `impl Store<S>` block. Callers are identified by
//! user id; role and ownership checks happen here, not in the caller.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;
