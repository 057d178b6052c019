//! Domain modules

pub mod carts;
pub mod categories;
pub mod products;
