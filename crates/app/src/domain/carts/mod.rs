//! Carts

pub mod errors;
mod lines;
pub mod models;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
