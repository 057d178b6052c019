//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use bodega_app::domain::carts::models::CartOwner;

const CART_OWNER_KEY: &str = "cart_owner";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_cart_owner(&mut self, owner: CartOwner);

    /// The identity resolved by the identity middleware, if any.
    fn cart_owner(&self) -> Option<CartOwner>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_cart_owner(&mut self, owner: CartOwner) {
        self.insert(CART_OWNER_KEY, owner);
    }

    fn cart_owner(&self) -> Option<CartOwner> {
        self.get::<CartOwner>(CART_OWNER_KEY).ok().copied()
    }
}
