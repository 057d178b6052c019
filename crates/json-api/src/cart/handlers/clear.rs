//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    cart::errors::render_service_error, envelope::CartEnvelope, extensions::*, identity,
    state::State,
};

/// Clear Cart Handler
///
/// Deletes the cart record for the resolved identity, if any.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The emptied cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = identity::owner_or_mint(depot, res);

    match state.app.carts.clear_cart(owner).await {
        Ok(cart) => Ok(Json(CartEnvelope::ok(cart.into()))),
        Err(error) => Ok(render_service_error(error, res)),
    }
}
