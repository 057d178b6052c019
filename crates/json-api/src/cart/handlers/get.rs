//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    cart::errors::render_service_error,
    envelope::{CartEnvelope, CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the cart for the resolved identity. An identity without a cart
/// record gets the empty representation; an anonymous request gets the empty
/// representation without minting a session.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartEnvelope>, StatusError> {
    let Some(owner) = depot.cart_owner() else {
        return Ok(Json(CartEnvelope::ok(CartResponse::empty())));
    };

    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.carts.get_cart(owner).await {
        Ok(cart) => Ok(Json(CartEnvelope::ok(cart.into()))),
        Err(error) => Ok(render_service_error(error, res)),
    }
}
