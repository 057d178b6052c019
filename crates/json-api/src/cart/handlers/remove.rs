//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    cart::errors::render_service_error, envelope::CartEnvelope, extensions::*, identity,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removes a product's line from the cart. Removing a product that is not
/// in the cart succeeds as a no-op.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The updated cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product_uuid: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = identity::owner_or_mint(depot, res);

    match state
        .app
        .carts
        .remove_item(owner, product_uuid.into_inner().into())
        .await
    {
        Ok(cart) => Ok(Json(CartEnvelope::ok(cart.into()))),
        Err(error) => Ok(render_service_error(error, res)),
    }
}
