//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::errors::render_service_error, envelope::CartEnvelope, extensions::*, identity,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    /// The product to add
    pub product_uuid: Uuid,

    /// How many units to add
    pub quantity: u32,
}

/// Add Cart Item Handler
///
/// Adds a quantity of a product, snapshotting its current price. An
/// anonymous request gets a fresh guest session cookie.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = identity::owner_or_mint(depot, res);
    let request = json.into_inner();

    match state
        .app
        .carts
        .add_item(owner, request.product_uuid.into(), request.quantity)
        .await
    {
        Ok(cart) => Ok(Json(CartEnvelope::ok(cart.into()))),
        Err(error) => Ok(render_service_error(error, res)),
    }
}
