//! Merge Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use bodega_app::domain::carts::models::CartOwner;

use crate::{
    cart::errors::render_service_error, envelope::CartEnvelope, extensions::*, identity,
    state::State,
};

/// Merge Cart Handler
///
/// Folds the guest cart named by the `cart_session` cookie into the
/// authenticated user's cart. Without a cookie there is nothing to merge
/// and the user's cart is returned as-is. On success the cookie is cleared,
/// so retrying the request is a no-op.
#[endpoint(
    tags("cart"),
    summary = "Merge Guest Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The merged cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(CartOwner::User(user)) = depot.cart_owner() else {
        return Err(StatusError::unauthorized().brief("Merging requires an authenticated user"));
    };

    let Some(session) = identity::session_from_cookie(req) else {
        return match state.app.carts.get_cart(CartOwner::User(user)).await {
            Ok(cart) => Ok(Json(CartEnvelope::ok(cart.into()))),
            Err(error) => Ok(render_service_error(error, res)),
        };
    };

    match state.app.carts.merge_guest_into_user(session, user).await {
        Ok(cart) => {
            identity::clear_session_cookie(res);

            Ok(Json(CartEnvelope::ok(cart.into())))
        }
        Err(error) => Ok(render_service_error(error, res)),
    }
}
