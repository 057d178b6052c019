//! Errors

use salvo::{http::StatusCode, prelude::*};
use tracing::error;

use bodega_app::domain::carts::CartsServiceError;

use crate::envelope::CartEnvelope;

/// Render a carts service error as the standard envelope, setting the
/// matching status code on the response.
pub(crate) fn render_service_error(
    error: CartsServiceError,
    res: &mut Response,
) -> Json<CartEnvelope> {
    let (status, message) = match error {
        CartsServiceError::ProductNotFound => {
            (StatusCode::NOT_FOUND, "Product not found".to_string())
        }
        CartsServiceError::InvalidQuantity(quantity) => (
            StatusCode::BAD_REQUEST,
            format!("Invalid quantity {quantity}"),
        ),
        CartsServiceError::InvalidData => {
            (StatusCode::BAD_REQUEST, "Invalid cart payload".to_string())
        }
        CartsServiceError::AlreadyExists => {
            (StatusCode::CONFLICT, "Cart already exists".to_string())
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    res.status_code(status);

    Json(CartEnvelope::error(message))
}
