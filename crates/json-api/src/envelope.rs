//! Cart response envelope.
//!
//! Every cart endpoint answers with the same shape: a `success` flag, the
//! cart payload on success, and a human-readable `message` on failure.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bodega_app::domain::carts::models::{Cart, CartLine};

/// Cart Envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartEnvelope {
    /// Whether the request succeeded
    pub success: bool,

    /// The cart, present on success
    pub data: Option<CartResponse>,

    /// Error description, present on failure
    pub message: Option<String>,
}

impl CartEnvelope {
    #[must_use]
    pub(crate) fn ok(data: CartResponse) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    #[must_use]
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The lines in the cart
    pub items: Vec<CartLineResponse>,

    /// Cart total in minor currency units
    pub total: u64,

    /// When the cart was last updated; absent for carts with no record
    pub updated_at: Option<String>,
}

impl CartResponse {
    /// The representation of an identity that has no cart record.
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            updated_at: None,
        }
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            items: cart.lines.into_iter().map(CartLineResponse::from).collect(),
            total: cart.total,
            updated_at: cart.updated_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the product
    pub product_uuid: Uuid,

    /// Quantity of the product in the cart
    pub quantity: u32,

    /// Unit price snapshot in minor currency units
    pub unit_price: u64,

    /// Line total in minor currency units
    pub line_total: u64,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            product_uuid: line.product_uuid.into_uuid(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.unit_price.saturating_mul(u64::from(line.quantity)),
        }
    }
}
