//! Cart Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::models::UserUuid, domain::products::models::ProductUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Opaque anonymous-session identifier carried in the `cart_session` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(Uuid);

impl SessionToken {
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }

    /// Mint a fresh session token.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// The identity a cart is keyed by: exactly one of an authenticated user or
/// an anonymous session, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOwner {
    User(UserUuid),
    Guest(SessionToken),
}

/// Cart line item: a product reference, a quantity, and the unit price
/// snapshot captured when the product was first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub owner: CartOwner,
    pub lines: Vec<CartLine>,
    pub total: u64,

    /// `None` for the empty representation of a cart that has no record.
    pub updated_at: Option<Timestamp>,
}

impl Cart {
    /// The representation returned for an identity with no cart record.
    #[must_use]
    pub fn empty(owner: CartOwner) -> Self {
        Self {
            owner,
            lines: Vec::new(),
            total: 0,
            updated_at: None,
        }
    }
}

/// Per-cart validation limits.
#[derive(Debug, Clone, Copy)]
pub struct CartLimits {
    /// Maximum quantity a single line may reach, including via merge.
    pub max_line_quantity: u32,
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_line_quantity: 99,
        }
    }
}
