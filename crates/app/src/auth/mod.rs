//! Bearer-token authentication.
//!
//! Token issuance happens out of band (the CLI); this module only resolves
//! already-issued tokens to user identities.

pub mod errors;
pub mod models;
mod repository;
pub mod service;
pub mod token;

pub use errors::AuthServiceError;
pub use service::*;
