//! Shared application domain and persistence modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stderr,
    reason = "test infrastructure fails loudly instead of propagating errors"
)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
