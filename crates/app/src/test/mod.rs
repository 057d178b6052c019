//! Shared test infrastructure: a containerized PostgreSQL instance plus
//! fully wired services over per-test databases.

pub(crate) mod context;
pub(crate) mod db;
