//! Extensions

mod depot;

pub(crate) use depot::*;
