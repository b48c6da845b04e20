//! Shared REST response types.

pub mod extract;
pub mod problem;
