//! Outgoing HTTP helpers shared by modules that call upstream services.

pub mod client;
