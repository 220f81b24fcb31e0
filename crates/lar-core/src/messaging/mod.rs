//! Outbound reply abstractions (LINE today).

pub mod log;
pub mod port;
pub mod types;
