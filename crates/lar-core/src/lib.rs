//! Core domain logic for the LINE auto-reply engine.
//!
//! This crate is framework-agnostic. The LINE Messaging API and the counter
//! store live behind ports (traits) implemented in adapter crates or in-process.

pub mod builder;
pub mod command;
pub mod config;
pub mod errors;
pub mod logging;
pub mod message;
pub mod messaging;
pub mod policy;
pub mod random;
pub mod rule;
pub mod specification;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
