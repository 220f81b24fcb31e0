//! Fluent construction of rules, triggers and replies.

pub mod helpers;
pub mod rule;

pub use helpers::{CommandBuilder, PresetBuilder, SpecificationBuilder};
pub use rule::RuleBuilder;
