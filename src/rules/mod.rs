//! Per-technology vendor rules.
//!
//! [`RuleRegistry`] holds one [`TechnologyRule`] per technology in declared
//! order. Each rule carries two [`Matcher`]s, one per vendor bucket.
//! Rule sets are either the built-in reference set or loaded from JSON.

mod config;
mod matcher;
mod registry;

pub use config::RuleConfigError;
pub use matcher::Matcher;
pub use registry::{Color, RuleRegistry, TechnologyRule, Vendor};
