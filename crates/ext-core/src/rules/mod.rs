//! Composable, preconditioned checks over a manifest
//!
//! A rule is a named check with an explicit category tag, a list of
//! required-key preconditions, and a body. The registry owns the built-in
//! rule set and evaluates rules in a stable order.

pub mod registry;
pub mod rule;

pub use registry::RuleRegistry;
pub use rule::{Rule, RuleCategory, RuleContext, RuleOutcome};
