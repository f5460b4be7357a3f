//! Rule-based validation of normalized stats
//!
//! A rule receives its parameters, the documents under validation and a reporting
//! [`Api`]. It reports findings by calling [`Api::error`], [`Api::warn`] or
//! [`Api::info`]; findings are side effects collected into a [`FindingStorage`]
//! keyed by filename, not return values.
//!
//! Two kinds of rules exist:
//!
//! - built-in rules, looked up by name (see [`builtin_rule`])
//! - query rules, wrapping a [`Query`](crate::query::Query) that yields a list of
//!   `{ type, message, filename, assert }` records
//!
//! # Implementation Model
//!
//! The [`RuleRunner`] runs each configured rule in order. A rule that returns an
//! error is recorded as failed and the run continues with the next rule. The run as
//! a whole fails when any error-level finding was reported, when any warning was
//! reported and warnings are escalated, or when a rule failed.

mod api;
mod finding;
mod query_rule;
mod rule;
mod rules;
mod runner;
mod storage;

pub use api::Api;
pub use finding::{Finding, FindingType};
pub use query_rule::QueryRule;
pub use rule::{Rule, RuleData};
pub use rules::{BUILTIN_RULES, builtin_rule};
pub use runner::{RuleLevel, RuleOutcome, RuleRunner, RunOutcome};
pub use storage::{FindingStorage, UNKNOWN_FILE};
