//! SchemaGuard engine - backward-compatibility checking
//!
//! This crate implements the schema safety check:
//! - Attribute lookup and physical-name resolution
//! - Model and field matching by physical identity
//! - Safety rules and issue collection

pub mod attribute;
pub mod checker;
pub mod collector;
pub mod identity;
pub mod matcher;
pub mod rules;
pub mod snapshot;

pub use checker::{list_safety_issues, CheckOutcome, SafetyChecker};
pub use collector::IssueCollector;
pub use matcher::{match_fields, match_models, FieldMatches, ModelMatches};
pub use rules::{Rule, RuleSet, Subject};
pub use snapshot::lower;
