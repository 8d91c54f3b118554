//! SchemaGuard Core
//!
//! Core domain model with stable, versioned types.
//! Never rename issue codes - they are part of the public API.

pub mod ast;
pub mod config;
pub mod error;
pub mod issue;
pub mod report;
pub mod schema;

pub use ast::{
    ArgumentValue, AttributeArgument, AttributeKind, AttributeNode, Block, EnumNode, FieldNode,
    ModelNode, ModelProperty, SchemaAst,
};
pub use config::{AllowlistRules, Config, ConfigError, FieldIdentity, RuleSettings};
pub use error::SafetyError;
pub use issue::{IssueKind, SafetyIssue};
pub use report::{fingerprint, Report, ReportSummary, ReportVersion};
pub use schema::{Field, FieldType, Model, Snapshot};
