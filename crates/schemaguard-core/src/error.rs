//! Input error taxonomy
//!
//! Every error here is a property of the input snapshots. The checker never
//! recovers from them: matching is undefined once one is raised.

/// Errors raised while reading or evaluating schema snapshots
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafetyError {
    #[error("Parse error: {0}")]
    Parse(String),

    /// An attribute is missing structure it requires (e.g. `@map` without a name)
    #[error("Malformed attribute '@{attribute}' on '{owner}': {reason}")]
    MalformedAttribute {
        owner: String,
        attribute: String,
        reason: String,
    },

    #[error("Model '{name}' is declared more than once")]
    DuplicateModelName { name: String },

    #[error("Field '{field}' is declared more than once in model '{model}'")]
    DuplicateFieldName { model: String, field: String },

    /// Two models in one snapshot resolve to the same table
    #[error("Models '{first}' and '{second}' both map to table '{physical_name}'")]
    AmbiguousModelIdentity {
        physical_name: String,
        first: String,
        second: String,
    },

    /// Two fields in one model resolve to the same column
    #[error(
        "Fields '{first}' and '{second}' in model '{model}' both map to column '{physical_name}'"
    )]
    AmbiguousFieldIdentity {
        model: String,
        physical_name: String,
        first: String,
        second: String,
    },
}
