//! Safety issue codes and records
//!
//! IMPORTANT: Issue codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Issue code registry (v1)
///
/// Every code marks the transition as unsafe; there are no severity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// A table disappeared (dropped, or renamed without keeping its mapping)
    ModelRemoved,

    /// A column disappeared (dropped, or renamed without keeping its mapping)
    FieldRemoved,

    /// A required column was marked ignored without being relaxed first
    FieldNewlyIgnoredRequired,
}

impl IssueKind {
    /// All codes in evaluation order
    pub const ALL: [IssueKind; 3] = [
        Self::ModelRemoved,
        Self::FieldRemoved,
        Self::FieldNewlyIgnoredRequired,
    ];

    /// Get the issue code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelRemoved => "MODEL_REMOVED",
            Self::FieldRemoved => "FIELD_REMOVED",
            Self::FieldNewlyIgnoredRequired => "FIELD_NEWLY_IGNORED_REQUIRED",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single backward-compatibility violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyIssue {
    /// Stable issue code
    pub kind: IssueKind,

    /// Human-readable message (wording is not part of the contract)
    pub message: String,

    /// Declared name of the offending model in the previous snapshot
    pub model: String,

    /// Declared name of the offending field, for field-level issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Table or column name the issue is about
    pub physical_name: String,
}

impl SafetyIssue {
    /// Create a model-level issue
    pub fn new(
        kind: IssueKind,
        model: impl Into<String>,
        physical_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            model: model.into(),
            field: None,
            physical_name: physical_name.into(),
        }
    }

    /// Attach the offending field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// `Model` or `Model.field`
    pub fn subject(&self) -> String {
        match &self.field {
            Some(field) => format!("{}.{}", self.model, field),
            None => self.model.clone(),
        }
    }
}

impl std::fmt::Display for SafetyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_code_stability() {
        assert_eq!(IssueKind::ModelRemoved.as_str(), "MODEL_REMOVED");
        assert_eq!(IssueKind::FieldRemoved.as_str(), "FIELD_REMOVED");
        assert_eq!(
            IssueKind::FieldNewlyIgnoredRequired.as_str(),
            "FIELD_NEWLY_IGNORED_REQUIRED"
        );
    }

    #[test]
    fn serde_uses_stable_codes() {
        for kind in IssueKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn issue_display() {
        let issue = SafetyIssue::new(IssueKind::FieldRemoved, "Foo", "bar", "column dropped")
            .with_field("bar");

        assert_eq!(issue.subject(), "Foo.bar");
        assert_eq!(issue.to_string(), "[FIELD_REMOVED] Foo.bar: column dropped");

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"field\":\"bar\""));
    }

    #[test]
    fn model_issue_omits_field() {
        let issue = SafetyIssue::new(IssueKind::ModelRemoved, "Bar", "bar_tbl", "table dropped");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("\"field\""));
        assert_eq!(issue.subject(), "Bar");
    }
}
