//! Configuration schema (schemaguard.toml)

use serde::{Deserialize, Serialize};
use crate::issue::IssueKind;

/// How fields are paired between snapshots inside a matched model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldIdentity {
    /// By effective column name; renames that keep `@map` are safe
    #[default]
    Physical,

    /// By declared name; any field rename counts as a removal
    Declared,
}

/// Rule toggles
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Issue codes whose rule is not evaluated
    #[serde(default)]
    pub disabled: Vec<IssueKind>,
}

impl RuleSettings {
    /// Check if the rule producing `kind` should run
    pub fn is_enabled(&self, kind: IssueKind) -> bool {
        !self.disabled.contains(&kind)
    }
}

/// Allowlist rules for specific models or patterns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Completely skip checks for these models (glob patterns, matched
    /// against declared or table name)
    #[serde(default)]
    pub skip_models: Vec<String>,
}

impl AllowlistRules {
    /// Check if a model matches any pattern in the list
    fn matches_pattern(name: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }

    /// Check if a model should be skipped
    pub fn is_model_skipped(&self, name: &str, physical_name: &str) -> bool {
        Self::matches_pattern(name, &self.skip_models)
            || Self::matches_pattern(physical_name, &self.skip_models)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Field pairing strategy
    #[serde(default)]
    pub field_identity: FieldIdentity,

    /// Rule toggles
    #[serde(default)]
    pub rules: RuleSettings,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Simple glob matching (supports a single `*`)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
