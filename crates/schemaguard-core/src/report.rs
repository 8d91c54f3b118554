//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::issue::SafetyIssue;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of issues
    pub total: usize,

    /// Number of previous models evaluated
    pub models_checked: usize,

    /// Number of previous persisted fields evaluated
    pub fields_checked: usize,

    /// Issue count per code
    pub by_kind: BTreeMap<String, usize>,
}

/// Safety check report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// All issues, in evaluation order
    pub issues: Vec<SafetyIssue>,

    /// Metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Report {
    /// Create a report from issues
    pub fn from_issues(issues: Vec<SafetyIssue>) -> Self {
        let mut by_kind = BTreeMap::new();
        for issue in &issues {
            *by_kind.entry(issue.kind.as_str().to_string()).or_insert(0) += 1;
        }

        let summary = ReportSummary {
            total: issues.len(),
            models_checked: 0,
            fields_checked: 0,
            by_kind,
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            issues,
            metadata: None,
        }
    }

    /// Record how much of the previous snapshot was evaluated
    pub fn with_coverage(mut self, models_checked: usize, fields_checked: usize) -> Self {
        self.summary.models_checked = models_checked;
        self.summary.fields_checked = fields_checked;
        self
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Zero issues means the transition is safe
    pub fn is_safe(&self) -> bool {
        self.issues.is_empty()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

/// Hex-encoded SHA-256 of an input, used to tie a report to its snapshots
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
