//! Ordered accumulation of safety issues

use schemaguard_core::SafetyIssue;

/// Collects issues in the order rules raise them
#[derive(Debug, Clone, Default)]
pub struct IssueCollector {
    issues: Vec<SafetyIssue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one issue
    pub fn push(&mut self, issue: SafetyIssue) {
        tracing::debug!(code = %issue.kind, subject = %issue.subject(), "safety issue");
        self.issues.push(issue);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<SafetyIssue> {
        self.issues
    }
}

impl Extend<SafetyIssue> for IssueCollector {
    fn extend<I: IntoIterator<Item = SafetyIssue>>(&mut self, iter: I) {
        for issue in iter {
            self.push(issue);
        }
    }
}
