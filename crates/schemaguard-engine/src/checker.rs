//! Safety check orchestration
//!
//! AST → snapshot lowering → model matching → field matching per matched
//! model → rules → collected issues. Pure over its two inputs; nothing is
//! retained between calls.

use schemaguard_core::{Config, Report, SafetyError, SafetyIssue, SchemaAst, Snapshot};

use crate::collector::IssueCollector;
use crate::matcher::{match_fields, match_models};
use crate::rules::{RuleSet, Subject};
use crate::snapshot::lower;

/// Issues found by one check plus how much was evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Issues in evaluation order
    pub issues: Vec<SafetyIssue>,

    /// Previous models evaluated (allowlisted models excluded)
    pub models_checked: usize,

    /// Previous persisted fields evaluated inside matched models
    pub fields_checked: usize,
}

impl CheckOutcome {
    /// Zero issues means the transition is safe
    pub fn is_safe(&self) -> bool {
        self.issues.is_empty()
    }

    /// Build a report from this outcome
    pub fn into_report(self) -> Report {
        Report::from_issues(self.issues).with_coverage(self.models_checked, self.fields_checked)
    }
}

/// Evaluates schema transitions under one configuration
#[derive(Debug, Clone)]
pub struct SafetyChecker {
    config: Config,
    rules: RuleSet,
}

impl SafetyChecker {
    pub fn new(config: Config) -> Self {
        let rules = RuleSet::from_settings(&config.rules);
        Self { config, rules }
    }

    /// Check two parsed schemas
    pub fn check(
        &self,
        prev: &SchemaAst,
        current: &SchemaAst,
    ) -> Result<CheckOutcome, SafetyError> {
        let prev = lower(prev)?;
        let current = lower(current)?;
        self.check_snapshots(&prev, &current)
    }

    /// Check two already-lowered snapshots
    pub fn check_snapshots(
        &self,
        prev: &Snapshot,
        current: &Snapshot,
    ) -> Result<CheckOutcome, SafetyError> {
        let matches = match_models(prev, current)?;
        let allowlist = &self.config.allowlist;
        let is_skipped = |name: &str, table: &str| {
            let skipped = allowlist.is_model_skipped(name, table);
            if skipped {
                tracing::debug!(model = %name, table = %table, "model skipped by allowlist");
            }
            skipped
        };

        let mut collector = IssueCollector::new();
        let mut models_checked = 0;
        let mut fields_checked = 0;

        for model in matches.unmatched_prev {
            if is_skipped(&model.name, &model.physical_name) {
                continue;
            }
            models_checked += 1;
            collector.extend(self.rules.evaluate(&Subject::UnmatchedModel(model)));
        }

        for (prev_model, current_model) in matches.matched {
            if is_skipped(&prev_model.name, &prev_model.physical_name) {
                continue;
            }
            models_checked += 1;

            let fields = match_fields(prev_model, current_model, self.config.field_identity)?;
            fields_checked += fields.matched.len() + fields.unmatched_prev.len();

            for field in fields.unmatched_prev {
                let subject = Subject::UnmatchedField { model: prev_model, field };
                collector.extend(self.rules.evaluate(&subject));
            }

            for (previous, current) in fields.matched {
                let subject = Subject::MatchedField {
                    model: prev_model,
                    previous,
                    current,
                };
                collector.extend(self.rules.evaluate(&subject));
            }
        }

        tracing::info!(
            issues = collector.len(),
            models_checked,
            fields_checked,
            "schema safety check complete"
        );

        Ok(CheckOutcome {
            issues: collector.into_issues(),
            models_checked,
            fields_checked,
        })
    }
}

impl Default for SafetyChecker {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// List the safety issues of moving from `prev` to `current` under the
/// default configuration. An empty list means the transition is safe.
pub fn list_safety_issues(
    prev: &SchemaAst,
    current: &SchemaAst,
) -> Result<Vec<SafetyIssue>, SafetyError> {
    SafetyChecker::default().check(prev, current).map(|outcome| outcome.issues)
}
