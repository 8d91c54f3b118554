//! Safety rules
//!
//! Each rule is an independent predicate over one [`Subject`]: an
//! unmatched previous model, an unmatched previous field, or a matched
//! field pair. Rules never see matching internals, so adding one does not
//! touch the matcher.

use schemaguard_core::{Field, IssueKind, Model, RuleSettings, SafetyIssue};

/// What a rule is evaluated against
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// A previous model with no counterpart in the current snapshot
    UnmatchedModel(&'a Model),

    /// A previous persisted field with no counterpart in the matched model
    UnmatchedField { model: &'a Model, field: &'a Field },

    /// A persisted field present in both snapshots
    MatchedField {
        model: &'a Model,
        previous: &'a Field,
        current: &'a Field,
    },
}

/// The fixed rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// A table must not disappear unless it was `@@ignore`d
    ModelRemoved,

    /// A column must not disappear unless it was `@ignore`d
    FieldRemoved,

    /// A field may only become `@ignore`d once it is optional or defaulted
    FieldNewlyIgnoredRequired,
}

impl Rule {
    /// All rules in evaluation order
    pub const ALL: [Rule; 3] = [
        Self::ModelRemoved,
        Self::FieldRemoved,
        Self::FieldNewlyIgnoredRequired,
    ];

    /// Issue code this rule emits
    pub fn kind(self) -> IssueKind {
        match self {
            Self::ModelRemoved => IssueKind::ModelRemoved,
            Self::FieldRemoved => IssueKind::FieldRemoved,
            Self::FieldNewlyIgnoredRequired => IssueKind::FieldNewlyIgnoredRequired,
        }
    }

    /// Evaluate the rule, returning an issue if the subject violates it
    pub fn evaluate(self, subject: &Subject<'_>) -> Option<SafetyIssue> {
        match (self, *subject) {
            (Self::ModelRemoved, Subject::UnmatchedModel(model)) if !model.ignored => {
                Some(SafetyIssue::new(
                    self.kind(),
                    &model.name,
                    &model.physical_name,
                    format!(
                        "Model '{}' (table '{}') is missing from the current schema; \
                         mark it @@ignore before dropping or renaming its table",
                        model.name, model.physical_name
                    ),
                ))
            }
            (Self::FieldRemoved, Subject::UnmatchedField { model, field }) if !field.ignored => {
                Some(
                    SafetyIssue::new(
                        self.kind(),
                        &model.name,
                        &field.physical_name,
                        format!(
                            "Field '{}.{}' (column '{}') was removed or renamed without \
                             keeping its mapping; mark it @ignore before removing it",
                            model.name, field.name, field.physical_name
                        ),
                    )
                    .with_field(&field.name),
                )
            }
            (Self::FieldNewlyIgnoredRequired, Subject::MatchedField { model, previous, current })
                if !previous.ignored && current.ignored && current.is_required() =>
            {
                Some(
                    SafetyIssue::new(
                        self.kind(),
                        &model.name,
                        &previous.physical_name,
                        format!(
                            "Field '{}.{}' (column '{}') is newly ignored but still required; \
                             make it optional or give it a default before ignoring it",
                            model.name, previous.name, previous.physical_name
                        ),
                    )
                    .with_field(&previous.name),
                )
            }
            _ => None,
        }
    }
}

/// The enabled rules, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Every rule enabled
    pub fn all() -> Self {
        Self { rules: Rule::ALL.to_vec() }
    }

    /// Rules not disabled by configuration
    pub fn from_settings(settings: &RuleSettings) -> Self {
        Self {
            rules: Rule::ALL
                .into_iter()
                .filter(|rule| settings.is_enabled(rule.kind()))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Issues raised by all enabled rules for one subject
    pub fn evaluate<'s>(
        &'s self,
        subject: &'s Subject<'s>,
    ) -> impl Iterator<Item = SafetyIssue> + 's {
        self.rules.iter().filter_map(move |rule| rule.evaluate(subject))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}
