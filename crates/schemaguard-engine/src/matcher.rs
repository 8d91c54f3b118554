//! Model and field matching between two snapshots
//!
//! Models are paired by table name. Fields are paired inside each matched
//! model, by column name (or declared name under
//! [`FieldIdentity::Declared`]); relation fields never take part.

use schemaguard_core::{Field, FieldIdentity, Model, SafetyError, Snapshot};
use std::collections::HashMap;

/// Result of pairing the models of two snapshots
#[derive(Debug, Clone, Default)]
pub struct ModelMatches<'a> {
    /// `(previous, current)` pairs, in previous-snapshot order
    pub matched: Vec<(&'a Model, &'a Model)>,

    /// Previous models with no counterpart, in previous-snapshot order
    pub unmatched_prev: Vec<&'a Model>,
}

/// Result of pairing the persisted fields of one matched model
#[derive(Debug, Clone, Default)]
pub struct FieldMatches<'a> {
    /// `(previous, current)` pairs, in previous-model order
    pub matched: Vec<(&'a Field, &'a Field)>,

    /// Previous fields with no counterpart, in previous-model order
    pub unmatched_prev: Vec<&'a Field>,
}

/// Pair models by table name
pub fn match_models<'a>(
    prev: &'a Snapshot,
    current: &'a Snapshot,
) -> Result<ModelMatches<'a>, SafetyError> {
    // Both sides are indexed so an ambiguous previous snapshot fails too
    index_models(prev)?;
    let index = index_models(current)?;

    let mut matches = ModelMatches::default();
    for model in &prev.models {
        match index.get(model.physical_name.as_str()) {
            Some(counterpart) => {
                tracing::debug!(
                    previous = %model.name,
                    current = %counterpart.name,
                    table = %model.physical_name,
                    "model matched"
                );
                matches.matched.push((model, *counterpart));
            }
            None => {
                tracing::debug!(
                    previous = %model.name,
                    table = %model.physical_name,
                    "model unmatched"
                );
                matches.unmatched_prev.push(model);
            }
        }
    }

    Ok(matches)
}

/// Pair the persisted fields of a matched model pair
pub fn match_fields<'a>(
    prev: &'a Model,
    current: &'a Model,
    identity: FieldIdentity,
) -> Result<FieldMatches<'a>, SafetyError> {
    index_fields(prev, identity)?;
    let index = index_fields(current, identity)?;

    let mut matches = FieldMatches::default();
    for field in prev.persisted_fields() {
        match index.get(field_key(field, identity)) {
            Some(counterpart) => matches.matched.push((field, *counterpart)),
            None => {
                tracing::debug!(
                    model = %prev.name,
                    field = %field.name,
                    column = %field.physical_name,
                    "field unmatched"
                );
                matches.unmatched_prev.push(field);
            }
        }
    }

    Ok(matches)
}

fn field_key(field: &Field, identity: FieldIdentity) -> &str {
    match identity {
        FieldIdentity::Physical => &field.physical_name,
        FieldIdentity::Declared => &field.name,
    }
}

fn index_models(snapshot: &Snapshot) -> Result<HashMap<&str, &Model>, SafetyError> {
    let mut index = HashMap::with_capacity(snapshot.models.len());

    for model in &snapshot.models {
        if let Some(first) = index.insert(model.physical_name.as_str(), model) {
            return Err(SafetyError::AmbiguousModelIdentity {
                physical_name: model.physical_name.clone(),
                first: first.name.clone(),
                second: model.name.clone(),
            });
        }
    }

    Ok(index)
}

fn index_fields(
    model: &Model,
    identity: FieldIdentity,
) -> Result<HashMap<&str, &Field>, SafetyError> {
    let mut index = HashMap::with_capacity(model.fields.len());

    for field in model.persisted_fields() {
        let key = field_key(field, identity);
        if let Some(first) = index.insert(key, field) {
            return Err(SafetyError::AmbiguousFieldIdentity {
                model: model.name.clone(),
                physical_name: key.to_string(),
                first: first.name.clone(),
                second: field.name.clone(),
            });
        }
    }

    Ok(index)
}
