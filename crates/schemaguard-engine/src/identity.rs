//! Effective physical names
//!
//! A model's physical name is its table: the `@@map` override if present,
//! else the declared name. A field's physical name is its column: the
//! `@map` override if present, else the declared name. These names are the
//! only join keys used for matching, so a declared-name change is invisible
//! as long as the mapping holds the physical name constant.

use schemaguard_core::{FieldNode, ModelNode, SafetyError};

use crate::attribute::{string_argument, AttributeSource};

/// Attribute that overrides a table or column name
pub const MAP_ATTRIBUTE: &str = "map";

/// Argument key of the mapping override
pub const MAP_NAME_KEY: &str = "name";

/// Table name of a model
pub fn model_physical_name(model: &ModelNode) -> Result<String, SafetyError> {
    physical_name(model)
}

/// Column name of a field
pub fn field_physical_name(field: &FieldNode) -> Result<String, SafetyError> {
    physical_name(field)
}

fn physical_name(node: &impl AttributeSource) -> Result<String, SafetyError> {
    match string_argument(node, MAP_ATTRIBUTE, MAP_NAME_KEY)? {
        Some(name) if name.is_empty() => Err(SafetyError::MalformedAttribute {
            owner: node.owner().to_string(),
            attribute: MAP_ATTRIBUTE.to_string(),
            reason: "mapped name is empty".to_string(),
        }),
        Some(name) => Ok(name),
        None => Ok(node.owner().to_string()),
    }
}
