//! Attribute lookup on model and field nodes
//!
//! Lookups never fail on a missing attribute. They fail only when an
//! attribute that is present lacks the structure its caller requires.

use schemaguard_core::{
    ArgumentValue, AttributeArgument, AttributeNode, FieldNode, ModelNode, SafetyError,
};

/// A node that carries attributes (`@` on fields, `@@` on models)
pub trait AttributeSource {
    /// Declared name of the node, used in error messages
    fn owner(&self) -> &str;

    /// First attribute with the given name
    fn find_attribute(&self, name: &str) -> Option<&AttributeNode>;
}

impl AttributeSource for FieldNode {
    fn owner(&self) -> &str {
        &self.name
    }

    fn find_attribute(&self, name: &str) -> Option<&AttributeNode> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

impl AttributeSource for ModelNode {
    fn owner(&self) -> &str {
        &self.name
    }

    fn find_attribute(&self, name: &str) -> Option<&AttributeNode> {
        self.attributes().find(|a| a.name == name)
    }
}

/// Check whether the node carries the attribute
pub fn has_attribute(node: &impl AttributeSource, name: &str) -> bool {
    node.find_attribute(name).is_some()
}

/// Arguments of the attribute, or `None` if the attribute is absent.
/// An attribute written without parentheses yields an empty slice.
pub fn attribute_args<'a>(
    node: &'a impl AttributeSource,
    name: &str,
) -> Option<&'a [AttributeArgument]> {
    node.find_attribute(name)
        .map(|attribute| attribute.args.as_deref().unwrap_or(&[]))
}

/// Read a string argument of an attribute.
///
/// The argument is taken from `key: "..."` if present, else from the first
/// positional argument. Returns `Ok(None)` when the attribute is absent.
pub fn string_argument(
    node: &impl AttributeSource,
    attribute: &str,
    key: &str,
) -> Result<Option<String>, SafetyError> {
    let Some(args) = attribute_args(node, attribute) else {
        return Ok(None);
    };

    let malformed = |reason: String| SafetyError::MalformedAttribute {
        owner: node.owner().to_string(),
        attribute: attribute.to_string(),
        reason,
    };

    let mut values = args.iter().map(|arg| &arg.value);
    let value = values
        .clone()
        .find_map(|arg| match arg {
            ArgumentValue::KeyValue { key: k, value } if k == key => Some(value.as_ref()),
            _ => None,
        })
        .or_else(|| values.find(|arg| !matches!(arg, ArgumentValue::KeyValue { .. })))
        .ok_or_else(|| malformed(format!("missing '{}' argument", key)))?;

    match value {
        ArgumentValue::Literal { value: raw } => unquote(raw)
            .map(Some)
            .ok_or_else(|| malformed(format!("expected a string literal, got {}", raw))),
        other => Err(malformed(format!("expected a string literal, got {}", describe(other)))),
    }
}

/// Strip the quotes of a string literal and resolve `\"` / `\\` escapes
fn unquote(raw: &str) -> Option<String> {
    let inner = raw.trim().strip_prefix('"')?.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else {
            out.push(c);
        }
    }

    Some(out)
}

fn describe(value: &ArgumentValue) -> &'static str {
    match value {
        ArgumentValue::Literal { .. } => "literal",
        ArgumentValue::KeyValue { .. } => "key/value pair",
        ArgumentValue::Array { .. } => "array",
        ArgumentValue::Function { .. } => "function call",
    }
}
