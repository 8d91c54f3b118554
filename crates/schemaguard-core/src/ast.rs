//! Schema definition AST as produced by the external schema parser
//!
//! The parser itself lives outside this workspace. Its output is accepted
//! as JSON with the shape below; every block and property is tagged by a
//! `"type"` discriminator. Block kinds other than models and enums
//! (datasources, generators, ...) are accepted and ignored.

use serde::{Deserialize, Serialize};

use crate::error::SafetyError;

/// A parsed schema file: an ordered list of top-level blocks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaAst {
    /// Top-level blocks in source order
    #[serde(default)]
    pub list: Vec<Block>,
}

impl SchemaAst {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a schema AST from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SafetyError> {
        serde_json::from_str(json).map_err(|e| SafetyError::Parse(e.to_string()))
    }

    /// Append a model block
    pub fn with_model(mut self, model: ModelNode) -> Self {
        self.list.push(Block::Model(model));
        self
    }

    /// Append an enum block
    pub fn with_enum(mut self, name: impl Into<String>) -> Self {
        self.list.push(Block::Enum(EnumNode { name: name.into() }));
        self
    }

    /// Model blocks in source order
    pub fn models(&self) -> impl Iterator<Item = &ModelNode> {
        self.list.iter().filter_map(|block| match block {
            Block::Model(model) => Some(model),
            _ => None,
        })
    }
}

/// A top-level schema block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// A model (maps to a table)
    Model(ModelNode),

    /// An enum declaration
    Enum(EnumNode),

    /// Any block kind the checker does not look at
    #[serde(other)]
    Other,
}

/// An enum declaration (only its name matters here)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumNode {
    pub name: String,
}

/// A model block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
    /// Declared model name
    pub name: String,

    /// Fields, block attributes and comments in source order
    #[serde(default)]
    pub properties: Vec<ModelProperty>,
}

impl ModelNode {
    /// Create a model with no properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: FieldNode) -> Self {
        self.properties.push(ModelProperty::Field(field));
        self
    }

    /// Append a block attribute (`@@name(...)`)
    pub fn with_attribute(mut self, attribute: AttributeNode) -> Self {
        self.properties.push(ModelProperty::Attribute(attribute));
        self
    }

    /// Append a comment line
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.properties.push(ModelProperty::Comment { text: text.into() });
        self
    }

    /// Shorthand for `@@map(name: "<table>")`
    pub fn mapped(self, table: &str) -> Self {
        let name = ArgumentValue::named("name", ArgumentValue::string(table));
        self.with_attribute(AttributeNode::block("map").with_arg(name))
    }

    /// Shorthand for `@@ignore`
    pub fn ignored(self) -> Self {
        self.with_attribute(AttributeNode::block("ignore"))
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.properties.iter().filter_map(|property| match property {
            ModelProperty::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Block attributes in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeNode> {
        self.properties.iter().filter_map(|property| match property {
            ModelProperty::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }

    /// Comment lines in declaration order
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().filter_map(|property| match property {
            ModelProperty::Comment { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// One entry in a model body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModelProperty {
    Field(FieldNode),
    Attribute(AttributeNode),
    Comment { text: String },
    Break,
}

/// A field declaration inside a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    /// Declared field name
    pub name: String,

    /// Type name as written (scalar, enum or model name)
    pub field_type: String,

    /// `Type?`
    #[serde(default)]
    pub optional: bool,

    /// `Type[]`
    #[serde(default)]
    pub array: bool,

    /// Field attributes (`@name(...)`) in source order
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,

    /// Trailing comment, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FieldNode {
    /// Create a required, non-list field with no attributes
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            optional: false,
            array: false,
            attributes: Vec::new(),
            comment: None,
        }
    }

    /// Mark the field optional (`Type?`)
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the field as a list (`Type[]`)
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Append a field attribute
    pub fn with_attribute(mut self, attribute: AttributeNode) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set the trailing comment
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// Shorthand for `@map(name: "<column>")`
    pub fn mapped(self, column: &str) -> Self {
        let name = ArgumentValue::named("name", ArgumentValue::string(column));
        self.with_attribute(AttributeNode::field("map").with_arg(name))
    }

    /// Shorthand for `@ignore`
    pub fn ignored(self) -> Self {
        self.with_attribute(AttributeNode::field("ignore"))
    }

    /// Shorthand for `@id`
    pub fn id(self) -> Self {
        self.with_attribute(AttributeNode::field("id"))
    }

    /// Shorthand for `@default(<raw>)`
    pub fn with_default(self, raw: impl Into<String>) -> Self {
        self.with_attribute(AttributeNode::field("default").with_arg(ArgumentValue::literal(raw)))
    }
}

/// Whether an attribute decorates a field (`@`) or a whole block (`@@`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    #[default]
    Field,
    Object,
}

/// An attribute application such as `@map(name: "bar")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeNode {
    /// Attribute name without the `@`/`@@` prefix
    pub name: String,

    #[serde(default)]
    pub kind: AttributeKind,

    /// Argument list; absent when the attribute was written without parentheses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<AttributeArgument>>,
}

impl AttributeNode {
    /// A field attribute with no argument list
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Field,
            args: None,
        }
    }

    /// A block attribute with no argument list
    pub fn block(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Object,
            args: None,
        }
    }

    /// Append an argument
    pub fn with_arg(mut self, value: ArgumentValue) -> Self {
        self.args.get_or_insert_with(Vec::new).push(AttributeArgument { value });
        self
    }
}

/// One entry of an attribute's argument list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "attributeArgument")]
pub struct AttributeArgument {
    pub value: ArgumentValue,
}

/// An attribute argument value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArgumentValue {
    /// Raw source text; string literals keep their quotes
    Literal { value: String },

    /// `key: value`
    KeyValue {
        key: String,
        value: Box<ArgumentValue>,
    },

    /// `[a, b]`
    Array {
        #[serde(default)]
        items: Vec<ArgumentValue>,
    },

    /// `now()`, `autoincrement()`, ...
    Function {
        name: String,
        #[serde(default)]
        params: Vec<ArgumentValue>,
    },
}

impl ArgumentValue {
    /// A literal holding raw source text
    pub fn literal(raw: impl Into<String>) -> Self {
        Self::Literal { value: raw.into() }
    }

    /// A quoted string literal
    pub fn string(text: &str) -> Self {
        Self::Literal {
            value: format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }

    /// A `key: value` pair
    pub fn named(key: impl Into<String>, value: ArgumentValue) -> Self {
        Self::KeyValue {
            key: key.into(),
            value: Box::new(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_model_json() {
        let json = r#"{
            "list": [
                { "type": "datasource", "name": "db" },
                { "type": "enum", "name": "Role" },
                {
                    "type": "model",
                    "name": "Foo",
                    "properties": [
                        { "type": "comment", "text": "///no-tenant-field" },
                        {
                            "type": "field",
                            "name": "bar",
                            "fieldType": "String",
                            "optional": true,
                            "attributes": [
                                {
                                    "name": "map",
                                    "kind": "field",
                                    "args": [
                                        {
                                            "type": "attributeArgument",
                                            "value": {
                                                "type": "keyValue",
                                                "key": "name",
                                                "value": { "type": "literal", "value": "\"bar\"" }
                                            }
                                        }
                                    ]
                                },
                                { "name": "ignore", "kind": "field" }
                            ]
                        },
                        { "type": "break" },
                        {
                            "type": "attribute",
                            "name": "map",
                            "kind": "object",
                            "args": [
                                { "type": "attributeArgument", "value": { "type": "literal", "value": "\"foo\"" } }
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let ast = SchemaAst::from_json(json).unwrap();
        assert_eq!(ast.list.len(), 3);
        assert_eq!(ast.list[0], Block::Other);
        assert_eq!(ast.list[1], Block::Enum(EnumNode { name: "Role".to_string() }));

        let model = ast.models().next().unwrap();
        assert_eq!(model.name, "Foo");
        assert_eq!(model.comments().collect::<Vec<_>>(), vec!["///no-tenant-field"]);

        let field = model.fields().next().unwrap();
        assert_eq!(field.field_type, "String");
        assert!(field.optional);
        assert!(!field.array);
        assert_eq!(field.attributes.len(), 2);
        assert_eq!(field.attributes[1].args, None);

        let map = field.attributes[0].args.as_ref().unwrap();
        assert_eq!(map[0].value, ArgumentValue::named("name", ArgumentValue::string("bar")));

        let block = model.attributes().next().unwrap();
        assert_eq!(block.kind, AttributeKind::Object);
        assert_eq!(
            block.args,
            Some(vec![AttributeArgument { value: ArgumentValue::string("foo") }])
        );
    }

    #[test]
    fn builder_matches_parsed_form() {
        let built = FieldNode::new("bar", "String").mapped("bar");
        let parsed: FieldNode = serde_json::from_str(
            r#"{
                "name": "bar",
                "fieldType": "String",
                "attributes": [
                    {
                        "name": "map",
                        "args": [
                            {
                                "type": "attributeArgument",
                                "value": {
                                    "type": "keyValue",
                                    "key": "name",
                                    "value": { "type": "literal", "value": "\"bar\"" }
                                }
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(built, parsed);
    }

    #[test]
    fn attribute_argument_serializes_with_tag() {
        let attribute = AttributeNode::field("default").with_arg(ArgumentValue::literal("0"));
        let json = serde_json::to_value(&attribute).unwrap();
        assert_eq!(
            json["args"][0],
            serde_json::json!({ "type": "attributeArgument", "value": { "type": "literal", "value": "0" } })
        );
    }

    #[test]
    fn bare_argument_value_is_rejected() {
        let err = SchemaAst::from_json(
            r#"{ "list": [ { "type": "model", "name": "Foo", "properties": [
                { "type": "attribute", "name": "map", "args": [ { "type": "literal", "value": "\"foo\"" } ] }
            ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SafetyError::Parse(_)));
    }

    #[test]
    fn string_literal_is_escaped() {
        assert_eq!(
            ArgumentValue::string(r#"a"b"#),
            ArgumentValue::Literal { value: r#""a\"b""#.to_string() }
        );
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = SchemaAst::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SafetyError::Parse(_)));
    }
}
