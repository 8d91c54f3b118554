//! Lowered schema snapshot types
//!
//! A [`Snapshot`] is the checker's view of one schema version: every model
//! and field already carries its effective physical name and the flags the
//! safety rules look at. Snapshots are built once per check and never mutated.

use serde::{Deserialize, Serialize};

/// Type descriptor of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// Type name as declared (scalar, enum or model)
    pub name: String,

    /// List type (`Type[]`)
    pub array: bool,
}

impl FieldType {
    pub fn new(name: impl Into<String>, array: bool) -> Self {
        Self {
            name: name.into(),
            array,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.array {
            write!(f, "{}[]", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A field of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Declared name
    pub name: String,

    /// Column name: the `@map` override, else the declared name
    pub physical_name: String,

    pub field_type: FieldType,

    pub optional: bool,

    /// `@default(...)` present
    pub has_default: bool,

    /// `@ignore` present
    pub ignored: bool,

    /// Logical relation with no backing column
    pub relation: bool,
}

impl Field {
    /// Create a required scalar field whose column name equals its declared name
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            physical_name: name.clone(),
            name,
            field_type,
            optional: false,
            has_default: false,
            ignored: false,
            relation: false,
        }
    }

    /// Whether the storage layer requires a value for this column
    pub fn is_required(&self) -> bool {
        !self.optional && !self.has_default
    }

    /// Whether the field is backed by a physical column
    pub fn is_persisted(&self) -> bool {
        !self.relation
    }
}

/// A model (table) in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Declared name
    pub name: String,

    /// Table name: the `@@map` override, else the declared name
    pub physical_name: String,

    /// Fields in declaration order
    pub fields: Vec<Field>,

    /// `@@ignore` present
    pub ignored: bool,

    /// Free-text comments, carried but never interpreted
    pub comments: Vec<String>,
}

impl Model {
    /// Create a model with no fields whose table name equals its declared name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            physical_name: name.clone(),
            name,
            fields: Vec::new(),
            ignored: false,
            comments: Vec::new(),
        }
    }

    /// Find a field by declared name
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields backed by a physical column, in declaration order
    pub fn persisted_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_persisted())
    }
}

/// One version of the schema
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Models in declaration order
    pub models: Vec<Model>,
}

impl Snapshot {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    /// Find a model by declared name
    pub fn find_model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Total number of fields across all models
    pub fn field_count(&self) -> usize {
        self.models.iter().map(|m| m.fields.len()).sum()
    }
}
