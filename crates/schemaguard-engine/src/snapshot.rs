//! Lowering a parsed schema AST into a [`Snapshot`]
//!
//! Resolves every model and field to its physical name and reads the flags
//! the rules depend on. Also rejects inputs on which matching is undefined:
//! duplicate declared names and two nodes sharing one physical name.

use schemaguard_core::{
    Field, FieldNode, FieldType, Model, ModelNode, SafetyError, SchemaAst, Snapshot,
};
use std::collections::{HashMap, HashSet};

use crate::attribute::has_attribute;
use crate::identity::{field_physical_name, model_physical_name};

/// Model-level opt-out marker (`@@ignore`) and field-level one (`@ignore`)
pub const IGNORE_ATTRIBUTE: &str = "ignore";

/// Field default value marker
pub const DEFAULT_ATTRIBUTE: &str = "default";

/// Explicit relation marker
pub const RELATION_ATTRIBUTE: &str = "relation";

/// Build a snapshot from a parsed schema
pub fn lower(ast: &SchemaAst) -> Result<Snapshot, SafetyError> {
    let mut model_names = HashSet::new();
    for model in ast.models() {
        if !model_names.insert(model.name.as_str()) {
            return Err(SafetyError::DuplicateModelName {
                name: model.name.clone(),
            });
        }
    }

    let models = ast
        .models()
        .map(|model| lower_model(model, &model_names))
        .collect::<Result<Vec<_>, _>>()?;

    let snapshot = Snapshot::new(models);
    validate_identities(&snapshot)?;

    tracing::debug!(
        models = snapshot.models.len(),
        fields = snapshot.field_count(),
        "lowered schema snapshot"
    );

    Ok(snapshot)
}

fn lower_model(model: &ModelNode, model_names: &HashSet<&str>) -> Result<Model, SafetyError> {
    let mut seen = HashSet::new();
    let mut fields = Vec::new();

    for field in model.fields() {
        if !seen.insert(field.name.as_str()) {
            return Err(SafetyError::DuplicateFieldName {
                model: model.name.clone(),
                field: field.name.clone(),
            });
        }
        fields.push(lower_field(field, model_names)?);
    }

    Ok(Model {
        name: model.name.clone(),
        physical_name: model_physical_name(model)?,
        fields,
        ignored: has_attribute(model, IGNORE_ATTRIBUTE),
        comments: model.comments().map(str::to_string).collect(),
    })
}

fn lower_field(field: &FieldNode, model_names: &HashSet<&str>) -> Result<Field, SafetyError> {
    let relation = has_attribute(field, RELATION_ATTRIBUTE)
        || model_names.contains(field.field_type.as_str());

    Ok(Field {
        name: field.name.clone(),
        physical_name: field_physical_name(field)?,
        field_type: FieldType::new(field.field_type.clone(), field.array),
        optional: field.optional,
        has_default: has_attribute(field, DEFAULT_ATTRIBUTE),
        ignored: has_attribute(field, IGNORE_ATTRIBUTE),
        relation,
    })
}

/// Reject snapshots where two models share a table or two persisted fields
/// of one model share a column
pub fn validate_identities(snapshot: &Snapshot) -> Result<(), SafetyError> {
    let mut tables: HashMap<&str, &str> = HashMap::new();

    for model in &snapshot.models {
        if let Some(first) = tables.insert(&model.physical_name, &model.name) {
            return Err(SafetyError::AmbiguousModelIdentity {
                physical_name: model.physical_name.clone(),
                first: first.to_string(),
                second: model.name.clone(),
            });
        }

        let mut columns: HashMap<&str, &str> = HashMap::new();
        for field in model.persisted_fields() {
            if let Some(first) = columns.insert(&field.physical_name, &field.name) {
                return Err(SafetyError::AmbiguousFieldIdentity {
                    model: model.name.clone(),
                    physical_name: field.physical_name.clone(),
                    first: first.to_string(),
                    second: field.name.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemaguard_core::AttributeNode;

    fn foo_bar_schema() -> SchemaAst {
        SchemaAst::new()
            .with_enum("Role")
            .with_model(
                ModelNode::new("Foo")
                    .with_comment("///no-tenant-field")
                    .with_field(FieldNode::new("qid", "String").id())
                    .with_field(FieldNode::new("bar", "String").mapped("bar").ignored())
                    .with_field(FieldNode::new("role", "Role").with_default("USER"))
                    .with_field(FieldNode::new("bars", "Bar").array())
                    .mapped("foo_tbl"),
            )
            .with_model(
                ModelNode::new("Bar")
                    .with_field(FieldNode::new("qid", "String").id())
                    .with_field(FieldNode::new("fooQid", "String").optional().mapped("foo_qid"))
                    .with_field(
                        FieldNode::new("foo", "Foo").optional().with_attribute(AttributeNode::field("relation")),
                    )
                    .ignored(),
            )
    }

    #[test]
    fn lowers_names_and_flags() {
        let snapshot = lower(&foo_bar_schema()).unwrap();
        assert_eq!(snapshot.models.len(), 2);

        let foo = snapshot.find_model("Foo").unwrap();
        assert_eq!(foo.physical_name, "foo_tbl");
        assert!(!foo.ignored);
        assert_eq!(foo.comments, vec!["///no-tenant-field".to_string()]);

        let bar = foo.find_field("bar").unwrap();
        assert_eq!(bar.physical_name, "bar");
        assert!(bar.ignored);
        assert!(bar.is_required());

        let role = foo.find_field("role").unwrap();
        assert!(role.has_default);
        assert!(!role.relation);

        let bars = foo.find_field("bars").unwrap();
        assert!(bars.relation);
        assert_eq!(bars.field_type, FieldType::new("Bar", true));

        let bar_model = snapshot.find_model("Bar").unwrap();
        assert!(bar_model.ignored);
        assert_eq!(bar_model.physical_name, "Bar");

        let foo_qid = bar_model.find_field("fooQid").unwrap();
        assert_eq!(foo_qid.physical_name, "foo_qid");
        assert!(foo_qid.optional);
        assert!(!foo_qid.relation);
        assert!(bar_model.find_field("foo").unwrap().relation);
    }

    #[test]
    fn relation_attribute_marks_relation_without_model_type() {
        let ast = SchemaAst::new().with_model(
            ModelNode::new("Foo")
                .with_field(FieldNode::new("owner", "External").with_attribute(AttributeNode::field("relation"))),
        );
        let snapshot = lower(&ast).unwrap();
        assert!(snapshot.models[0].fields[0].relation);
    }

    #[test]
    fn duplicate_model_names_are_rejected() {
        let ast = SchemaAst::new()
            .with_model(ModelNode::new("Foo"))
            .with_model(ModelNode::new("Foo"));
        assert_eq!(
            lower(&ast).unwrap_err(),
            SafetyError::DuplicateModelName { name: "Foo".to_string() }
        );
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let ast = SchemaAst::new().with_model(
            ModelNode::new("Foo")
                .with_field(FieldNode::new("bar", "String"))
                .with_field(FieldNode::new("bar", "Int")),
        );
        assert!(matches!(lower(&ast), Err(SafetyError::DuplicateFieldName { .. })));
    }

    #[test]
    fn models_sharing_a_table_are_ambiguous() {
        let ast = SchemaAst::new()
            .with_model(ModelNode::new("Foo").mapped("shared"))
            .with_model(ModelNode::new("Bar").mapped("shared"));
        assert_eq!(
            lower(&ast).unwrap_err(),
            SafetyError::AmbiguousModelIdentity {
                physical_name: "shared".to_string(),
                first: "Foo".to_string(),
                second: "Bar".to_string(),
            }
        );
    }

    #[test]
    fn unmapped_model_colliding_with_mapping_is_ambiguous() {
        let ast = SchemaAst::new()
            .with_model(ModelNode::new("Foo"))
            .with_model(ModelNode::new("Bar").mapped("Foo"));
        assert!(matches!(lower(&ast), Err(SafetyError::AmbiguousModelIdentity { .. })));
    }

    #[test]
    fn fields_sharing_a_column_are_ambiguous() {
        let ast = SchemaAst::new().with_model(
            ModelNode::new("Foo")
                .with_field(FieldNode::new("bar", "String"))
                .with_field(FieldNode::new("baz", "String").mapped("bar")),
        );
        assert!(matches!(
            lower(&ast),
            Err(SafetyError::AmbiguousFieldIdentity { ref physical_name, .. }) if physical_name == "bar"
        ));
    }

    #[test]
    fn relation_fields_do_not_claim_columns() {
        let ast = SchemaAst::new()
            .with_model(
                ModelNode::new("Foo")
                    .with_field(FieldNode::new("bar", "String"))
                    .with_field(FieldNode::new("baz", "Bar").mapped("bar")),
            )
            .with_model(ModelNode::new("Bar"));
        assert!(lower(&ast).is_ok());
    }

    #[test]
    fn malformed_map_propagates() {
        let ast = SchemaAst::new().with_model(
            ModelNode::new("Foo").with_attribute(AttributeNode::block("map")),
        );
        assert!(matches!(lower(&ast), Err(SafetyError::MalformedAttribute { .. })));
    }
}
