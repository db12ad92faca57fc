use crate::directives::ParentInfo;
use crate::directives::string_list_argument;
use crate::error::ValidateError;
use crate::naming::snake_case;
use crate::schema::FieldDescriptor;
use crate::schema::ModelInfo;
use crate::schema::NodeStore;
use crate::schema::ObjectNode;
use crate::types::TypeKind;
use crate::types::TypeRef;
use lantern_parser::ast::DirectiveAnnotation;

const DEFAULT_DEPRECATION_REASON: &str = "field is deprecated";

pub(super) fn deprecated(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    _parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    field.deprecation = Some(
        directive
            .string_argument("reason")
            .unwrap_or(DEFAULT_DEPRECATION_REASON)
            .to_string(),
    );
    Ok(())
}

pub(super) fn searchable(
    field: &mut FieldDescriptor,
    _directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    _parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    field.searchable = true;
    Ok(())
}

pub(super) fn attr(
    field: &mut FieldDescriptor,
    _directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    _parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    field.attr = true;
    Ok(())
}

pub(super) fn extends(
    node: &mut ObjectNode,
    _directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
) -> Result<(), ValidateError> {
    node.is_extended = true;
    Ok(())
}

pub(super) fn scopes(
    node: &mut ObjectNode,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
) -> Result<(), ValidateError> {
    node.scopes = string_list_argument(directive, "names");
    Ok(())
}

pub(super) fn model(
    node: &mut ObjectNode,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
) -> Result<(), ValidateError> {
    mark_model(node, directive, false);
    Ok(())
}

pub(super) fn soft_delete_model(
    node: &mut ObjectNode,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
) -> Result<(), ValidateError> {
    mark_model(node, directive, true);
    Ok(())
}

fn mark_model(node: &mut ObjectNode, directive: &DirectiveAnnotation, soft_delete: bool) {
    let name = directive
        .string_argument("name")
        .map(str::to_string)
        .unwrap_or_else(|| snake_case(&node.name));
    node.model = Some(ModelInfo { name, soft_delete });

    if !node.fields.contains_key("id") {
        let id = FieldDescriptor::new(
            "id",
            TypeRef::non_null(TypeRef::resolved("ID", TypeKind::Scalar)),
        );
        node.fields.shift_insert(0, "id".to_string(), id);
    }
    let mut timestamps = vec![
        ("created_at", TypeRef::non_null(TypeRef::named("DateTime"))),
        ("updated_at", TypeRef::non_null(TypeRef::named("DateTime"))),
    ];
    if soft_delete {
        timestamps.push(("deleted_at", TypeRef::named("DateTime")));
    }
    for (name, type_ref) in timestamps {
        if !node.fields.contains_key(name) {
            node.fields
                .insert(name.to_string(), FieldDescriptor::new(name, type_ref));
        }
    }
}
