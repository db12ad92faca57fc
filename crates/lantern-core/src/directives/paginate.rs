use crate::directives::ParentInfo;
use crate::error::ValidateError;
use crate::schema::ArgumentDescriptor;
use crate::schema::FieldDescriptor;
use crate::schema::NodeStore;
use crate::schema::ObjectNode;
use crate::types::TypeKind;
use crate::types::TypeRef;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;

/// Name of the response type a paginated list of `element` is wrapped in.
pub(crate) fn response_type_name(element: &str) -> String {
    format!("{element}PaginateResponse")
}

/// Turns `users: [User]` on the query root into
/// `users(page: Int = 1, size: Int = 10, sort: SortOrder = ASC): UserPaginateResponse!`.
pub(super) fn paginate(
    field: &mut FieldDescriptor,
    _directive: &DirectiveAnnotation,
    store: &mut NodeStore,
    parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    if parent.type_name != parent.query_root {
        return Err(ValidateError::new(
            format!("{}.{}", parent.type_name, field.name),
            format!(
                "@paginate is only allowed on fields of the {} type",
                parent.query_root
            ),
        ));
    }

    let element = field.type_ref.name().to_string();
    let response = response_type_name(&element);
    if !store.contains(&response) {
        let node = ObjectNode::new(response.clone())
            .with_field(FieldDescriptor::new(
                "data",
                TypeRef::non_null(TypeRef::list(TypeRef::named(element))),
            ))
            .with_field(FieldDescriptor::new(
                "paginateInfo",
                TypeRef::non_null(TypeRef::named("PaginateInfo")),
            ));
        store
            .insert_object(node)
            .map_err(|err| ValidateError::new(&response, err.to_string()))?;
    }
    field.type_ref = TypeRef::non_null(TypeRef::named(response));

    let injected = [
        ArgumentDescriptor::new("page", TypeRef::resolved("Int", TypeKind::Scalar))
            .with_default(Value::Int(1)),
        ArgumentDescriptor::new("size", TypeRef::resolved("Int", TypeKind::Scalar))
            .with_default(Value::Int(10)),
        ArgumentDescriptor::new("sort", TypeRef::named("SortOrder"))
            .with_default(Value::Enum("ASC".to_string())),
    ];
    for argument in injected {
        if !field.arguments.contains_key(&argument.name) {
            field.arguments.insert(argument.name.clone(), argument);
        }
    }
    Ok(())
}
