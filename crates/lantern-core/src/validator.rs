//! Checks a loaded [`NodeStore`] and resolves its type references.

use crate::error::ValidateError;
use crate::schema::ArgumentDescriptor;
use crate::schema::DirectiveDefinitionNode;
use crate::schema::DirectiveList;
use crate::schema::FieldDescriptor;
use crate::schema::NodeCategory;
use crate::schema::NodeStore;
use crate::types::TypeKind;
use crate::types::TypeRef;
use indexmap::IndexMap;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveLocation;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, ValidateError>;

type Names = IndexMap<String, NodeCategory>;
type DirectiveDefs = IndexMap<String, DirectiveDefinitionNode>;

/// Validates every node, storing resolved kinds on type references,
/// interface and union possible types, enum codes and deprecations.
///
/// Stops at the first problem.
pub fn validate(store: &mut NodeStore) -> Result<()> {
    let NodeStore {
        names,
        objects,
        interfaces,
        unions,
        enums,
        scalars,
        input_objects,
        directives,
        ..
    } = store;

    for directive in directives.values_mut() {
        let node = format!("@{}", directive.name);
        if directive.locations.is_empty() {
            return Err(ValidateError::new(node, "directive has no locations"));
        }
        for argument in directive.arguments.values_mut() {
            resolve_input(&mut argument.type_ref, names, &format!("{node}({})", argument.name))?;
        }
    }
    let directives = &*directives;

    for object in objects.values_mut() {
        check_directives(&object.directives, DirectiveLocation::Object, directives, &object.name)?;
        for interface in &object.interfaces {
            if names.get(interface) != Some(&NodeCategory::Interface) {
                return Err(ValidateError::new(
                    &object.name,
                    format!("`{interface}` is not an interface"),
                ));
            }
        }
        validate_fields(&object.name, &mut object.fields, names, directives)?;
    }

    for interface in interfaces.values_mut() {
        check_directives(
            &interface.directives,
            DirectiveLocation::Interface,
            directives,
            &interface.name,
        )?;
        for parent in &interface.interfaces {
            if names.get(parent) != Some(&NodeCategory::Interface) {
                return Err(ValidateError::new(
                    &interface.name,
                    format!("`{parent}` is not an interface"),
                ));
            }
        }
        validate_fields(&interface.name, &mut interface.fields, names, directives)?;
        interface.possible_types.clear();
    }

    for object in objects.values() {
        for interface_name in &object.interfaces {
            let Some(interface) = interfaces.get_mut(interface_name) else {
                continue;
            };
            for (field_name, interface_field) in &interface.fields {
                let Some(field) = object.fields.get(field_name) else {
                    return Err(ValidateError::new(
                        &object.name,
                        format!("missing field `{field_name}` required by interface `{interface_name}`"),
                    ));
                };
                if !field.type_ref.is_compatible_with(&interface_field.type_ref) {
                    return Err(ValidateError::new(
                        format!("{}.{field_name}", object.name),
                        format!(
                            "type `{}` does not match `{}` declared by interface `{interface_name}`",
                            field.type_ref, interface_field.type_ref,
                        ),
                    ));
                }
            }
            interface.possible_types.push(object.name.clone());
        }
    }

    for union in unions.values_mut() {
        check_directives(&union.directives, DirectiveLocation::Union, directives, &union.name)?;
        union.possible_types.clear();
        for member in &union.members {
            if names.get(member) != Some(&NodeCategory::Object) {
                return Err(ValidateError::new(
                    &union.name,
                    format!("union member `{member}` is not an object type"),
                ));
            }
            union.possible_types.push(member.clone());
        }
    }

    for enum_node in enums.values_mut() {
        check_directives(&enum_node.directives, DirectiveLocation::Enum, directives, &enum_node.name)?;
        for value in enum_node.values.values_mut() {
            let node = format!("{}.{}", enum_node.name, value.name);
            check_directives(&value.directives, DirectiveLocation::EnumValue, directives, &node)?;
            if let Some(code) = value.directives.iter().find(|d| d.name == "enum") {
                value.code = Some(code.argument("value").and_then(Value::as_i64).ok_or_else(
                    || ValidateError::new(&node, "@enum requires an Int `value`"),
                )?);
            }
            value.deprecation = deprecation(&value.directives);
        }
    }

    for input in input_objects.values_mut() {
        check_directives(&input.directives, DirectiveLocation::InputObject, directives, &input.name)?;
        for field in input.fields.values_mut() {
            let node = format!("{}.{}", input.name, field.name);
            validate_argument(field, DirectiveLocation::InputFieldDefinition, names, directives, &node)?;
        }
    }

    for scalar in scalars.values() {
        check_directives(&scalar.directives, DirectiveLocation::Scalar, directives, &scalar.name)?;
    }

    for object in objects.values_mut() {
        if !object.fields.contains_key("__typename") {
            object.fields.insert(
                "__typename".to_string(),
                FieldDescriptor::new(
                    "__typename",
                    TypeRef::non_null(TypeRef::resolved("String", TypeKind::Scalar)),
                ),
            );
        }
    }
    Ok(())
}

fn validate_fields(
    type_name: &str,
    fields: &mut IndexMap<String, FieldDescriptor>,
    names: &Names,
    directives: &DirectiveDefs,
) -> Result<()> {
    for field in fields.values_mut() {
        let node = format!("{type_name}.{}", field.name);
        check_directives(&field.directives, DirectiveLocation::FieldDefinition, directives, &node)?;
        resolve(&mut field.type_ref, names, &node)?;
        if field.type_ref.named_kind() == Some(TypeKind::InputObject) {
            return Err(ValidateError::new(
                node,
                format!("input type `{}` cannot be a field type", field.type_ref.name()),
            ));
        }
        for argument in field.arguments.values_mut() {
            let node = format!("{node}({})", argument.name);
            validate_argument(argument, DirectiveLocation::ArgumentDefinition, names, directives, &node)?;
        }
    }
    Ok(())
}

fn validate_argument(
    argument: &mut ArgumentDescriptor,
    location: DirectiveLocation,
    names: &Names,
    directives: &DirectiveDefs,
    node: &str,
) -> Result<()> {
    check_directives(&argument.directives, location, directives, node)?;
    resolve_input(&mut argument.type_ref, names, node)?;
    argument.deprecation = deprecation(&argument.directives);
    Ok(())
}

fn deprecation(directives: &DirectiveList) -> Option<String> {
    directives.iter().find(|d| d.name == "deprecated").map(|d| {
        d.string_argument("reason")
            .unwrap_or("field is deprecated")
            .to_string()
    })
}

fn resolve(type_ref: &mut TypeRef, names: &Names, node: &str) -> Result<()> {
    let named = type_ref.named_type_mut();
    let kind = names
        .get(&named.name)
        .and_then(NodeCategory::type_kind)
        .ok_or_else(|| ValidateError::new(node, format!("unknown type `{}`", named.name)))?;
    named.kind = Some(kind);
    Ok(())
}

fn resolve_input(type_ref: &mut TypeRef, names: &Names, node: &str) -> Result<()> {
    resolve(type_ref, names, node)?;
    match type_ref.named_kind() {
        Some(kind) if kind.is_input() => Ok(()),
        _ => Err(ValidateError::new(
            node,
            format!("`{}` is not an input type", type_ref.name()),
        )),
    }
}

fn check_directives(
    applied: &DirectiveList,
    location: DirectiveLocation,
    definitions: &DirectiveDefs,
    node: &str,
) -> Result<()> {
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for directive in applied {
        let Some(definition) = definitions.get(&directive.name) else {
            return Err(ValidateError::new(
                node,
                format!("unknown directive `@{}`", directive.name),
            ));
        };
        if !definition.allows(location) {
            return Err(ValidateError::new(
                node,
                format!("directive `@{}` is not allowed on {location}", directive.name),
            ));
        }
        let count = uses.entry(directive.name.as_str()).or_default();
        *count += 1;
        if *count > 1 && !definition.repeatable {
            return Err(ValidateError::new(
                node,
                format!("directive `@{}` is not repeatable", directive.name),
            ));
        }
        for argument in directive.arguments.keys() {
            if !definition.arguments.contains_key(argument) {
                return Err(ValidateError::new(
                    node,
                    format!("directive `@{}` has no argument `{argument}`", directive.name),
                ));
            }
        }
    }
    Ok(())
}
