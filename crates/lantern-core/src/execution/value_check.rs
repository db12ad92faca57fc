//! Coercion of input values to declared argument types, and of produced
//! leaf values to their output types.

use crate::schema::NodeCategory;
use crate::schema::NodeStore;
use crate::types::TypeRef;
use indexmap::IndexMap;
use lantern_parser::Value;

/// Coerces an argument or variable value to `type_ref`. Variables must
/// already be substituted.
pub fn coerce_input(store: &NodeStore, value: &Value, type_ref: &TypeRef) -> Result<Value, String> {
    match type_ref {
        TypeRef::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("expected a non-null value of type `{type_ref}`"));
            }
            coerce_input(store, value, inner)
        },
        _ if value.is_null() => Ok(Value::Null),
        TypeRef::List(inner) => match value {
            Value::List(items) => items
                .iter()
                .map(|item| coerce_input(store, item, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            single => Ok(Value::List(vec![coerce_input(store, single, inner)?])),
        },
        TypeRef::Named(named) => coerce_named(store, value, &named.name),
    }
}

fn coerce_named(store: &NodeStore, value: &Value, type_name: &str) -> Result<Value, String> {
    match store.category(type_name) {
        Some(NodeCategory::Scalar) => {
            if matches!(value, Value::Variable(_)) {
                return Err(format!("unresolved variable {value}"));
            }
            match store.scalar(type_name).and_then(|s| s.behavior.as_ref()) {
                Some(behavior) => behavior.parse_literal(value),
                None => Ok(value.clone()),
            }
        },
        Some(NodeCategory::Enum) => {
            let enum_node = store
                .enum_type(type_name)
                .ok_or_else(|| format!("unknown enum `{type_name}`"))?;
            let name = match value {
                Value::Enum(name) | Value::String(name) => name.as_str(),
                other => return Err(format!("`{type_name}` cannot represent value {other}")),
            };
            if enum_node.value(name).is_none() {
                return Err(format!("`{name}` is not a value of enum `{type_name}`"));
            }
            Ok(Value::Enum(name.to_string()))
        },
        Some(NodeCategory::InputObject) => {
            let input = store
                .input_object(type_name)
                .ok_or_else(|| format!("unknown input type `{type_name}`"))?;
            let Value::Object(provided) = value else {
                return Err(format!("`{type_name}` expects an object, got {value}"));
            };
            if let Some(unknown) = provided.keys().find(|key| !input.fields.contains_key(*key)) {
                return Err(format!("`{type_name}` has no field `{unknown}`"));
            }
            let mut coerced = IndexMap::new();
            for (name, field) in &input.fields {
                match provided.get(name) {
                    Some(value) => {
                        let value = coerce_input(store, value, &field.type_ref)
                            .map_err(|message| format!("{type_name}.{name}: {message}"))?;
                        coerced.insert(name.clone(), value);
                    },
                    None => match &field.default_value {
                        Some(default) => {
                            coerced.insert(name.clone(), default.clone());
                        },
                        None if field.type_ref.is_non_null() => {
                            return Err(format!("missing required field `{type_name}.{name}`"));
                        },
                        None => {},
                    },
                }
            }
            Ok(Value::Object(coerced))
        },
        Some(_) => Err(format!("`{type_name}` is not an input type")),
        None => Err(format!("unknown type `{type_name}`")),
    }
}

/// Coerces a value produced for a scalar or enum field. Enum values may be
/// produced by name or by their `@enum(value:)` code.
pub fn serialize_leaf(store: &NodeStore, type_name: &str, value: &Value) -> Result<Value, String> {
    if let Some(enum_node) = store.enum_type(type_name) {
        let descriptor = match value {
            Value::Enum(name) | Value::String(name) => enum_node.value(name),
            Value::Int(code) => enum_node.value_by_code(*code),
            _ => None,
        };
        return descriptor
            .map(|d| Value::Enum(d.name.clone()))
            .ok_or_else(|| format!("{value} is not a value of enum `{type_name}`"));
    }
    match store.scalar(type_name).and_then(|s| s.behavior.as_ref()) {
        Some(behavior) => behavior.serialize(value),
        None => Ok(value.clone()),
    }
}
