//! Answers `__schema` and `__type` from the node store.

use crate::config::RootTypes;
use crate::error::ExecutionError;
use crate::execution::merge::SelectionSets;
use crate::execution::merge::collect_fields;
use crate::execution::merge::group_selections;
use crate::operation::PreparedField;
use crate::schema::ArgumentDescriptor;
use crate::schema::DirectiveDefinitionNode;
use crate::schema::EnumValueDescriptor;
use crate::schema::FieldDescriptor;
use crate::schema::NodeStore;
use crate::types::TypeKind;
use crate::types::TypeRef;
use indexmap::IndexMap;
use lantern_parser::Value;

type Result<T> = std::result::Result<T, ExecutionError>;

pub(crate) struct Introspector<'s> {
    store: &'s NodeStore,
    root_types: &'s RootTypes,
}

impl<'s> Introspector<'s> {
    pub fn new(store: &'s NodeStore, root_types: &'s RootTypes) -> Self {
        Self { store, root_types }
    }

    /// Builds an object of introspection type `type_name`, asking `resolve`
    /// for every selected field but `__typename`.
    fn object<F>(&self, type_name: &str, sets: &SelectionSets<'_>, mut resolve: F) -> Result<Value>
    where
        F: FnMut(&PreparedField, SelectionSets<'_>) -> Result<Value>,
    {
        let mut out = IndexMap::new();
        for (key, group) in collect_fields(self.store, sets, Some(type_name)) {
            let field = group[0];
            let value = if field.name == "__typename" {
                Value::String(type_name.to_string())
            } else {
                resolve(field, group_selections(&group))?
            };
            out.insert(key.to_string(), value);
        }
        Ok(Value::Object(out))
    }

    fn list<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        mut each: impl FnMut(T) -> Result<Value>,
    ) -> Result<Value> {
        items
            .into_iter()
            .map(&mut each)
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    pub fn schema(&self, sets: &SelectionSets<'_>) -> Result<Value> {
        self.object("__Schema", sets, |field, sub| match field.name.as_str() {
            "types" => {
                let mut names: Vec<&str> = self
                    .store
                    .type_names()
                    .filter(|name| !name.starts_with("__"))
                    .collect();
                names.sort_unstable();
                self.list(names, |name| self.named_type(name, &sub))
            },
            "queryType" => self.named_type(&self.root_types.query, &sub),
            "mutationType" => self.root_type(&self.root_types.mutation, &sub),
            "subscriptionType" => self.root_type(&self.root_types.subscription, &sub),
            "directives" => self.list(
                self.store.directives().filter(|d| d.is_executable()),
                |directive| self.directive(directive, &sub),
            ),
            _ => Ok(Value::Null),
        })
    }

    fn root_type(&self, name: &str, sets: &SelectionSets<'_>) -> Result<Value> {
        match self.store.object(name) {
            Some(_) => self.named_type(name, sets),
            None => Ok(Value::Null),
        }
    }

    /// `__Type` for a named type; null when no such type exists.
    pub fn named_type(&self, name: &str, sets: &SelectionSets<'_>) -> Result<Value> {
        let Some(kind) = self.store.type_kind(name) else {
            return Ok(Value::Null);
        };
        self.object("__Type", sets, |field, sub| {
            let include_deprecated = field
                .arguments
                .get("includeDeprecated")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            match field.name.as_str() {
                "kind" => Ok(Value::Enum(kind.as_str().to_string())),
                "name" => Ok(Value::String(name.to_string())),
                "description" => Ok(self.description(name).into()),
                "fields" => match self.store.fields_of(name) {
                    Some(fields) => self.list(
                        fields.values().filter(|f| {
                            !f.name.starts_with("__") && (include_deprecated || !f.is_deprecated())
                        }),
                        |f| self.field(f, &sub),
                    ),
                    None => Ok(Value::Null),
                },
                "interfaces" => {
                    let interfaces = match kind {
                        TypeKind::Object => self.store.object(name).map(|o| &o.interfaces),
                        TypeKind::Interface => self.store.interface(name).map(|i| &i.interfaces),
                        _ => None,
                    };
                    match interfaces {
                        Some(names) => self.list(names, |n| self.named_type(n, &sub)),
                        None => Ok(Value::Null),
                    }
                },
                "possibleTypes" if kind.is_abstract() => {
                    self.list(self.store.possible_types(name), |n| self.named_type(n, &sub))
                },
                "enumValues" => match self.store.enum_type(name) {
                    Some(node) => self.list(
                        node.values
                            .values()
                            .filter(|v| include_deprecated || !v.is_deprecated()),
                        |v| self.enum_value(v, &sub),
                    ),
                    None => Ok(Value::Null),
                },
                "inputFields" => match self.store.input_object(name) {
                    Some(node) => self.list(node.fields.values(), |a| self.input_value(a, &sub)),
                    None => Ok(Value::Null),
                },
                _ => Ok(Value::Null),
            }
        })
    }

    fn description(&self, name: &str) -> Option<String> {
        let store = self.store;
        let description = match store.type_kind(name)? {
            TypeKind::Object => store.object(name)?.description.as_ref(),
            TypeKind::Interface => store.interface(name)?.description.as_ref(),
            TypeKind::Union => store.union(name)?.description.as_ref(),
            TypeKind::Enum => store.enum_type(name)?.description.as_ref(),
            TypeKind::Scalar => store.scalar(name)?.description.as_ref(),
            TypeKind::InputObject => store.input_object(name)?.description.as_ref(),
            TypeKind::List | TypeKind::NonNull => None,
        };
        description.cloned()
    }

    /// `__Type` for a possibly wrapped reference.
    fn type_ref(&self, type_ref: &TypeRef, sets: &SelectionSets<'_>) -> Result<Value> {
        let (kind, inner) = match type_ref {
            TypeRef::Named(named) => return self.named_type(&named.name, sets),
            TypeRef::List(inner) => (TypeKind::List, inner),
            TypeRef::NonNull(inner) => (TypeKind::NonNull, inner),
        };
        self.object("__Type", sets, |field, sub| match field.name.as_str() {
            "kind" => Ok(Value::Enum(kind.as_str().to_string())),
            "ofType" => self.type_ref(inner, &sub),
            _ => Ok(Value::Null),
        })
    }

    fn field(&self, descriptor: &FieldDescriptor, sets: &SelectionSets<'_>) -> Result<Value> {
        self.object("__Field", sets, |field, sub| match field.name.as_str() {
            "name" => Ok(Value::String(descriptor.name.clone())),
            "description" => Ok(descriptor.description.clone().into()),
            "args" => self.list(descriptor.arguments.values(), |a| self.input_value(a, &sub)),
            "type" => self.type_ref(&descriptor.type_ref, &sub),
            "isDeprecated" => Ok(Value::Boolean(descriptor.is_deprecated())),
            "deprecationReason" => Ok(descriptor.deprecation.clone().into()),
            _ => Ok(Value::Null),
        })
    }

    fn input_value(&self, argument: &ArgumentDescriptor, sets: &SelectionSets<'_>) -> Result<Value> {
        self.object("__InputValue", sets, |field, sub| match field.name.as_str() {
            "name" => Ok(Value::String(argument.name.clone())),
            "description" => Ok(argument.description.clone().into()),
            "type" => self.type_ref(&argument.type_ref, &sub),
            "defaultValue" => Ok(argument
                .default_value
                .as_ref()
                .map(ToString::to_string)
                .into()),
            "isDeprecated" => Ok(Value::Boolean(argument.deprecation.is_some())),
            "deprecationReason" => Ok(argument.deprecation.clone().into()),
            _ => Ok(Value::Null),
        })
    }

    fn enum_value(&self, value: &EnumValueDescriptor, sets: &SelectionSets<'_>) -> Result<Value> {
        self.object("__EnumValue", sets, |field, _| match field.name.as_str() {
            "name" => Ok(Value::String(value.name.clone())),
            "description" => Ok(value.description.clone().into()),
            "isDeprecated" => Ok(Value::Boolean(value.is_deprecated())),
            "deprecationReason" => Ok(value.deprecation.clone().into()),
            _ => Ok(Value::Null),
        })
    }

    fn directive(
        &self,
        directive: &DirectiveDefinitionNode,
        sets: &SelectionSets<'_>,
    ) -> Result<Value> {
        self.object("__Directive", sets, |field, sub| match field.name.as_str() {
            "name" => Ok(Value::String(directive.name.clone())),
            "description" => Ok(directive.description.clone().into()),
            "locations" => Ok(Value::List(
                directive
                    .locations
                    .iter()
                    .map(|location| Value::Enum(location.as_str().to_string()))
                    .collect(),
            )),
            "args" => self.list(directive.arguments.values(), |a| self.input_value(a, &sub)),
            "isRepeatable" => Ok(Value::Boolean(directive.repeatable)),
            _ => Ok(Value::Null),
        })
    }
}
