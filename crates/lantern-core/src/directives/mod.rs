//! Directives that shape the node model at load time, and directives that
//! wrap field execution.

mod metadata;
mod paginate;
mod relation;
pub mod runtime;

use crate::error::ValidateError;
use crate::schema::FieldDescriptor;
use crate::schema::NodeCategory;
use crate::schema::NodeStore;
use crate::schema::ObjectNode;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The type owning a field whose directives are being applied.
#[derive(Clone, Copy, Debug)]
pub struct ParentInfo<'a> {
    pub type_name: &'a str,
    pub category: NodeCategory,
    /// Name of the query root type.
    pub query_root: &'a str,
}

pub type FieldDirectiveFn = Arc<
    dyn Fn(
            &mut FieldDescriptor,
            &DirectiveAnnotation,
            &mut NodeStore,
            &ParentInfo<'_>,
        ) -> Result<(), ValidateError>
        + Send
        + Sync,
>;

pub type ObjectDirectiveFn = Arc<
    dyn Fn(&mut ObjectNode, &DirectiveAnnotation, &mut NodeStore) -> Result<(), ValidateError>
        + Send
        + Sync,
>;

/// Load-time directive handlers by directive name.
///
/// Each handler runs once per application, after its node is built and
/// before the node enters the store.
#[derive(Clone, Default)]
pub struct DefinitionDirectives {
    field: HashMap<String, FieldDirectiveFn>,
    object: HashMap<String, ObjectDirectiveFn>,
}

impl DefinitionDirectives {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the relation, pagination and metadata handlers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_field("belongsTo", relation::belongs_to)
            .register_field("hasOne", relation::has_one)
            .register_field("hasMany", relation::has_many)
            .register_field("belongsToMany", relation::belongs_to_many)
            .register_field("manyToMany", relation::many_to_many)
            .register_field("morphTo", relation::morph_to)
            .register_field("morphToMany", relation::morph_to_many)
            .register_field("paginate", paginate::paginate)
            .register_field("deprecated", metadata::deprecated)
            .register_field("searchable", metadata::searchable)
            .register_field("attr", metadata::attr)
            .register_object("extends", metadata::extends)
            .register_object("scopes", metadata::scopes)
            .register_object("model", metadata::model)
            .register_object("softDeleteModel", metadata::soft_delete_model);
        registry
    }

    pub fn register_field<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(
                &mut FieldDescriptor,
                &DirectiveAnnotation,
                &mut NodeStore,
                &ParentInfo<'_>,
            ) -> Result<(), ValidateError>
            + Send
            + Sync
            + 'static,
    {
        self.field.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn register_object<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut ObjectNode, &DirectiveAnnotation, &mut NodeStore) -> Result<(), ValidateError>
            + Send
            + Sync
            + 'static,
    {
        self.object.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDirectiveFn> {
        self.field.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDirectiveFn> {
        self.object.get(name)
    }
}

impl fmt::Debug for DefinitionDirectives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut field: Vec<&String> = self.field.keys().collect();
        let mut object: Vec<&String> = self.object.keys().collect();
        field.sort();
        object.sort();
        f.debug_struct("DefinitionDirectives")
            .field("field", &field)
            .field("object", &object)
            .finish()
    }
}

/// Reads a list-of-strings directive argument such as `scopes: ["active"]`.
/// A single string counts as a one-element list.
pub(crate) fn string_list_argument(directive: &DirectiveAnnotation, name: &str) -> Vec<String> {
    match directive.argument(name) {
        Some(Value::List(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}
