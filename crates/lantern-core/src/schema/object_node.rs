use crate::schema::DirectiveList;
use crate::schema::FieldDescriptor;
use crate::schema::schema_node::impl_schema_node;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use smallvec::SmallVec;

/// Set on object types marked `@model` or `@softDeleteModel`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelInfo {
    /// Storage name of the model, e.g. its table.
    pub name: String,
    pub soft_delete: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectNode {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub directives: DirectiveList,
    pub fields: IndexMap<String, FieldDescriptor>,
    /// Set by `@extends`.
    pub is_extended: bool,
    pub model: Option<ModelInfo>,
    /// Default scopes of quick queries on this type, from `@scopes`.
    pub scopes: Vec<String>,
    pub span: SourceSpan,
}

impl ObjectNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interfaces: Vec::new(),
            directives: DirectiveList::new(),
            fields: IndexMap::new(),
            is_extended: false,
            model: None,
            scopes: Vec::new(),
            span: SourceSpan::zero(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn from_ast(def: &ast::ObjectTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            interfaces: def.interfaces.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            fields: FieldDescriptor::map_from_ast(&def.fields),
            is_extended: false,
            model: None,
            scopes: Vec::new(),
            span: def.span.clone(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn is_model(&self) -> bool {
        self.model.is_some()
    }
}

impl_schema_node!(ObjectNode);
