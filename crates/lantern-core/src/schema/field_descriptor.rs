use crate::schema::RelationDescriptor;
use crate::schema::schema_node::impl_schema_node;
use crate::types::TypeRef;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::Value;
use lantern_parser::ast;
use lantern_parser::ast::DirectiveAnnotation;
use smallvec::SmallVec;

/// Directives applied to a schema node. Most nodes carry at most a couple.
pub type DirectiveList = SmallVec<[DirectiveAnnotation; 2]>;

/// A field argument, input-object field or directive argument.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub default_value: Option<Value>,
    pub directives: DirectiveList,
    pub deprecation: Option<String>,
    pub span: SourceSpan,
}

impl ArgumentDescriptor {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref,
            default_value: None,
            directives: DirectiveList::new(),
            deprecation: None,
            span: SourceSpan::zero(),
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn from_ast(def: &ast::InputValueDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            type_ref: TypeRef::from_annotation(&def.type_annotation),
            default_value: def.default_value.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            deprecation: None,
            span: def.span.clone(),
        }
    }

    pub(crate) fn map_from_ast(defs: &[ast::InputValueDefinition]) -> IndexMap<String, Self> {
        defs.iter()
            .map(|def| (def.name.clone(), Self::from_ast(def)))
            .collect()
    }
}

impl_schema_node!(ArgumentDescriptor);

/// A field of an object or interface type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub arguments: IndexMap<String, ArgumentDescriptor>,
    pub directives: DirectiveList,
    /// Set by `@deprecated`.
    pub deprecation: Option<String>,
    /// Set by the relation directives.
    pub relation: Option<RelationDescriptor>,
    pub searchable: bool,
    pub attr: bool,
    pub span: SourceSpan,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref,
            arguments: IndexMap::new(),
            directives: DirectiveList::new(),
            deprecation: None,
            relation: None,
            searchable: false,
            attr: false,
            span: SourceSpan::zero(),
        }
    }

    pub fn from_ast(def: &ast::FieldDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            type_ref: TypeRef::from_annotation(&def.type_annotation),
            arguments: ArgumentDescriptor::map_from_ast(&def.arguments),
            directives: SmallVec::from_vec(def.directives.clone()),
            deprecation: None,
            relation: None,
            searchable: false,
            attr: false,
            span: def.span.clone(),
        }
    }

    pub(crate) fn map_from_ast(defs: &[ast::FieldDefinition]) -> IndexMap<String, Self> {
        defs.iter()
            .map(|def| (def.name.clone(), Self::from_ast(def)))
            .collect()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.get(name)
    }
}

impl_schema_node!(FieldDescriptor);
