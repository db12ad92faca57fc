use crate::schema::DirectiveList;
use crate::schema::FieldDescriptor;
use crate::schema::schema_node::impl_schema_node;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceNode {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub directives: DirectiveList,
    pub fields: IndexMap<String, FieldDescriptor>,
    /// Object types implementing this interface; filled in by the validator.
    pub possible_types: Vec<String>,
    pub span: SourceSpan,
}

impl InterfaceNode {
    pub fn from_ast(def: &ast::InterfaceTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            interfaces: def.interfaces.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            fields: FieldDescriptor::map_from_ast(&def.fields),
            possible_types: Vec::new(),
            span: def.span.clone(),
        }
    }
}

impl_schema_node!(InterfaceNode);
