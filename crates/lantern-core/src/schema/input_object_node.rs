use crate::schema::ArgumentDescriptor;
use crate::schema::DirectiveList;
use crate::schema::schema_node::impl_schema_node;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: DirectiveList,
    pub fields: IndexMap<String, ArgumentDescriptor>,
    pub span: SourceSpan,
}

impl InputObjectNode {
    pub fn from_ast(def: &ast::InputObjectTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            fields: ArgumentDescriptor::map_from_ast(&def.fields),
            span: def.span.clone(),
        }
    }
}

impl_schema_node!(InputObjectNode);
