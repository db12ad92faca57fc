use crate::schema::DirectiveList;
use crate::schema::schema_node::impl_schema_node;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct UnionNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: DirectiveList,
    /// Member names in declaration order.
    pub members: Vec<String>,
    /// The members once validated as object types.
    pub possible_types: Vec<String>,
    pub span: SourceSpan,
}

impl UnionNode {
    pub fn from_ast(def: &ast::UnionTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            members: def.members.clone(),
            possible_types: Vec::new(),
            span: def.span.clone(),
        }
    }
}

impl_schema_node!(UnionNode);
