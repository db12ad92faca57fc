use crate::scalar::ScalarType;
use crate::schema::DirectiveList;
use crate::schema::schema_node::impl_schema_node;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use smallvec::SmallVec;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ScalarNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: DirectiveList,
    /// Coercion rules, attached from the scalar registry at load time.
    /// Scalars without a registered behavior pass leaf values through.
    pub behavior: Option<Arc<dyn ScalarType>>,
    pub span: SourceSpan,
}

impl ScalarNode {
    pub fn from_ast(def: &ast::ScalarTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            behavior: None,
            span: def.span.clone(),
        }
    }
}

impl_schema_node!(ScalarNode);
