use crate::schema::ArgumentDescriptor;
use crate::schema::DirectiveList;
use crate::schema::schema_node::impl_schema_node;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use lantern_parser::ast::DirectiveLocation;

#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDefinitionNode {
    pub name: String,
    pub description: Option<String>,
    pub arguments: IndexMap<String, ArgumentDescriptor>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
    /// Always empty; directive definitions take no directives.
    pub directives: DirectiveList,
    pub span: SourceSpan,
}

impl DirectiveDefinitionNode {
    pub fn from_ast(def: &ast::DirectiveDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            arguments: ArgumentDescriptor::map_from_ast(&def.arguments),
            repeatable: def.repeatable,
            locations: def.locations.clone(),
            directives: DirectiveList::new(),
            span: def.span.clone(),
        }
    }

    pub fn allows(&self, location: DirectiveLocation) -> bool {
        self.locations.contains(&location)
    }

    /// Whether the directive may appear in query documents.
    pub fn is_executable(&self) -> bool {
        self.locations.iter().any(DirectiveLocation::is_executable)
    }
}

impl_schema_node!(DirectiveDefinitionNode);
