use crate::schema::DirectiveList;
use crate::schema::schema_node::impl_schema_node;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct EnumNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: DirectiveList,
    pub values: IndexMap<String, EnumValueDescriptor>,
    pub span: SourceSpan,
}

impl EnumNode {
    pub fn from_ast(def: &ast::EnumTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            values: def
                .values
                .iter()
                .map(|v| (v.name.clone(), EnumValueDescriptor::from_ast(v)))
                .collect(),
            span: def.span.clone(),
        }
    }

    pub fn value(&self, name: &str) -> Option<&EnumValueDescriptor> {
        self.values.get(name)
    }

    /// The value carrying numeric code `code`.
    pub fn value_by_code(&self, code: i64) -> Option<&EnumValueDescriptor> {
        self.values.values().find(|v| v.code == Some(code))
    }
}

impl_schema_node!(EnumNode);

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub directives: DirectiveList,
    /// Storage code from `@enum(value:)`.
    pub code: Option<i64>,
    pub deprecation: Option<String>,
    pub span: SourceSpan,
}

impl EnumValueDescriptor {
    pub fn from_ast(def: &ast::EnumValueDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            directives: SmallVec::from_vec(def.directives.clone()),
            code: None,
            deprecation: None,
            span: def.span.clone(),
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }
}

impl_schema_node!(EnumValueDescriptor);
