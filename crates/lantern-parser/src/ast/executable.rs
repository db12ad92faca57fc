use crate::ast::AstNode;
use crate::ast::DirectiveAnnotation;
use crate::ast::TypeAnnotation;
use crate::SourceSpan;
use crate::Value;
use indexmap::IndexMap;
use inherent::inherent;
use serde::Serialize;
use std::fmt;

/// A parsed query document: operations and fragments, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutableDocument {
    pub operations: Vec<OperationDefinition>,
    pub fragments: Vec<FragmentDefinition>,
}

impl ExecutableDocument {
    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition {
    pub span: SourceSpan,
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: SelectionSet,
}

#[inherent]
impl AstNode for OperationDefinition {
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub span: SourceSpan,
    pub name: String,
    pub type_annotation: TypeAnnotation,
    pub default_value: Option<Value>,
    pub directives: Vec<DirectiveAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    pub span: SourceSpan,
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: SelectionSet,
}

#[inherent]
impl AstNode for FragmentDefinition {
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSet {
    pub span: SourceSpan,
    pub selections: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[inherent]
impl AstNode for Selection {
    pub fn span(&self) -> &SourceSpan {
        match self {
            Selection::Field(f) => &f.span,
            Selection::FragmentSpread(f) => &f.span,
            Selection::InlineFragment(f) => &f.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub span: SourceSpan,
    pub alias: Option<String>,
    pub name: String,
    pub arguments: IndexMap<String, Value>,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    /// The key this field is reported under in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    pub span: SourceSpan,
    pub name: String,
    pub directives: Vec<DirectiveAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub span: SourceSpan,
    pub type_condition: Option<String>,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: SelectionSet,
}
