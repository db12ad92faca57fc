use crate::ast::AstNode;
use crate::SourceSpan;
use crate::Value;
use indexmap::IndexMap;
use inherent::inherent;

/// A directive applied to a schema element or a query element, e.g.
/// `@belongsTo(foreignKey: "owner_id")`.
///
/// This is an *invocation*, not a directive definition.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveAnnotation {
    pub span: SourceSpan,
    pub name: String,
    pub arguments: IndexMap<String, Value>,
}

impl DirectiveAnnotation {
    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Looks up a string (or enum) argument by name.
    pub fn string_argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(Value::as_str)
    }
}

#[inherent]
impl AstNode for DirectiveAnnotation {
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }
}
