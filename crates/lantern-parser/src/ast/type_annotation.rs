use crate::ast::AstNode;
use crate::SourceSpan;
use inherent::inherent;
use std::fmt;

/// A type reference as written in source: `User`, `[User]`, `[User!]!`.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation {
    Named { name: String, span: SourceSpan },
    List { inner: Box<TypeAnnotation>, span: SourceSpan },
    NonNull { inner: Box<TypeAnnotation>, span: SourceSpan },
}

impl TypeAnnotation {
    /// The name of the innermost named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeAnnotation::Named { name, .. } => name,
            TypeAnnotation::List { inner, .. } | TypeAnnotation::NonNull { inner, .. } => {
                inner.innermost_name()
            },
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeAnnotation::NonNull { .. })
    }
}

#[inherent]
impl AstNode for TypeAnnotation {
    pub fn span(&self) -> &SourceSpan {
        match self {
            TypeAnnotation::Named { span, .. }
            | TypeAnnotation::List { span, .. }
            | TypeAnnotation::NonNull { span, .. } => span,
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Named { name, .. } => write!(f, "{name}"),
            TypeAnnotation::List { inner, .. } => write!(f, "[{inner}]"),
            TypeAnnotation::NonNull { inner, .. } => write!(f, "{inner}!"),
        }
    }
}
