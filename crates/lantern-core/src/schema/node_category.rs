use crate::types::TypeKind;
use std::fmt;

/// What a name in the [`NodeStore`](crate::schema::NodeStore) refers to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeCategory {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
    Directive,
}

impl NodeCategory {
    pub fn is_type(&self) -> bool {
        !matches!(self, NodeCategory::Directive)
    }

    /// The type kind of a node in this category; `None` for directives.
    pub fn type_kind(&self) -> Option<TypeKind> {
        Some(match self {
            NodeCategory::Object => TypeKind::Object,
            NodeCategory::Interface => TypeKind::Interface,
            NodeCategory::Union => TypeKind::Union,
            NodeCategory::Enum => TypeKind::Enum,
            NodeCategory::Scalar => TypeKind::Scalar,
            NodeCategory::InputObject => TypeKind::InputObject,
            NodeCategory::Directive => return None,
        })
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeCategory::Object => "an object type",
            NodeCategory::Interface => "an interface",
            NodeCategory::Union => "a union",
            NodeCategory::Enum => "an enum",
            NodeCategory::Scalar => "a scalar",
            NodeCategory::InputObject => "an input object",
            NodeCategory::Directive => "a directive",
        })
    }
}
