use crate::types::TypeKind;
use lantern_parser::ast::TypeAnnotation;
use std::fmt;

/// A reference to a named type. `kind` is `None` until the validator has
/// resolved the name against the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamedTypeRef {
    pub name: String,
    pub kind: Option<TypeKind>,
}

/// The declared type of a field, argument, input field or variable.
///
/// Wrappers nest through `Box`, so walking [`TypeRef::of_type`] always ends
/// at a `Named` ref.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    Named(NamedTypeRef),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(NamedTypeRef {
            name: name.into(),
            kind: None,
        })
    }

    /// A named ref whose kind is already known, for types the engine
    /// synthesizes.
    pub fn resolved(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeRef::Named(NamedTypeRef {
            name: name.into(),
            kind: Some(kind),
        })
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn from_annotation(annotation: &TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::Named { name, .. } => TypeRef::named(name.clone()),
            TypeAnnotation::List { inner, .. } => TypeRef::list(TypeRef::from_annotation(inner)),
            TypeAnnotation::NonNull { inner, .. } => {
                TypeRef::non_null(TypeRef::from_annotation(inner))
            },
        }
    }

    /// The kind of this ref; `None` for a named ref not yet resolved.
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            TypeRef::Named(named) => named.kind,
            TypeRef::List(_) => Some(TypeKind::List),
            TypeRef::NonNull(_) => Some(TypeKind::NonNull),
        }
    }

    /// The wrapped type of a list or non-null ref.
    pub fn of_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Named(_) => None,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => Some(inner),
        }
    }

    pub fn named_type(&self) -> &NamedTypeRef {
        match self {
            TypeRef::Named(named) => named,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn named_type_mut(&mut self) -> &mut NamedTypeRef {
        match self {
            TypeRef::Named(named) => named,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type_mut(),
        }
    }

    /// Name of the innermost named type.
    pub fn name(&self) -> &str {
        &self.named_type().name
    }

    /// Resolved kind of the innermost named type.
    pub fn named_kind(&self) -> Option<TypeKind> {
        self.named_type().kind
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }

    /// This ref without an outer non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Whether a field of type `self` may implement an interface field of
    /// type `interface`: the same named type and kind with wrappers compared
    /// pairwise, except that `self` may add non-null wrappers.
    pub fn is_compatible_with(&self, interface: &TypeRef) -> bool {
        match (self, interface) {
            (TypeRef::NonNull(a), TypeRef::NonNull(b)) => a.is_compatible_with(b),
            (TypeRef::NonNull(a), b) => a.is_compatible_with(b),
            (TypeRef::List(a), TypeRef::List(b)) => a.is_compatible_with(b),
            (TypeRef::Named(a), TypeRef::Named(b)) => a.name == b.name && a.kind == b.kind,
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(named) => f.write_str(&named.name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
