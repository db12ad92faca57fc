mod type_kind;
mod type_ref;

pub use type_kind::TypeKind;
pub use type_ref::NamedTypeRef;
pub use type_ref::TypeRef;
