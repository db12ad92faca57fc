//! The syntax tree produced by [`Parser`](crate::Parser).
//!
//! All nodes own their data so that a parsed document can outlive the source
//! text it came from.

mod ast_node;
mod directive_annotation;
mod directive_location;
mod executable;
mod schema;
mod type_annotation;

pub use ast_node::AstNode;
pub use directive_annotation::DirectiveAnnotation;
pub use directive_location::DirectiveLocation;
pub use executable::ExecutableDocument;
pub use executable::Field;
pub use executable::FragmentDefinition;
pub use executable::FragmentSpread;
pub use executable::InlineFragment;
pub use executable::OperationDefinition;
pub use executable::OperationKind;
pub use executable::Selection;
pub use executable::SelectionSet;
pub use executable::VariableDefinition;
pub use schema::DirectiveDefinition;
pub use schema::EnumTypeDefinition;
pub use schema::EnumValueDefinition;
pub use schema::FieldDefinition;
pub use schema::InputObjectTypeDefinition;
pub use schema::InputValueDefinition;
pub use schema::InterfaceTypeDefinition;
pub use schema::ObjectTypeDefinition;
pub use schema::ScalarTypeDefinition;
pub use schema::SchemaDefinition;
pub use schema::SchemaDocument;
pub use schema::TypeDefinition;
pub use schema::UnionTypeDefinition;
pub use type_annotation::TypeAnnotation;
