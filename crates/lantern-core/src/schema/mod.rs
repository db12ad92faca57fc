//! The semantic node model built from schema documents.

mod directive_definition_node;
mod enum_node;
mod field_descriptor;
mod input_object_node;
mod interface_node;
mod node_category;
mod node_store;
mod object_node;
mod relation_descriptor;
pub(crate) mod reserved;
mod scalar_node;
mod schema_node;
mod store_builder;
mod union_node;

pub use directive_definition_node::DirectiveDefinitionNode;
pub use enum_node::EnumNode;
pub use enum_node::EnumValueDescriptor;
pub use field_descriptor::ArgumentDescriptor;
pub use field_descriptor::DirectiveList;
pub use field_descriptor::FieldDescriptor;
pub use input_object_node::InputObjectNode;
pub use interface_node::InterfaceNode;
pub use node_category::NodeCategory;
pub use node_store::NodeStore;
pub use object_node::ModelInfo;
pub use object_node::ObjectNode;
pub use relation_descriptor::RelationDescriptor;
pub use relation_descriptor::RelationType;
pub use scalar_node::ScalarNode;
pub use schema_node::SchemaNode;
pub use store_builder::StoreBuilder;
pub use union_node::UnionNode;
