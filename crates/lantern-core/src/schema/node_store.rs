use crate::error::SchemaLoadError;
use crate::schema::DirectiveDefinitionNode;
use crate::schema::EnumNode;
use crate::schema::FieldDescriptor;
use crate::schema::InputObjectNode;
use crate::schema::InterfaceNode;
use crate::schema::NodeCategory;
use crate::schema::ObjectNode;
use crate::schema::ScalarNode;
use crate::schema::UnionNode;
use crate::types::TypeKind;
use crate::types::TypeRef;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;

/// Every node of a loaded schema.
///
/// Names are unique across all categories. Built by a
/// [`StoreBuilder`](crate::schema::StoreBuilder), then shared read-only by
/// the engine.
#[derive(Debug, Default)]
pub struct NodeStore {
    pub(crate) names: IndexMap<String, NodeCategory>,
    pub(crate) objects: IndexMap<String, ObjectNode>,
    pub(crate) interfaces: IndexMap<String, InterfaceNode>,
    pub(crate) unions: IndexMap<String, UnionNode>,
    pub(crate) enums: IndexMap<String, EnumNode>,
    pub(crate) scalars: IndexMap<String, ScalarNode>,
    pub(crate) input_objects: IndexMap<String, InputObjectNode>,
    pub(crate) directives: IndexMap<String, DirectiveDefinitionNode>,
    /// `__schema`, `__type` and `__typename`, answerable without a
    /// definition on the parent type.
    pub(crate) meta_fields: IndexMap<String, FieldDescriptor>,
}

impl NodeStore {
    pub fn new() -> Self {
        let mut store = Self::default();
        store.meta_fields = meta_fields();
        store
    }

    pub fn category(&self, name: &str) -> Option<NodeCategory> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// The introspection kind of the type named `name`.
    pub fn type_kind(&self, name: &str) -> Option<TypeKind> {
        self.category(name)?.type_kind()
    }

    pub fn object(&self, name: &str) -> Option<&ObjectNode> {
        self.objects.get(name)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceNode> {
        self.interfaces.get(name)
    }

    pub fn union(&self, name: &str) -> Option<&UnionNode> {
        self.unions.get(name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumNode> {
        self.enums.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarNode> {
        self.scalars.get(name)
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObjectNode> {
        self.input_objects.get(name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDefinitionNode> {
        self.directives.get(name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectNode> {
        self.objects.values()
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveDefinitionNode> {
        self.directives.values()
    }

    /// Names of all types, in insertion order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .filter(|(_, category)| category.is_type())
            .map(|(name, _)| name.as_str())
    }

    /// Fields of an object or interface type.
    pub fn fields_of(&self, type_name: &str) -> Option<&IndexMap<String, FieldDescriptor>> {
        match self.category(type_name)? {
            NodeCategory::Object => self.objects.get(type_name).map(|o| &o.fields),
            NodeCategory::Interface => self.interfaces.get(type_name).map(|i| &i.fields),
            _ => None,
        }
    }

    /// Looks up `field_name` on `type_name`, falling back to the meta fields
    /// every composite type answers.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDescriptor> {
        self.fields_of(type_name)
            .and_then(|fields| fields.get(field_name))
            .or_else(|| self.meta_field(field_name))
    }

    pub fn meta_field(&self, field_name: &str) -> Option<&FieldDescriptor> {
        self.meta_fields.get(field_name)
    }

    /// Object types an abstract type may resolve to. A concrete object type
    /// resolves only to itself.
    pub fn possible_types<'a>(&'a self, type_name: &'a str) -> Vec<&'a str> {
        match self.category(type_name) {
            Some(NodeCategory::Interface) => self
                .interfaces
                .get(type_name)
                .map(|i| i.possible_types.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            Some(NodeCategory::Union) => self
                .unions
                .get(type_name)
                .map(|u| u.possible_types.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            Some(NodeCategory::Object) => vec![type_name],
            _ => Vec::new(),
        }
    }

    /// Whether a value of type `object_type` satisfies type condition
    /// `condition`.
    pub fn satisfies(&self, object_type: &str, condition: &str) -> bool {
        object_type == condition || self.possible_types(condition).contains(&object_type)
    }

    pub(crate) fn object_mut(&mut self, name: &str) -> Option<&mut ObjectNode> {
        self.objects.get_mut(name)
    }

    fn claim_name(
        &mut self,
        name: &str,
        category: NodeCategory,
        span: &SourceSpan,
    ) -> Result<(), SchemaLoadError> {
        if let Some(existing) = self.names.get(name) {
            return Err(SchemaLoadError::NameConflict {
                name: name.to_string(),
                existing: *existing,
                attempted: category,
                span: span.clone(),
            });
        }
        self.names.insert(name.to_string(), category);
        Ok(())
    }

    pub fn insert_object(&mut self, node: ObjectNode) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::Object, &node.span)?;
        self.objects.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn insert_interface(&mut self, node: InterfaceNode) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::Interface, &node.span)?;
        self.interfaces.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn insert_union(&mut self, node: UnionNode) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::Union, &node.span)?;
        self.unions.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn insert_enum(&mut self, node: EnumNode) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::Enum, &node.span)?;
        self.enums.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn insert_scalar(&mut self, node: ScalarNode) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::Scalar, &node.span)?;
        self.scalars.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn insert_input_object(&mut self, node: InputObjectNode) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::InputObject, &node.span)?;
        self.input_objects.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn insert_directive(
        &mut self,
        node: DirectiveDefinitionNode,
    ) -> Result<(), SchemaLoadError> {
        self.claim_name(&node.name, NodeCategory::Directive, &node.span)?;
        self.directives.insert(node.name.clone(), node);
        Ok(())
    }
}

fn meta_fields() -> IndexMap<String, FieldDescriptor> {
    let mut type_field = FieldDescriptor::new(
        "__type",
        TypeRef::resolved("__Type", TypeKind::Object),
    );
    type_field.arguments.insert(
        "name".to_string(),
        crate::schema::ArgumentDescriptor::new(
            "name",
            TypeRef::non_null(TypeRef::resolved("String", TypeKind::Scalar)),
        ),
    );
    [
        FieldDescriptor::new(
            "__schema",
            TypeRef::non_null(TypeRef::resolved("__Schema", TypeKind::Object)),
        ),
        type_field,
        FieldDescriptor::new(
            "__typename",
            TypeRef::non_null(TypeRef::resolved("String", TypeKind::Scalar)),
        ),
    ]
    .into_iter()
    .map(|field| (field.name.clone(), field))
    .collect()
}
