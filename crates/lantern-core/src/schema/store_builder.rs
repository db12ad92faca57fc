use crate::config::RootTypes;
use crate::directives::DefinitionDirectives;
use crate::directives::ParentInfo;
use crate::error::SchemaLoadError;
use crate::scalar::ScalarRegistry;
use crate::schema::DirectiveDefinitionNode;
use crate::schema::EnumNode;
use crate::schema::FieldDescriptor;
use crate::schema::InputObjectNode;
use crate::schema::InterfaceNode;
use crate::schema::NodeCategory;
use crate::schema::NodeStore;
use crate::schema::ObjectNode;
use crate::schema::ScalarNode;
use crate::schema::UnionNode;
use crate::schema::reserved::RESERVED_SDL;
use crate::validator;
use indexmap::IndexMap;
use lantern_parser::Parser;
use lantern_parser::Source;
use lantern_parser::SourceSpan;
use lantern_parser::ast;
use lantern_parser::ast::SchemaDefinition;
use lantern_parser::ast::TypeDefinition;
use std::path::Path;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, SchemaLoadError>;

/// Builds a validated [`NodeStore`] from schema documents.
///
/// Definitions are loaded in order; extensions are held back and merged
/// once every source and the reserved definitions are in, so an extension
/// may precede the definition it extends.
///
/// ```
/// # use lantern_core::config::RootTypes;
/// # use lantern_core::directives::DefinitionDirectives;
/// # use lantern_core::scalar::ScalarRegistry;
/// # use lantern_core::schema::StoreBuilder;
/// let directives = DefinitionDirectives::with_builtins();
/// let scalars = ScalarRegistry::with_builtins();
/// let roots = RootTypes::default();
/// let store = StoreBuilder::new(&directives, &scalars, &roots)
///     .load_str(None, "type Query { hello: String }")
///     .unwrap()
///     .build()
///     .unwrap();
/// assert!(store.object("Query").is_some());
/// ```
#[derive(Debug)]
pub struct StoreBuilder<'a> {
    store: NodeStore,
    directives: &'a DefinitionDirectives,
    scalars: &'a ScalarRegistry,
    root_types: &'a RootTypes,
    extensions: Vec<TypeDefinition>,
    str_load_counter: u16,
}

impl<'a> StoreBuilder<'a> {
    pub fn new(
        directives: &'a DefinitionDirectives,
        scalars: &'a ScalarRegistry,
        root_types: &'a RootTypes,
    ) -> Self {
        Self {
            store: NodeStore::new(),
            directives,
            scalars,
            root_types,
            extensions: Vec::new(),
            str_load_counter: 0,
        }
    }

    pub fn load_sources(mut self, sources: &[Source]) -> Result<Self> {
        for source in sources {
            let path = source.path().map(|p| p.to_path_buf());
            self = self.load_str(path, source.text())?;
        }
        Ok(self)
    }

    pub fn load_str(mut self, file_path: Option<PathBuf>, content: &str) -> Result<Self> {
        let file_path = if let Some(file_path) = file_path {
            file_path
        } else {
            let ctr = self.str_load_counter;
            self.str_load_counter += 1;
            PathBuf::from(format!("str://{ctr}"))
        };

        let document = parse(content, &file_path)?;
        tracing::debug!(
            file = %file_path.display(),
            definitions = document.definitions.len(),
            "loading schema document",
        );
        for definition in document.definitions {
            match definition {
                SchemaDefinition::Type(def) => self.visit_type_def(def, false)?,
                SchemaDefinition::TypeExtension(def) => self.extensions.push(def),
                SchemaDefinition::Directive(def) => {
                    self.store
                        .insert_directive(DirectiveDefinitionNode::from_ast(&def))?;
                },
            }
        }
        Ok(self)
    }

    pub fn build(mut self) -> Result<NodeStore> {
        self.inject_missing_reserved_definitions()?;
        for extension in std::mem::take(&mut self.extensions) {
            self.apply_extension(extension)?;
        }
        self.attach_scalar_behaviors();
        validator::validate(&mut self.store)?;
        tracing::debug!(
            types = self.store.type_names().count(),
            directives = self.store.directives.len(),
            "built node store",
        );
        Ok(self.store)
    }

    fn inject_missing_reserved_definitions(&mut self) -> Result<()> {
        let document = parse(RESERVED_SDL, Path::new("<reserved>"))?;
        for definition in document.definitions {
            match definition {
                SchemaDefinition::Type(def) if !self.store.contains(def.name()) => {
                    self.visit_type_def(def, true)?;
                },
                SchemaDefinition::Directive(def) if !self.store.contains(&def.name) => {
                    self.store
                        .insert_directive(DirectiveDefinitionNode::from_ast(&def))?;
                },
                _ => {},
            }
        }
        Ok(())
    }

    fn visit_type_def(&mut self, def: TypeDefinition, reserved: bool) -> Result<()> {
        if !reserved && def.name().starts_with("__") {
            return Err(SchemaLoadError::ReservedName {
                name: def.name().to_string(),
                span: def.span().clone(),
            });
        }
        match def {
            TypeDefinition::Object(def) => {
                let mut node = ObjectNode::from_ast(&def);
                self.apply_field_directives(&mut node.fields, &def.name, NodeCategory::Object)?;
                let applied = node.directives.clone();
                self.apply_object_directives(&mut node, &applied)?;
                self.store.insert_object(node)
            },
            TypeDefinition::Interface(def) => {
                let mut node = InterfaceNode::from_ast(&def);
                self.apply_field_directives(
                    &mut node.fields,
                    &def.name,
                    NodeCategory::Interface,
                )?;
                self.store.insert_interface(node)
            },
            TypeDefinition::Union(def) => self.store.insert_union(UnionNode::from_ast(&def)),
            TypeDefinition::Enum(def) => self.store.insert_enum(EnumNode::from_ast(&def)),
            TypeDefinition::Scalar(def) => self.store.insert_scalar(ScalarNode::from_ast(&def)),
            TypeDefinition::InputObject(def) => {
                self.store.insert_input_object(InputObjectNode::from_ast(&def))
            },
        }
    }

    fn apply_field_directives(
        &mut self,
        fields: &mut IndexMap<String, FieldDescriptor>,
        type_name: &str,
        category: NodeCategory,
    ) -> Result<()> {
        let directives = self.directives;
        let root_types = self.root_types;
        let parent = ParentInfo {
            type_name,
            category,
            query_root: &root_types.query,
        };
        for field in fields.values_mut() {
            let applied = field.directives.clone();
            for directive in &applied {
                if let Some(handler) = directives.field(&directive.name) {
                    handler(field, directive, &mut self.store, &parent)?;
                }
            }
        }
        Ok(())
    }

    fn apply_object_directives(
        &mut self,
        node: &mut ObjectNode,
        applied: &[ast::DirectiveAnnotation],
    ) -> Result<()> {
        let directives = self.directives;
        for directive in applied {
            if let Some(handler) = directives.object(&directive.name) {
                handler(node, directive, &mut self.store)?;
            }
        }
        Ok(())
    }

    fn apply_extension(&mut self, extension: TypeDefinition) -> Result<()> {
        let span = extension.span().clone();
        match extension {
            TypeDefinition::Object(def) => self.extend_object(def, span),
            TypeDefinition::Interface(def) => {
                let mut ext = InterfaceNode::from_ast(&def);
                self.apply_field_directives(&mut ext.fields, &def.name, NodeCategory::Interface)?;
                let target = self.store.interfaces.get_mut(&def.name).ok_or_else(|| {
                    unknown_target(&def.name, NodeCategory::Interface, &span)
                })?;
                merge_fields(&def.name, &mut target.fields, ext.fields)?;
                merge_names(&mut target.interfaces, ext.interfaces);
                target.directives.extend(ext.directives);
                Ok(())
            },
            TypeDefinition::Union(def) => {
                let target = self
                    .store
                    .unions
                    .get_mut(&def.name)
                    .ok_or_else(|| unknown_target(&def.name, NodeCategory::Union, &span))?;
                merge_names(&mut target.members, def.members);
                target.directives.extend(def.directives);
                Ok(())
            },
            TypeDefinition::Enum(def) => {
                let ext = EnumNode::from_ast(&def);
                let target = self
                    .store
                    .enums
                    .get_mut(&def.name)
                    .ok_or_else(|| unknown_target(&def.name, NodeCategory::Enum, &span))?;
                for (name, value) in ext.values {
                    if target.values.contains_key(&name) {
                        return Err(SchemaLoadError::DuplicateField {
                            type_name: def.name.clone(),
                            field_name: name,
                            span: value.span,
                        });
                    }
                    target.values.insert(name, value);
                }
                target.directives.extend(ext.directives);
                Ok(())
            },
            TypeDefinition::InputObject(def) => {
                let ext = InputObjectNode::from_ast(&def);
                let target = self.store.input_objects.get_mut(&def.name).ok_or_else(|| {
                    unknown_target(&def.name, NodeCategory::InputObject, &span)
                })?;
                for (name, field) in ext.fields {
                    if target.fields.contains_key(&name) {
                        return Err(SchemaLoadError::DuplicateField {
                            type_name: def.name.clone(),
                            field_name: name,
                            span: field.span,
                        });
                    }
                    target.fields.insert(name, field);
                }
                target.directives.extend(ext.directives);
                Ok(())
            },
            TypeDefinition::Scalar(def) => {
                let target = self
                    .store
                    .scalars
                    .get_mut(&def.name)
                    .ok_or_else(|| unknown_target(&def.name, NodeCategory::Scalar, &span))?;
                target.directives.extend(def.directives);
                Ok(())
            },
        }
    }

    fn extend_object(&mut self, def: ast::ObjectTypeDefinition, span: SourceSpan) -> Result<()> {
        let mut ext = ObjectNode::from_ast(&def);
        self.apply_field_directives(&mut ext.fields, &def.name, NodeCategory::Object)?;

        // Detached while its directives run so handlers can take the store.
        let mut target = match self.store.objects.get_mut(&def.name) {
            Some(target) => std::mem::replace(target, ObjectNode::new(def.name.clone())),
            None => return Err(unknown_target(&def.name, NodeCategory::Object, &span)),
        };
        let merged = merge_fields(&def.name, &mut target.fields, ext.fields).and_then(|()| {
            merge_names(&mut target.interfaces, ext.interfaces);
            target.directives.extend(ext.directives.iter().cloned());
            self.apply_object_directives(&mut target, &ext.directives)
        });
        if let Some(slot) = self.store.objects.get_mut(&def.name) {
            *slot = target;
        }
        merged
    }

    fn attach_scalar_behaviors(&mut self) {
        for scalar in self.store.scalars.values_mut() {
            scalar.behavior = self.scalars.get(&scalar.name);
        }
    }
}

fn parse(content: &str, file_path: &Path) -> Result<ast::SchemaDocument> {
    let result = Parser::with_file_path(content, file_path).parse_schema_document();
    std::result::Result::from(result).map_err(SchemaLoadError::Parse)
}

fn unknown_target(name: &str, expected: NodeCategory, span: &SourceSpan) -> SchemaLoadError {
    SchemaLoadError::UnknownExtensionTarget {
        name: name.to_string(),
        expected,
        span: span.clone(),
    }
}

fn merge_fields(
    type_name: &str,
    target: &mut IndexMap<String, FieldDescriptor>,
    fields: IndexMap<String, FieldDescriptor>,
) -> Result<()> {
    for (name, field) in fields {
        if target.contains_key(&name) {
            return Err(SchemaLoadError::DuplicateField {
                type_name: type_name.to_string(),
                field_name: name,
                span: field.span,
            });
        }
        target.insert(name, field);
    }
    Ok(())
}

fn merge_names(target: &mut Vec<String>, names: Vec<String>) {
    for name in names {
        if !target.contains(&name) {
            target.push(name);
        }
    }
}
