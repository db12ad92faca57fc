use crate::ast::AstNode;
use crate::ast::DirectiveAnnotation;
use crate::ast::DirectiveLocation;
use crate::ast::TypeAnnotation;
use crate::SourceSpan;
use crate::Value;
use inherent::inherent;

/// A parsed schema document: type definitions, type extensions and directive
/// definitions, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaDocument {
    pub definitions: Vec<SchemaDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SchemaDefinition {
    Type(TypeDefinition),
    /// `extend type Foo { ... }` and friends. Carries the same shape as a
    /// definition; only its members are merged into the extended type.
    TypeExtension(TypeDefinition),
    Directive(DirectiveDefinition),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeDefinition {
    Enum(EnumTypeDefinition),
    InputObject(InputObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Object(ObjectTypeDefinition),
    Scalar(ScalarTypeDefinition),
    Union(UnionTypeDefinition),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Enum(d) => &d.name,
            TypeDefinition::InputObject(d) => &d.name,
            TypeDefinition::Interface(d) => &d.name,
            TypeDefinition::Object(d) => &d.name,
            TypeDefinition::Scalar(d) => &d.name,
            TypeDefinition::Union(d) => &d.name,
        }
    }

    /// The keyword that introduces this kind of definition.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeDefinition::Enum(_) => "enum",
            TypeDefinition::InputObject(_) => "input",
            TypeDefinition::Interface(_) => "interface",
            TypeDefinition::Object(_) => "type",
            TypeDefinition::Scalar(_) => "scalar",
            TypeDefinition::Union(_) => "union",
        }
    }
}

#[inherent]
impl AstNode for TypeDefinition {
    pub fn span(&self) -> &SourceSpan {
        match self {
            TypeDefinition::Enum(d) => &d.span,
            TypeDefinition::InputObject(d) => &d.span,
            TypeDefinition::Interface(d) => &d.span,
            TypeDefinition::Object(d) => &d.span,
            TypeDefinition::Scalar(d) => &d.span,
            TypeDefinition::Union(d) => &d.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTypeDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub interfaces: Vec<String>,
    pub directives: Vec<DirectiveAnnotation>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceTypeDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub interfaces: Vec<String>,
    pub directives: Vec<DirectiveAnnotation>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionTypeDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<DirectiveAnnotation>,
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumTypeDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<DirectiveAnnotation>,
    pub values: Vec<EnumValueDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<DirectiveAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectTypeDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<DirectiveAnnotation>,
    pub fields: Vec<InputValueDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarTypeDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<DirectiveAnnotation>,
}

/// A field of an object or interface type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub type_annotation: TypeAnnotation,
    pub directives: Vec<DirectiveAnnotation>,
}

#[inherent]
impl AstNode for FieldDefinition {
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }
}

/// An argument definition or an input object field.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub type_annotation: TypeAnnotation,
    pub default_value: Option<Value>,
    pub directives: Vec<DirectiveAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDefinition {
    pub span: SourceSpan,
    pub description: Option<String>,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

#[inherent]
impl AstNode for DirectiveDefinition {
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }
}
