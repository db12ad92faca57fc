use crate::schema::DirectiveList;
use lantern_parser::SourceSpan;
use lantern_parser::ast::DirectiveAnnotation;

/// Accessors shared by every named node in the store.
pub trait SchemaNode {
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn directives(&self) -> &DirectiveList;
    fn span(&self) -> &SourceSpan;

    /// The first application of directive `name`.
    fn directive(&self, name: &str) -> Option<&DirectiveAnnotation> {
        self.directives().iter().find(|d| d.name == name)
    }

    fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }
}

/// Implements [`SchemaNode`] as inherent methods over the conventional
/// `name`, `description`, `directives` and `span` fields.
macro_rules! impl_schema_node {
    ($ty:ty) => {
        #[inherent::inherent]
        impl $crate::schema::SchemaNode for $ty {
            pub fn name(&self) -> &str {
                &self.name
            }

            pub fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }

            pub fn directives(&self) -> &$crate::schema::DirectiveList {
                &self.directives
            }

            pub fn span(&self) -> &lantern_parser::SourceSpan {
                &self.span
            }

            pub fn directive(
                &self,
                name: &str,
            ) -> Option<&lantern_parser::ast::DirectiveAnnotation>;

            pub fn has_directive(&self, name: &str) -> bool;
        }
    };
}

pub(crate) use impl_schema_node;
