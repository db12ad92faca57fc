use lantern_parser::ParseError;
use lantern_parser::SourceSpan;
use serde::Serialize;

use crate::schema::NodeCategory;

/// A 1-based source position as reported in responses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn from_span(span: &SourceSpan) -> Self {
        let (line, column) = span.start_line_col();
        Self { line, column }
    }
}

/// An error as it appears in a [`Response`](crate::Response).
#[derive(Clone, Debug, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct GraphQLError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    /// Response keys leading to the failed field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }
}

impl From<&ParseError> for GraphQLError {
    fn from(error: &ParseError) -> Self {
        GraphQLError::new(error.message())
            .with_locations(vec![Location::from_span(error.span())])
    }
}

/// A schema that parsed but is not well formed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{node}: {message}")]
pub struct ValidateError {
    /// Name of the node the problem was found on, e.g. `User.posts`.
    pub node: String,
    pub message: String,
}

impl ValidateError {
    pub fn new(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            message: message.into(),
        }
    }
}

/// Why loading a schema failed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("schema has {} syntax error(s):\n{}", .0.len(), format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error(
        "`{name}` is already defined as {existing}; it cannot be redefined as {attempted}"
    )]
    NameConflict {
        name: String,
        existing: NodeCategory,
        attempted: NodeCategory,
        span: SourceSpan,
    },

    #[error("field `{field_name}` is already defined on `{type_name}`")]
    DuplicateField {
        type_name: String,
        field_name: String,
        span: SourceSpan,
    },

    #[error("cannot extend `{name}`: it is not defined as {expected}")]
    UnknownExtensionTarget {
        name: String,
        expected: NodeCategory,
        span: SourceSpan,
    },

    #[error("type names starting with `__` are reserved: `{name}`")]
    ReservedName { name: String, span: SourceSpan },

    #[error(transparent)]
    Validate(#[from] ValidateError),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ParseError::format_oneline)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failure of a registered fetch function.
///
/// A failed batch shares one `FetchError` among every key that was in it,
/// hence `Clone`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionErrorKind {
    /// No resolver, quick directive or introspection field answers a field.
    NotFound,
    MissingQuickFunction,
    /// A value does not have the shape its declared type requires.
    ShapeMismatch,
    /// A non-null field produced null.
    NonNull,
    RelationNotRegistered,
    DirectiveRejected,
    Resolver,
    Fetch,
    /// The operation itself is invalid against the schema.
    Operation,
}

/// A failure while executing an operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub message: String,
    pub locations: Vec<Location>,
}

impl ExecutionError {
    pub fn new(kind: ExecutionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            locations: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::NotFound, message)
    }

    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::ShapeMismatch, message)
    }

    pub fn resolver(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::Resolver, message)
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::Operation, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::DirectiveRejected, message)
    }

    /// Attaches locations unless the error already carries some from a
    /// deeper field.
    pub fn at(mut self, locations: &[Location]) -> Self {
        if self.locations.is_empty() {
            self.locations = locations.to_vec();
        }
        self
    }

    pub fn to_graphql_error(&self) -> GraphQLError {
        GraphQLError::new(self.message.clone()).with_locations(self.locations.clone())
    }
}

impl From<FetchError> for ExecutionError {
    fn from(error: FetchError) -> Self {
        ExecutionError::new(ExecutionErrorKind::Fetch, error.message)
    }
}
