use crate::LexError;

/// Categorizes parse errors for programmatic handling.
///
/// The `#[error(...)]` messages are concise. Full human-readable messages
/// live in [`ParseError::message`](crate::ParseError::message).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Expected specific token(s) but found something else.
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },

    /// The input ended before a complete construct was parsed.
    #[error("unexpected end of input")]
    UnexpectedEof { expected: Vec<String> },

    /// The lexer rejected part of the input.
    #[error("lexer error: {0}")]
    Lex(LexError),

    /// A literal could not be converted to a value (e.g. an integer that
    /// overflows 64 bits).
    #[error("invalid value: `{0}`")]
    InvalidValue(String),

    /// The same name was declared twice where names must be unique, such as
    /// two fields of one type or two arguments of one field.
    #[error("duplicate name: `{0}`")]
    DuplicateName(String),

    /// Nesting went deeper than the parser allows.
    #[error("maximum nesting depth exceeded")]
    DepthExceeded,

    /// Invalid syntax that doesn't fit other categories.
    #[error("invalid syntax")]
    InvalidSyntax,
}
