//! Lexer, value model and parser for lantern schema (SDL) and query
//! documents.
//!
//! Parsing never stops at the first problem: [`Parser`] records errors with
//! their source positions, resynchronises at the next definition, and
//! returns every error alongside whatever it managed to parse in a
//! [`ParseResult`].

pub mod ast;
mod lex_error;
mod parse_error;
mod parse_error_kind;
mod parse_result;
mod parser;
mod source;
mod source_position;
mod source_span;
mod string_parsing_error;
pub mod token;
pub mod token_source;
mod token_stream;
mod value;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use parse_error_kind::ParseErrorKind;
pub use parse_result::ParseResult;
pub use parser::Parser;
pub use smallvec::smallvec;
pub use smallvec::SmallVec;
pub use source::Source;
pub use source_position::SourcePosition;
pub use source_span::SourceSpan;
pub use string_parsing_error::StringParsingError;
pub use token_stream::TokenStream;
pub use value::Value;

/// Parses a schema document from a single string.
pub fn parse_schema(source: &str) -> ParseResult<ast::SchemaDocument> {
    Parser::new(source).parse_schema_document()
}

/// Parses an executable (query) document from a single string.
pub fn parse_executable(source: &str) -> ParseResult<ast::ExecutableDocument> {
    Parser::new(source).parse_executable_document()
}

#[cfg(test)]
mod tests;
