//! Helpers shared by the parser tests.

use crate::ast;
use crate::token::TokenKind;
use crate::token_source::StrTokenSource;
use crate::Parser;

/// Lexes `source` and returns every token kind up to and including `Eof`.
/// Lexer errors are returned as `None`.
pub(super) fn lex_kinds(source: &str) -> Vec<Option<TokenKind<'_>>> {
    StrTokenSource::new(source)
        .map(|result| result.ok().map(|token| token.kind))
        .collect()
}

/// Parses a schema that must be free of errors.
pub(super) fn parse_valid_schema(source: &str) -> ast::SchemaDocument {
    let result = Parser::new(source).parse_schema_document();
    assert!(result.errors.is_empty(), "unexpected errors:\n{}", result.format_errors());
    result.into_ast().expect("a schema document")
}

/// Parses a query document that must be free of errors.
pub(super) fn parse_valid_query(source: &str) -> ast::ExecutableDocument {
    let result = Parser::new(source).parse_executable_document();
    assert!(result.errors.is_empty(), "unexpected errors:\n{}", result.format_errors());
    result.into_ast().expect("an executable document")
}

/// Returns the single object type defined by `source`.
pub(super) fn first_object_type(source: &str) -> ast::ObjectTypeDefinition {
    match parse_valid_schema(source).definitions.into_iter().next() {
        Some(ast::SchemaDefinition::Type(ast::TypeDefinition::Object(def))) => def,
        other => panic!("expected an object type definition, got {other:?}"),
    }
}

/// Returns the top-level fields of the first operation in `source`.
pub(super) fn first_operation_fields(source: &str) -> Vec<ast::Field> {
    let doc = parse_valid_query(source);
    doc.operations[0]
        .selection_set
        .selections
        .iter()
        .filter_map(|s| match s {
            ast::Selection::Field(f) => Some(f.clone()),
            _ => None,
        })
        .collect()
}
