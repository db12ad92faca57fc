//! Tests for error positions, multi-error recovery and error formatting.

use crate::ast;
use crate::ParseError;
use crate::ParseErrorKind;
use crate::Parser;
use crate::Source;
use std::path::Path;

// =============================================================================
// Positions
// =============================================================================

#[test]
fn error_points_at_the_unexpected_token() {
    let result = Parser::new("type A {\n  a String\n}").parse_schema_document();

    let error = &result.errors[0];
    assert_eq!(error.line_col(), (2, 5));
    assert_eq!(error.message(), "expected `:`, found `String`");
    assert!(matches!(
        error.kind(),
        ParseErrorKind::UnexpectedToken { found, .. } if found == "String"
    ));
}

#[test]
fn oneline_format_includes_the_file_path() {
    let result = Parser::with_file_path("type A {\n  a String\n}", Path::new("schema.graphql"))
        .parse_schema_document();
    assert_eq!(
        result.errors[0].format_oneline(),
        "schema.graphql:2:5: error: expected `:`, found `String`",
    );
}

#[test]
fn detailed_format_underlines_the_token() {
    let source = "type A {\n  a String\n}";
    let result = Parser::new(source).parse_schema_document();
    let detailed = result.errors[0].format_detailed(Some(source));

    assert!(detailed.contains("--> <input>:2:5"), "{detailed}");
    assert!(detailed.contains("2 |   a String"), "{detailed}");
    assert!(detailed.contains("|     ^^^^^^"), "{detailed}");
}

#[test]
fn unclosed_body_reports_end_of_input() {
    let result = Parser::new("type A {").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::UnexpectedEof { .. }));
    assert_eq!(result.errors[0].line_col(), (1, 9));
}

#[test]
fn lexer_errors_surface_as_parse_errors() {
    let result = Parser::new("type A { a: Int ? }").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::Lex(_)));
    assert_eq!(result.errors[0].line_col(), (1, 17));
}

// =============================================================================
// Recovery
// =============================================================================

/// A broken definition does not hide errors in, or the content of, later
/// definitions.
#[test]
fn reports_every_broken_definition_in_one_pass() {
    let result = Parser::new(
        "type A { a: }\ntype B { b: Int }\ntype C { c: [Int }\n",
    )
    .parse_schema_document();

    assert!(result.errors.len() >= 2, "{}", result.format_errors());
    assert_eq!(result.errors[0].line_col().0, 1);
    assert!(result.errors.iter().any(|e| e.line_col().0 == 3));

    let doc = result.ast().expect("recovered document");
    assert!(doc.definitions.iter().any(|d| matches!(
        d,
        ast::SchemaDefinition::Type(def) if def.name() == "B"
    )));
}

#[test]
fn errors_carry_the_path_of_the_source_they_occur_in() {
    let sources = vec![
        Source::with_path("type A { a: Int }", "a.graphql"),
        Source::with_path("type B {\n  b: }", "b.graphql"),
    ];
    let result = Parser::from_sources(&sources).parse_schema_document();

    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!(error.span().file_path.as_deref(), Some(Path::new("b.graphql")));
    assert_eq!(error.line_col(), (2, 6));
}

#[test]
fn deeply_nested_values_are_rejected() {
    let depth = 100;
    let query = format!("{{ f(x: {}1{}) }}", "[".repeat(depth), "]".repeat(depth));
    let result = Parser::new(&query).parse_executable_document();
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind() == &ParseErrorKind::DepthExceeded));
}

#[test]
fn result_converts_into_std_result() {
    let ok: Result<ast::SchemaDocument, Vec<ParseError>> =
        Parser::new("type A { a: Int }").parse_schema_document().into();
    assert!(ok.is_ok());

    let err: Result<ast::SchemaDocument, Vec<ParseError>> =
        Parser::new("type A {").parse_schema_document().into();
    assert_eq!(err.map_err(|e| e.len()), Err(1));
}
