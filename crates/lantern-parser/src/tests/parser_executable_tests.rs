//! Tests for query document parsing.

use crate::ast;
use crate::ast::OperationKind;
use crate::tests::utils::first_operation_fields;
use crate::tests::utils::parse_valid_query;
use crate::ParseErrorKind;
use crate::Parser;
use crate::Value;
use indexmap::IndexMap;

// =============================================================================
// Operations
// =============================================================================

#[test]
fn shorthand_query() {
    let doc = parse_valid_query("{ users { id } }");
    assert_eq!(doc.operations.len(), 1);
    let op = &doc.operations[0];
    assert_eq!(op.kind, OperationKind::Query);
    assert_eq!(op.name, None);
    assert_eq!(op.selection_set.selections.len(), 1);
}

#[test]
fn named_operation_with_variables_and_directives() {
    let doc = parse_valid_query(
        "mutation CreateUser($name: String!, $tags: [String] = [\"a\"]) @audit { createUser(name: $name) { id } }",
    );
    let op = &doc.operations[0];
    assert_eq!(op.kind, OperationKind::Mutation);
    assert_eq!(op.name.as_deref(), Some("CreateUser"));
    assert_eq!(op.variable_definitions.len(), 2);
    assert_eq!(op.variable_definitions[0].name, "name");
    assert_eq!(op.variable_definitions[0].type_annotation.to_string(), "String!");
    assert_eq!(
        op.variable_definitions[1].default_value,
        Some(Value::List(vec![Value::from("a")])),
    );
    assert_eq!(op.directives[0].name, "audit");
}

#[test]
fn subscription_operation() {
    let doc = parse_valid_query("subscription { ticks }");
    assert_eq!(doc.operations[0].kind, OperationKind::Subscription);
}

#[test]
fn several_operations_in_one_document() {
    let doc = parse_valid_query("query A { a } query B { b }");
    let names: Vec<_> = doc.operations.iter().filter_map(|o| o.name.as_deref()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

// =============================================================================
// Fields and arguments
// =============================================================================

#[test]
fn alias_arguments_and_nested_selections() {
    let fields = first_operation_fields("{ me: user(id: $id, active: true) @cache { id name } }");
    let field = &fields[0];

    assert_eq!(field.alias.as_deref(), Some("me"));
    assert_eq!(field.name, "user");
    assert_eq!(field.response_key(), "me");
    assert_eq!(field.arguments.get("id"), Some(&Value::Variable("id".to_string())));
    assert_eq!(field.arguments.get("active"), Some(&Value::Boolean(true)));
    assert_eq!(field.directives[0].name, "cache");

    let nested = field.selection_set.as_ref().expect("nested selection set");
    assert_eq!(nested.selections.len(), 2);
}

#[test]
fn argument_values_of_every_kind() {
    let fields = first_operation_fields(
        r#"{ f(i: -3, fl: 1.5, s: "text", b: false, n: null, e: RED, l: [1, 2], o: {x: $v, y: "z"}) }"#,
    );
    let args = &fields[0].arguments;

    let mut object = IndexMap::new();
    object.insert("x".to_string(), Value::Variable("v".to_string()));
    object.insert("y".to_string(), Value::from("z"));

    assert_eq!(args["i"], Value::Int(-3));
    assert_eq!(args["fl"], Value::Float(1.5));
    assert_eq!(args["s"], Value::from("text"));
    assert_eq!(args["b"], Value::Boolean(false));
    assert_eq!(args["n"], Value::Null);
    assert_eq!(args["e"], Value::Enum("RED".to_string()));
    assert_eq!(args["l"], Value::List(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(args["o"], Value::Object(object));
    assert!(args["o"].contains_variables());
}

#[test]
fn aliased_fields_with_the_same_name_are_allowed() {
    let fields = first_operation_fields("{ a: user(id: 1) { id } b: user(id: 2) { id } }");
    assert_eq!(fields.len(), 2);
}

// =============================================================================
// Fragments
// =============================================================================

#[test]
fn fragment_spreads_and_inline_fragments() -> Result<(), String> {
    let doc = parse_valid_query(
        r#"
        query { node(id: 1) { ...NodeFields ... on User { name } ... @include(if: true) { id } } }
        fragment NodeFields on Node @keep { id }
        "#,
    );

    assert_eq!(doc.fragments.len(), 1);
    let fragment = doc.fragment("NodeFields").ok_or("fragment is indexed by name")?;
    assert_eq!(fragment.type_condition, "Node");
    assert_eq!(fragment.directives[0].name, "keep");

    let ast::Selection::Field(node) = &doc.operations[0].selection_set.selections[0] else {
        return Err("expected a field".to_string());
    };
    let selections = &node.selection_set.as_ref().ok_or("node has selections")?.selections;
    assert_eq!(selections.len(), 3);

    match &selections[0] {
        ast::Selection::FragmentSpread(spread) => assert_eq!(spread.name, "NodeFields"),
        other => return Err(format!("expected a spread, got {other:?}")),
    }
    match &selections[1] {
        ast::Selection::InlineFragment(inline) => {
            assert_eq!(inline.type_condition.as_deref(), Some("User"));
        },
        other => return Err(format!("expected an inline fragment, got {other:?}")),
    }
    match &selections[2] {
        ast::Selection::InlineFragment(inline) => {
            assert_eq!(inline.type_condition, None);
            assert_eq!(inline.directives[0].name, "include");
        },
        other => return Err(format!("expected an inline fragment, got {other:?}")),
    }
    Ok(())
}

#[test]
fn duplicate_fragment_name_is_an_error() {
    let result = Parser::new("{ a } fragment F on A { a } fragment F on A { b }")
        .parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::DuplicateName(n) if n == "F"));
}

#[test]
fn fragment_cannot_be_named_on() {
    let result = Parser::new("{ a } fragment on on A { a }").parse_executable_document();
    assert!(result.has_errors());
    assert_eq!(result.errors[0].kind(), &ParseErrorKind::InvalidSyntax);
}

// =============================================================================
// Query errors
// =============================================================================

#[test]
fn duplicate_response_key_is_an_error() {
    let result = Parser::new("{ id id }").parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::DuplicateName(n) if n == "id"));
}

#[test]
fn empty_selection_set_is_an_error() {
    let result = Parser::new("{ user { } }").parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message(), "selection set cannot be empty");
}

#[test]
fn empty_document_has_no_operation() {
    let result = Parser::new("  # nothing here\n").parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::UnexpectedEof { .. }));
}

#[test]
fn integer_overflow_is_an_invalid_value() {
    let result = Parser::new("{ f(x: 99999999999999999999) }").parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].kind(),
        &ParseErrorKind::InvalidValue("99999999999999999999".to_string()),
    );
}

#[test]
fn duplicate_argument_in_query_is_an_error() {
    let result = Parser::new("{ f(x: 1, x: 2) }").parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::DuplicateName(n) if n == "x"));
}
