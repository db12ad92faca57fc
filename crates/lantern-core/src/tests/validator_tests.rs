//! Well-formedness checks run after a store is built.

use crate::SchemaLoadError;
use crate::ValidateError;
use crate::tests::utils::build_store;
use crate::types::TypeKind;

fn rejection(sdl: &str) -> ValidateError {
    match build_store(sdl) {
        Err(SchemaLoadError::Validate(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// =============================================================================
// Type references
// =============================================================================

#[test]
fn kinds_are_resolved() -> Result<(), SchemaLoadError> {
    let store = build_store(
        "type Query { user(filter: Filter): User } input Filter { name: String } type User { id: ID! }",
    )?;
    let Some(user) = store.field("Query", "user") else {
        panic!("Query.user is missing");
    };
    assert_eq!(user.type_ref.named_kind(), Some(TypeKind::Object));
    assert_eq!(
        user.argument("filter").and_then(|a| a.type_ref.named_kind()),
        Some(TypeKind::InputObject)
    );
    Ok(())
}

#[test]
fn unknown_types_are_rejected() {
    let err = rejection("type Query { user: Ghost }");
    assert_eq!(err.to_string(), "Query.user: unknown type `Ghost`");
}

#[test]
fn arguments_need_input_types() {
    let err = rejection("type Query { user(by: User): User } type User { id: ID! }");
    assert_eq!(err.node, "Query.user(by)");
    assert_eq!(err.message, "`User` is not an input type");
}

#[test]
fn fields_cannot_return_input_types() {
    let err = rejection("type Query { f: Filter } input Filter { a: Int }");
    assert_eq!(err.message, "input type `Filter` cannot be a field type");
}

// =============================================================================
// Interfaces and unions
// =============================================================================

#[test]
fn implementations_must_provide_interface_fields() {
    let err = rejection("type Query { n: Node } interface Node { id: ID! } type User implements Node { name: String }");
    assert_eq!(err.node, "User");
    assert_eq!(err.message, "missing field `id` required by interface `Node`");
}

#[test]
fn implementation_types_must_be_compatible() {
    let err = rejection("type Query { n: Node } interface Node { id: ID } type User implements Node { id: Int }");
    assert_eq!(err.node, "User.id");
    assert_eq!(
        err.message,
        "type `Int` does not match `ID` declared by interface `Node`"
    );
}

#[test]
fn implements_must_name_an_interface() {
    let err = rejection("type Query { u: User } type User implements Query { id: ID }");
    assert_eq!(err.message, "`Query` is not an interface");
}

#[test]
fn union_members_must_be_objects() {
    let err = rejection("type Query { s: S } union S = Role enum Role { A }");
    assert_eq!(err.message, "union member `Role` is not an object type");
}

#[test]
fn possible_types_are_recorded() -> Result<(), SchemaLoadError> {
    let store = build_store(
        "type Query { n: Node } interface Node { id: ID! } type A implements Node { id: ID! } \
         type B implements Node { id: ID! extra: Int }",
    )?;
    assert_eq!(store.possible_types("Node"), vec!["A", "B"]);
    assert!(store.satisfies("B", "Node"));
    assert!(!store.satisfies("Query", "Node"));
    Ok(())
}

// =============================================================================
// Directive applications
// =============================================================================

#[test]
fn unknown_directives_are_rejected() {
    let err = rejection("type Query { a: String @shiny }");
    assert_eq!(err.to_string(), "Query.a: unknown directive `@shiny`");
}

#[test]
fn directives_must_fit_their_location() {
    let err = rejection("type Query @auth { a: String }");
    assert_eq!(err.node, "Query");
    assert!(err.message.starts_with("directive `@auth` is not allowed on"), "{err}");
}

#[test]
fn non_repeatable_directives_apply_once() {
    let err = rejection("type Query { a: String @searchable @searchable }");
    assert_eq!(err.message, "directive `@searchable` is not repeatable");
}

#[test]
fn directive_arguments_must_be_declared() {
    let err = rejection("type Query { a: String @auth(message: \"no\") }");
    assert_eq!(err.message, "directive `@auth` has no argument `message`");
}

#[test]
fn enum_codes_must_be_integers() {
    let err = rejection(r#"type Query { a: String } enum E { X @enum(value: "one") }"#);
    assert_eq!(err.node, "E.X");
    assert_eq!(err.message, "@enum requires an Int `value`");
}

#[test]
fn deprecated_arguments_keep_their_reason() -> Result<(), SchemaLoadError> {
    let store = build_store(
        r#"type Query { a(old: Int @deprecated(reason: "gone"), new: Int): String }"#,
    )?;
    let reason = store
        .field("Query", "a")
        .and_then(|f| f.argument("old"))
        .and_then(|a| a.deprecation.clone());
    assert_eq!(reason.as_deref(), Some("gone"));
    Ok(())
}
