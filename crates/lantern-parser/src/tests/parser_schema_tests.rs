//! Tests for schema document parsing.

use crate::ast;
use crate::ast::DirectiveLocation;
use crate::tests::utils::first_object_type;
use crate::tests::utils::parse_valid_schema;
use crate::Parser;
use crate::ParseErrorKind;
use crate::Value;

// =============================================================================
// Object types
// =============================================================================

#[test]
fn object_type_with_interfaces_directives_and_fields() {
    let def = first_object_type(
        r#"
        "A registered user"
        type User implements & Node & Timestamped @model @searchable(fields: ["name"]) {
          "Primary key"
          id: ID!
          name(format: String = "full", upper: Boolean): String @deprecated(reason: "use displayName")
          posts: [Post!]! @hasMany
        }
        "#,
    );

    assert_eq!(def.name, "User");
    assert_eq!(def.description.as_deref(), Some("A registered user"));
    assert_eq!(def.interfaces, vec!["Node".to_string(), "Timestamped".to_string()]);
    assert_eq!(def.directives.len(), 2);
    assert_eq!(def.directives[1].name, "searchable");
    assert_eq!(
        def.directives[1].argument("fields"),
        Some(&Value::List(vec![Value::String("name".to_string())])),
    );

    assert_eq!(def.fields.len(), 3);
    assert_eq!(def.fields[0].description.as_deref(), Some("Primary key"));
    assert_eq!(def.fields[0].type_annotation.to_string(), "ID!");

    let name = &def.fields[1];
    assert_eq!(name.arguments.len(), 2);
    assert_eq!(
        name.arguments[0].default_value,
        Some(Value::String("full".to_string())),
    );
    assert_eq!(name.arguments[1].default_value, None);
    assert_eq!(
        name.directives[0].string_argument("reason"),
        Some("use displayName"),
    );

    let posts = &def.fields[2];
    assert_eq!(posts.type_annotation.to_string(), "[Post!]!");
    assert_eq!(posts.type_annotation.innermost_name(), "Post");
    assert!(posts.type_annotation.is_non_null());
}

#[test]
fn keywords_are_valid_field_names() {
    let def = first_object_type("type Query { type: String query: Int null: Boolean }");
    let names: Vec<_> = def.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["type", "query", "null"]);
}

#[test]
fn object_span_covers_the_definition() {
    let def = first_object_type("type A {\n  a: Int\n}");
    assert_eq!(def.span.start_line_col(), (1, 1));
    assert_eq!(def.span.end_exclusive.to_line_col(), (3, 2));
}

// =============================================================================
// Other type definitions
// =============================================================================

#[test]
fn union_enum_input_and_scalar() -> Result<(), String> {
    let doc = parse_valid_schema(
        r#"
        union SearchResult = | User | Post
        enum Role { ADMIN MEMBER @deprecated }
        input UserFilter { name: String = "x" age: Int }
        scalar DateTime @specifiedBy(url: "https://example.com")
        "#,
    );

    let mut defs = doc.definitions.into_iter();
    match defs.next() {
        Some(ast::SchemaDefinition::Type(ast::TypeDefinition::Union(u))) => {
            assert_eq!(u.members, vec!["User".to_string(), "Post".to_string()]);
        },
        other => return Err(format!("expected union, got {other:?}")),
    }
    match defs.next() {
        Some(ast::SchemaDefinition::Type(ast::TypeDefinition::Enum(e))) => {
            assert_eq!(e.values.len(), 2);
            assert_eq!(e.values[1].name, "MEMBER");
            assert_eq!(e.values[1].directives[0].name, "deprecated");
        },
        other => return Err(format!("expected enum, got {other:?}")),
    }
    match defs.next() {
        Some(ast::SchemaDefinition::Type(ast::TypeDefinition::InputObject(i))) => {
            assert_eq!(i.fields.len(), 2);
            assert_eq!(i.fields[0].default_value, Some(Value::from("x")));
        },
        other => return Err(format!("expected input object, got {other:?}")),
    }
    match defs.next() {
        Some(ast::SchemaDefinition::Type(ast::TypeDefinition::Scalar(s))) => {
            assert_eq!(s.name, "DateTime");
            assert_eq!(s.directives.len(), 1);
        },
        other => return Err(format!("expected scalar, got {other:?}")),
    }
    Ok(())
}

#[test]
fn directive_definition() -> Result<(), String> {
    let doc = parse_valid_schema(
        "directive @cache(ttl: Int = 60, tags: [String]) repeatable on | FIELD_DEFINITION | OBJECT",
    );
    let Some(ast::SchemaDefinition::Directive(def)) = doc.definitions.first() else {
        return Err("expected a directive definition".to_string());
    };
    assert_eq!(def.name, "cache");
    assert!(def.repeatable);
    assert_eq!(def.arguments.len(), 2);
    assert_eq!(def.arguments[0].default_value, Some(Value::Int(60)));
    assert_eq!(
        def.locations,
        vec![DirectiveLocation::FieldDefinition, DirectiveLocation::Object],
    );
    Ok(())
}

#[test]
fn unknown_directive_location_is_an_error() {
    let result = Parser::new("directive @x on NOWHERE").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message().contains("NOWHERE"));
}

// =============================================================================
// Extensions
// =============================================================================

#[test]
fn type_extension_with_and_without_body() -> Result<(), String> {
    let doc = parse_valid_schema(
        "extend type Query { me: User }\nextend type User @searchable",
    );
    assert_eq!(doc.definitions.len(), 2);

    let Some(ast::SchemaDefinition::TypeExtension(ast::TypeDefinition::Object(query))) =
        doc.definitions.first()
    else {
        return Err("expected an object extension".to_string());
    };
    assert_eq!(query.fields[0].name, "me");
    assert_eq!(query.span.start_line_col(), (1, 1));

    let Some(ast::SchemaDefinition::TypeExtension(ast::TypeDefinition::Object(user))) =
        doc.definitions.get(1)
    else {
        return Err("expected an object extension".to_string());
    };
    assert!(user.fields.is_empty());
    assert_eq!(user.directives[0].name, "searchable");
    Ok(())
}

// =============================================================================
// Schema-level errors
// =============================================================================

#[test]
fn duplicate_field_is_reported_and_dropped() {
    let result = Parser::new("type A { a: Int a: String b: Int }").parse_schema_document();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].kind(),
        &ParseErrorKind::DuplicateName("a".to_string()),
    );

    let Some(ast::SchemaDefinition::Type(ast::TypeDefinition::Object(def))) =
        result.ast().and_then(|d| d.definitions.first())
    else {
        panic!("the definition should still be recovered");
    };
    assert_eq!(def.fields.len(), 2);
}

#[test]
fn duplicate_argument_is_reported() {
    let result = Parser::new("type A { a(x: Int, x: Int): Int }").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::DuplicateName(n) if n == "x"));
}

#[test]
fn duplicate_enum_value_is_reported() {
    let result = Parser::new("enum E { A B A }").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind(), ParseErrorKind::DuplicateName(n) if n == "A"));
}

#[test]
fn reserved_words_are_not_enum_values() {
    let result = Parser::new("enum E { A true }").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind(), &ParseErrorKind::InvalidSyntax);
}

#[test]
fn schema_definition_is_not_supported() {
    let result =
        Parser::new("schema { query: Q }\ntype Q { a: Int }").parse_schema_document();
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message().contains("not supported"));

    // Parsing resumes at the next definition.
    let doc = result.ast().expect("recovered document");
    assert_eq!(doc.definitions.len(), 1);
}

#[test]
fn variables_are_not_allowed_in_default_values() {
    let result = Parser::new("type A { a(x: Int = $v): Int }").parse_schema_document();
    assert!(result.has_errors());
    assert!(result.errors[0].message().contains("$v"));
}
