//! Operation selection, variable coercion and field checks.

use crate::GraphQLError;
use crate::Location;
use crate::config::RootTypes;
use crate::lantern_parser;
use crate::lantern_parser::ParseError;
use crate::lantern_parser::Value;
use crate::lantern_parser::ast::ExecutableDocument;
use crate::lantern_parser::ast::OperationKind;
use crate::operation::PreparedOperation;
use crate::operation::PreparedSelection;
use crate::operation::prepare;
use crate::tests::utils::BLOG_SDL;
use crate::tests::utils::build_store;
use indexmap::IndexMap;

fn prepare_with(
    query: &str,
    operation_name: Option<&str>,
    variables: IndexMap<String, Value>,
) -> Result<PreparedOperation, Vec<GraphQLError>> {
    let store = build_store(BLOG_SDL).unwrap_or_else(|err| panic!("{err}"));
    let parsed: Result<ExecutableDocument, Vec<ParseError>> =
        lantern_parser::parse_executable(query).into();
    let document = parsed.unwrap_or_else(|errors| panic!("{errors:?}"));
    prepare(&store, &RootTypes::default(), &document, operation_name, &variables)
}

fn prepare_query(query: &str) -> Result<PreparedOperation, Vec<GraphQLError>> {
    prepare_with(query, None, IndexMap::new())
}

fn messages(result: Result<PreparedOperation, Vec<GraphQLError>>) -> Vec<String> {
    match result {
        Ok(operation) => panic!("expected errors, prepared {operation:?}"),
        Err(errors) => errors.into_iter().map(|e| e.message).collect(),
    }
}

fn first_field(operation: &PreparedOperation) -> &crate::operation::PreparedField {
    match operation.selection.first() {
        Some(PreparedSelection::Field(field)) => field,
        other => panic!("expected a field, got {other:?}"),
    }
}

// =============================================================================
// Operation selection
// =============================================================================

mod selection {
    use super::*;

    #[test]
    fn single_operation_needs_no_name() -> Result<(), Vec<GraphQLError>> {
        let operation = prepare_query("{ hello }")?;
        assert_eq!(operation.kind, OperationKind::Query);
        assert_eq!(operation.root_type, "Query");
        assert_eq!(operation.name, None);
        Ok(())
    }

    #[test]
    fn several_operations_need_a_name() {
        let query = "query A { hello } query B { optional }";
        assert_eq!(
            messages(prepare_query(query)),
            vec!["an operation name is required when the document contains several operations"],
        );
        let Ok(operation) = prepare_with(query, Some("B"), IndexMap::new()) else {
            panic!("operation B was rejected");
        };
        assert_eq!(first_field(&operation).name, "optional");
    }

    #[test]
    fn unknown_operation_name() {
        assert_eq!(
            messages(prepare_with("query A { hello }", Some("Z"), IndexMap::new())),
            vec!["unknown operation `Z`"],
        );
    }

    #[test]
    fn missing_root_type() {
        assert_eq!(
            messages(prepare_query("subscription { hello }")),
            vec!["schema has no subscription root type `Subscription`"],
        );
    }
}

// =============================================================================
// Fields and arguments
// =============================================================================

mod fields {
    use super::*;

    #[test]
    fn all_problems_are_reported_with_locations() {
        let Err(errors) = prepare_query("{ nope\n  hello(loud: true) }") else {
            panic!("bad query was prepared");
        };
        let found: Vec<(&str, Vec<Location>)> = errors
            .iter()
            .map(|e| (e.message.as_str(), e.locations.clone()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("type `Query` has no field `nope`", vec![Location::new(1, 3)]),
                (
                    "unknown argument `loud` on field `Query.hello`",
                    vec![Location::new(2, 3)],
                ),
            ],
        );
    }

    #[test]
    fn leaf_and_composite_selection_shapes() {
        assert_eq!(
            messages(prepare_query("{ hello { length } }")),
            vec!["field `hello` of leaf type `String` cannot have a selection"],
        );
        assert_eq!(
            messages(prepare_query("{ users }")),
            vec!["field `users` of type `User` must have a selection"],
        );
    }

    #[test]
    fn required_arguments_must_be_given() {
        assert_eq!(
            messages(prepare_query("{ user { name } }")),
            vec!["missing required argument `id` on field `Query.user`"],
        );
    }

    #[test]
    fn defaults_fill_absent_arguments() -> Result<(), Vec<GraphQLError>> {
        let operation = prepare_query("{ greet: hello }")?;
        let field = first_field(&operation);
        assert_eq!(field.response_key, "greet");
        assert_eq!(field.arguments.get("name"), Some(&Value::from("world")));
        Ok(())
    }

    #[test]
    fn enum_arguments_are_checked() {
        let errors = messages(prepare_query("{ pagedUsers(role: OWNER) { data { name } } }"));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("argument `role` on field `Query.pagedUsers`"), "{errors:?}");
    }

    #[test]
    fn introspection_only_on_the_query_root() {
        assert!(prepare_query("{ __schema { queryType { name } } }").is_ok());
        assert_eq!(
            messages(prepare_query(
                r#"{ user(id: 1) { __type(name: "User") { name } } }"#
            )),
            vec!["type `User` has no field `__type`"],
        );
        assert!(prepare_query("{ user(id: 1) { __typename } }").is_ok());
    }
}

// =============================================================================
// Variables
// =============================================================================

mod variables {
    use super::*;

    #[test]
    fn provided_values_are_coerced() -> Result<(), Vec<GraphQLError>> {
        let mut variables = IndexMap::new();
        variables.insert("id".to_string(), Value::Int(3));
        let operation = prepare_with(
            "query Q($id: ID!) { user(id: $id) { name } }",
            None,
            variables,
        )?;
        assert_eq!(first_field(&operation).arguments.get("id"), Some(&Value::from("3")));
        Ok(())
    }

    #[test]
    fn missing_required_variable() {
        assert_eq!(
            messages(prepare_query("query Q($id: ID!) { user(id: $id) { name } }")),
            vec!["missing value for required variable `$id` of type `ID!`"],
        );
    }

    #[test]
    fn rejected_variable_is_reported_once() {
        let mut variables = IndexMap::new();
        variables.insert("id".to_string(), Value::Boolean(true));
        let errors = messages(prepare_with(
            "query Q($id: ID!) { user(id: $id) { name } }",
            None,
            variables,
        ));
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].starts_with("variable `$id`"), "{errors:?}");
    }

    #[test]
    fn undeclared_variable() {
        assert_eq!(
            messages(prepare_query("{ hello(name: $who) }")),
            vec!["variable `$who` is not defined"],
        );
    }

    #[test]
    fn absent_nullable_variable_falls_back_to_the_argument_default()
    -> Result<(), Vec<GraphQLError>> {
        let operation = prepare_query("query Q($who: String) { hello(name: $who) }")?;
        assert_eq!(first_field(&operation).arguments.get("name"), Some(&Value::from("world")));
        Ok(())
    }

    #[test]
    fn variables_must_have_input_types() {
        assert_eq!(
            messages(prepare_query("query Q($u: User) { hello }")),
            vec!["variable `$u` cannot have non-input type `User`"],
        );
    }
}

// =============================================================================
// Fragments and conditional inclusion
// =============================================================================

mod fragments {
    use super::*;

    #[test]
    fn unknown_and_cyclic_fragments() {
        assert_eq!(
            messages(prepare_query("{ ...Missing }")),
            vec!["unknown fragment `Missing`"],
        );
        assert_eq!(
            messages(prepare_query(
                "{ user(id: 1) { ...A } } fragment A on User { ...B } fragment B on User { ...A }"
            )),
            vec!["fragment `A` spreads itself"],
        );
    }

    #[test]
    fn conditions_must_name_composite_types() {
        assert_eq!(
            messages(prepare_query("{ ... on Role { hello } }")),
            vec!["fragment cannot be conditioned on `Role`, which is an enum"],
        );
    }

    #[test]
    fn skip_and_include_drop_fields() -> Result<(), Vec<GraphQLError>> {
        let operation = prepare_query(
            "{ hello @skip(if: true) optional @include(if: false) greeting @include(if: true) }",
        )?;
        assert_eq!(operation.selection.len(), 1);
        assert_eq!(first_field(&operation).name, "greeting");
        Ok(())
    }

    #[test]
    fn skip_needs_a_boolean() {
        assert_eq!(
            messages(prepare_query(r#"{ hello @skip(if: "yes") }"#)),
            vec!["argument `if` of @skip must be a Boolean"],
        );
    }
}
