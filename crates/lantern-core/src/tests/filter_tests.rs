//! Filters, ordering and paging of quick queries over in-memory records.

use crate::Record;
use crate::execution::Filter;
use crate::execution::FilterOp;
use crate::execution::OrderBy;
use crate::execution::Page;
use crate::execution::QuickQuery;
use crate::execution::SortDirection;
use crate::execution::filters_from_arguments;
use crate::lantern_parser::Value;
use crate::tests::utils::BLOG_SDL;
use crate::tests::utils::build_store;
use crate::tests::utils::users;
use indexmap::IndexMap;

fn names(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str))
        .collect()
}

// =============================================================================
// Filter
// =============================================================================

mod filter {
    use super::*;

    #[test]
    fn directive_names_map_to_operators() {
        assert_eq!(FilterOp::from_directive("notIn"), Some(FilterOp::NotIn));
        assert_eq!(FilterOp::from_directive("gte"), Some(FilterOp::Gte));
        assert_eq!(FilterOp::from_directive("between"), None);
        assert_eq!(FilterOp::NotIn.to_string(), "NOT IN");
    }

    #[test]
    fn display_reads_like_sql() {
        let filter = Filter::new("age", FilterOp::Gte, 18);
        assert_eq!(filter.to_string(), "age >= 18");
    }

    #[test]
    fn missing_column_never_matches() {
        let record = Record::new().with("id", 1);
        assert!(!Filter::eq("name", "Ada").matches(&record));
        assert!(!Filter::new("name", FilterOp::Neq, "Ada").matches(&record));
    }

    #[test]
    fn numbers_compare_across_int_and_float() {
        let record = Record::new().with("score", 2.5);
        assert!(Filter::new("score", FilterOp::Gt, 2).matches(&record));
        assert!(Filter::new("score", FilterOp::Lte, 2.5).matches(&record));
        assert!(!Filter::new("score", FilterOp::Lt, 1).matches(&record));
    }

    #[test]
    fn string_ids_equal_integer_columns() {
        let record = Record::new().with("id", 7);
        assert!(Filter::eq("id", "7").matches(&record));
        assert!(!Filter::eq("id", "8").matches(&record));
    }

    #[test]
    fn enum_values_equal_their_names() {
        let record = Record::new().with("role", "ADMIN");
        assert!(Filter::eq("role", Value::Enum("ADMIN".to_string())).matches(&record));
    }

    #[test]
    fn in_and_not_in_test_membership() {
        let record = Record::new().with("id", 2);
        let set = Value::from(vec![Value::from(1), Value::from(2)]);
        assert!(Filter::new("id", FilterOp::In, set.clone()).matches(&record));
        assert!(!Filter::new("id", FilterOp::NotIn, set).matches(&record));
    }

    #[test]
    fn like_supports_both_wildcards() {
        let record = Record::new().with("name", "Grace");
        for (pattern, expected) in [
            ("Gr%", true),
            ("%ace", true),
            ("G_ace", true),
            ("%r%c%", true),
            ("G_ce", false),
            ("grace", false),
            ("%", true),
        ] {
            let filter = Filter::new("name", FilterOp::Like, pattern);
            assert_eq!(filter.matches(&record), expected, "pattern {pattern}");
        }
    }
}

// =============================================================================
// Filters from arguments
// =============================================================================

mod from_arguments {
    use super::*;

    #[test]
    fn annotated_arguments_become_filters() -> Result<(), crate::SchemaLoadError> {
        let store = build_store(BLOG_SDL)?;
        let Some(users_field) = store.field("Query", "users") else {
            panic!("Query.users is missing");
        };
        let mut arguments = IndexMap::new();
        arguments.insert("name".to_string(), Value::from("A%"));
        arguments.insert("minAge".to_string(), Value::from(30));

        let filters = filters_from_arguments(users_field, &arguments);
        assert_eq!(
            filters,
            vec![
                Filter::new("name", FilterOp::Like, "A%"),
                Filter::new("age", FilterOp::Gte, 30),
            ],
        );
        Ok(())
    }

    #[test]
    fn unannotated_column_is_the_argument_name() -> Result<(), crate::SchemaLoadError> {
        let store = build_store(
            "type Query { posts(authorId: ID @eq): [Post!]! @find } type Post { id: ID! }",
        )?;
        let Some(posts_field) = store.field("Query", "posts") else {
            panic!("Query.posts is missing");
        };
        let mut arguments = IndexMap::new();
        arguments.insert("authorId".to_string(), Value::from("7"));

        assert_eq!(
            filters_from_arguments(posts_field, &arguments),
            vec![Filter::new("authorId", FilterOp::Eq, "7")],
        );
        Ok(())
    }

    #[test]
    fn null_and_absent_arguments_are_skipped() -> Result<(), crate::SchemaLoadError> {
        let store = build_store(BLOG_SDL)?;
        let Some(users_field) = store.field("Query", "users") else {
            panic!("Query.users is missing");
        };
        let mut arguments = IndexMap::new();
        arguments.insert("name".to_string(), Value::Null);

        assert!(filters_from_arguments(users_field, &arguments).is_empty());
        Ok(())
    }
}

// =============================================================================
// QuickQuery
// =============================================================================

mod quick_query {
    use super::*;

    #[test]
    fn orders_then_pages() {
        let query = QuickQuery {
            order_by: Some(OrderBy {
                column: "name".to_string(),
                direction: SortDirection::Desc,
            }),
            offset: Some(1),
            limit: Some(1),
            ..QuickQuery::new("User")
        };
        let rows = query.apply(users());
        assert_eq!(names(&rows), vec!["Grace"]);
    }

    #[test]
    fn filters_run_before_paging() {
        let query = QuickQuery {
            limit: Some(10),
            ..QuickQuery::new("User").filter(Filter::new("age", FilterOp::Lt, 40))
        };
        let rows = query.apply(users());
        assert!(rows.iter().all(|r| r.get("age").and_then(Value::as_i64) < Some(40)));
    }

    #[test]
    fn sort_direction_reads_desc_and_minus_one() {
        assert_eq!(SortDirection::from_value(None), SortDirection::Asc);
        assert_eq!(
            SortDirection::from_value(Some(&Value::from("DESC"))),
            SortDirection::Desc,
        );
        assert_eq!(SortDirection::from_value(Some(&Value::from(-1))), SortDirection::Desc);
        assert_eq!(SortDirection::from_value(Some(&Value::from(1))), SortDirection::Asc);
    }
}

// =============================================================================
// Page
// =============================================================================

mod page {
    use super::*;

    #[test]
    fn offset_counts_whole_pages() -> Result<(), crate::ExecutionError> {
        let page = Page::new(3, 10)?;
        assert_eq!((page.offset(), page.limit()), (20, 10));
        Ok(())
    }

    #[test]
    fn rejects_non_positive_values() {
        let Err(err) = Page::new(0, 10) else {
            panic!("page 0 was accepted");
        };
        assert_eq!(err.message, "page must be at least 1, got 0");
        assert!(Page::new(1, -2).is_err());
    }

    #[test]
    fn info_without_count_leaves_totals_unknown() -> Result<(), crate::ExecutionError> {
        let info = Page::new(2, 5)?.info(None);
        assert_eq!(info.current_page, 2);
        assert_eq!(info.total_count, None);
        Ok(())
    }

    #[test]
    fn info_with_count_derives_totals() -> Result<(), crate::ExecutionError> {
        let info = Page::new(2, 5)?.info(Some(11));
        assert_eq!(info.total_page, Some(3));
        assert_eq!(info.has_next_page, Some(true));

        let last = Page::new(3, 5)?.info(Some(11));
        assert_eq!(last.has_next_page, Some(false));
        Ok(())
    }

    #[test]
    fn huge_counts_do_not_overflow() -> Result<(), crate::ExecutionError> {
        let info = Page::new(1, 10)?.info(Some(i64::MAX));
        assert_eq!(info.total_page, Some(i64::MAX / 10 + 1));
        assert_eq!(info.has_next_page, Some(true));

        let exact = Page::new(1, 1)?.info(Some(i64::MAX));
        assert_eq!(exact.total_page, Some(i64::MAX));
        Ok(())
    }
}
