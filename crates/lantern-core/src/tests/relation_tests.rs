//! Relation loading through the dataloader pool.

use crate::tests::utils::BatchLog;
use crate::tests::utils::blog_engine_with;
use crate::tests::utils::run;
use crate::tests::utils::run_json;
use crate::dataloader::partition_by_key;
use crate::relation::key_to_i64;
use crate::Engine;
use crate::EngineConfig;
use crate::Record;
use crate::lantern_parser::Value;
use crate::lantern_parser::ast::OperationKind;
use serde_json::json;

mod keys {
    use super::*;

    #[test]
    fn integers_numeric_strings_and_integral_floats() {
        assert_eq!(key_to_i64(&Value::Int(7)), Some(7));
        assert_eq!(key_to_i64(&Value::from("42")), Some(42));
        assert_eq!(key_to_i64(&Value::Float(3.0)), Some(3));
    }

    #[test]
    fn everything_else_is_rejected() {
        assert_eq!(key_to_i64(&Value::Float(3.5)), None);
        assert_eq!(key_to_i64(&Value::from("abc")), None);
        assert_eq!(key_to_i64(&Value::Boolean(true)), None);
        assert_eq!(key_to_i64(&Value::Null), None);
    }
}

mod loading {
    use super::*;

    #[tokio::test]
    async fn belongs_to_batches_sibling_lookups() {
        let log = BatchLog::default();
        let mut engine = blog_engine_with(EngineConfig::default(), &log);
        engine
            .load_schema_str(&format!(
                "{}\nextend type Query {{ posts: [Post!]! @find }}",
                crate::tests::utils::BLOG_SDL
            ))
            .map(|_| ())
            .unwrap_or_else(|err| panic!("{err}"));
        engine.register_find("Post", |_ctx, query| async move {
            Ok(query.apply(crate::tests::utils::posts()))
        });

        let json = run_json(&engine, "{ posts { title author { name } } }").await;
        assert_eq!(
            json["data"]["posts"],
            json!([
                {"title": "Engines", "author": {"name": "Ada"}},
                {"title": "Compilers", "author": {"name": "Grace"}},
                {"title": "Notes", "author": {"name": "Ada"}},
                {"title": "Orphan", "author": null},
            ])
        );
        let user_batches: Vec<_> = log
            .calls()
            .into_iter()
            .filter(|(loader, _)| loader == "User.id")
            .collect();
        assert_eq!(user_batches.len(), 1);
        assert_eq!(user_batches[0].1, vec![1, 2]);
    }

    #[tokio::test]
    async fn many_to_many_goes_through_the_pivot() {
        let engine = blog_engine_with(EngineConfig::default(), &BatchLog::default());
        let json = run_json(
            &engine,
            r#"{ search(term: "") { ... on Post { title tags { label } } } }"#,
        )
        .await;
        assert_eq!(
            json["data"]["search"][1],
            json!({"title": "Engines", "tags": [{"label": "rust"}, {"label": "db"}]})
        );
    }

    #[tokio::test]
    async fn morph_many_filters_on_owner_type() {
        let engine = blog_engine_with(EngineConfig::default(), &BatchLog::default());
        let json = run_json(
            &engine,
            r#"{ search(term: "") { ... on Post { comments { body } } } }"#,
        )
        .await;
        assert_eq!(json["data"]["search"][1], json!({"comments": [{"body": "nice"}]}));
    }

    #[tokio::test]
    async fn morph_to_resolves_the_named_type() {
        let mut engine = blog_engine_with(EngineConfig::default(), &BatchLog::default());
        engine
            .load_schema_str(&format!(
                "{}\nextend type Query {{ comment: Comment }}",
                crate::tests::utils::BLOG_SDL
            ))
            .map(|_| ())
            .unwrap_or_else(|err| panic!("{err}"));
        engine.register_resolver(OperationKind::Query, "comment", |_ctx| async move {
            Ok(Record::new()
                .with("id", 1000)
                .with("body", "nice")
                .with("commentable_id", 11)
                .with("commentable_type", "post")
                .into_value())
        });
        let json = run_json(&engine, "{ comment { commentable { __typename title } } }").await;
        assert_eq!(
            json,
            json!({"data": {"comment": {"commentable": {"__typename": "Post", "title": "Compilers"}}}})
        );
    }

    #[tokio::test]
    async fn has_one_picks_a_single_row_or_null() {
        let mut engine = Engine::default();
        engine
            .load_schema_str(
                "type Query { users: [User!]! @find }
                 type User { id: ID! name: String profile: Profile @hasOne }
                 type Profile { id: ID! bio: String }",
            )
            .map(|_| ())
            .unwrap_or_else(|err| panic!("{err}"));
        engine
            .register_find("User", |_ctx, query| async move {
                Ok(query.apply(vec![
                    Record::new().with("id", 1).with("name", "Ada"),
                    Record::new().with("id", 2).with("name", "Grace"),
                ]))
            })
            .register_batch("Profile", "user_id", |request| async move {
                let rows = vec![
                    Record::new().with("id", 10).with("bio", "first").with("user_id", 1),
                    Record::new().with("id", 11).with("bio", "second").with("user_id", 1),
                ];
                Ok(partition_by_key(&request.keys, rows, |row| {
                    row.get("user_id").and_then(key_to_i64)
                }))
            });

        let json = run_json(&engine, "{ users { name profile { __typename bio } } }").await;
        assert_eq!(
            json,
            json!({"data": {"users": [
                {"name": "Ada", "profile": {"__typename": "Profile", "bio": "first"}},
                {"name": "Grace", "profile": null},
            ]}})
        );
    }

    #[tokio::test]
    async fn missing_key_field_is_an_error() {
        let mut engine = blog_engine_with(EngineConfig::default(), &BatchLog::default());
        engine.register_resolver(OperationKind::Query, "node", |_ctx| async move {
            Ok(Record::typed("Post").with("id", 1).with("title", "t").into_value())
        });
        let response = run(&engine, "{ node(id: 1) { ... on Post { author { name } } } }").await;
        assert_eq!(response.errors[0].message, "field author_id not found");
    }

    #[tokio::test]
    async fn unregistered_batch_names_the_relation() {
        let mut engine = Engine::default();
        engine
            .load_schema_str(
                "type Query { me: User } type User { id: ID! friends: [User!]! @hasMany }",
            )
            .map(|_| ())
            .unwrap_or_else(|err| panic!("{err}"));
        engine.register_resolver(OperationKind::Query, "me", |_ctx| async move {
            Ok(Record::new().with("id", 1).into_value())
        });
        let response = run(&engine, "{ me { friends { id } } }").await;
        assert_eq!(
            response.errors[0].message,
            "relation `user`: no batch function is registered for `User` by `user_id`"
        );
        assert_eq!(response.errors[0].path, vec!["me".to_string()]);
    }
}
