//! `@auth`, `@cache` and host-registered runtime directives.

use crate::directives::runtime::FieldContext;
use crate::directives::runtime::FieldDirective;
use crate::tests::utils::blog_engine;
use crate::Engine;
use crate::EngineConfig;
use crate::ExecutionError;
use crate::Record;
use crate::Request;
use crate::RequestContext;
use crate::Response;
use crate::lantern_parser::Value;
use crate::lantern_parser::ast::DirectiveAnnotation;
use crate::lantern_parser::ast::OperationKind;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

async fn run_as(engine: &Engine, user: Option<&str>, query: &str) -> Response {
    let context = match user {
        Some(user) => RequestContext::new().with_user(user),
        None => RequestContext::new(),
    };
    engine.execute(context, Request::new(query)).await
}

fn load(engine: &mut Engine, sdl: &str) {
    engine
        .load_schema_str(sdl)
        .map(|_| ())
        .unwrap_or_else(|err| panic!("{err}"));
}

// =============================================================================
// @auth
// =============================================================================

mod auth {
    use super::*;

    fn guarded_engine(config: EngineConfig) -> Engine {
        let mut engine = Engine::new(config);
        load(
            &mut engine,
            r#"type Query { me: String @auth secret: String @auth(msg: "log in first") open: String }"#,
        );
        engine
            .register_resolver(OperationKind::Query, "me", |ctx| async move {
                Ok(ctx.request.user_id().map(Value::from).unwrap_or(Value::Null))
            })
            .register_resolver(OperationKind::Query, "secret", |_ctx| async move {
                Ok(Value::from("42"))
            })
            .register_resolver(OperationKind::Query, "open", |_ctx| async move {
                Ok(Value::from("hi"))
            });
        engine
    }

    #[tokio::test]
    async fn anonymous_requests_are_rejected_per_field() {
        let engine = guarded_engine(EngineConfig::default());
        let response = run_as(&engine, None, "{ me open }").await;
        assert_eq!(response.to_json()["data"], json!({"me": null, "open": "hi"}));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "unauthorized");
        assert_eq!(response.errors[0].path, vec!["me".to_string()]);
    }

    #[tokio::test]
    async fn directive_and_config_messages() {
        let config = EngineConfig {
            unauthorized_message: "who are you?".to_string(),
            ..EngineConfig::default()
        };
        let engine = guarded_engine(config);
        let response = run_as(&engine, None, "{ me secret }").await;
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["who are you?", "log in first"]);
    }

    #[tokio::test]
    async fn identified_requests_pass() {
        let engine = guarded_engine(EngineConfig::default());
        let response = run_as(&engine, Some("u1"), "{ me secret }").await;
        assert!(response.is_ok(), "{:?}", response.errors);
        assert_eq!(response.to_json()["data"], json!({"me": "u1", "secret": "42"}));
    }

    #[tokio::test]
    async fn blog_me_requires_a_user() {
        let engine = blog_engine();
        let response = run_as(&engine, None, "{ me { name } }").await;
        assert_eq!(response.errors[0].message, "unauthorized");
    }
}

// =============================================================================
// @cache
// =============================================================================

mod cache {
    use super::*;

    fn counting_engine(calls: &Arc<AtomicUsize>) -> Engine {
        let mut engine = Engine::default();
        load(
            &mut engine,
            r#"type Query {
                 greeting(lang: String): String @cache(ttl: 60, tags: ["greeting"])
                 mine: String @cache(auth: true, tags: ["mine"])
               }"#,
        );
        let greeting_calls = Arc::clone(calls);
        let mine_calls = Arc::clone(calls);
        engine
            .register_resolver(OperationKind::Query, "greeting", move |ctx| {
                let n = greeting_calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    let lang = ctx.argument("lang").and_then(Value::as_str).unwrap_or("en");
                    Ok(Value::from(format!("{lang}#{n}")))
                }
            })
            .register_resolver(OperationKind::Query, "mine", move |ctx| {
                mine_calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(ctx.request.user_id().map(Value::from).unwrap_or(Value::Null)) }
            });
        engine
    }

    #[tokio::test]
    async fn repeated_requests_are_answered_from_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = counting_engine(&calls);
        let first = run_as(&engine, None, "{ greeting }").await;
        let second = run_as(&engine, None, "{ greeting }").await;
        assert_eq!(first.get("greeting"), Some(&Value::from("en#0")));
        assert_eq!(second.get("greeting"), Some(&Value::from("en#0")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let other = run_as(&engine, None, r#"{ greeting(lang: "fr") }"#).await;
        assert_eq!(other.get("greeting"), Some(&Value::from("fr#1")));
    }

    #[tokio::test]
    async fn invalidating_a_tag_forces_a_refetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = counting_engine(&calls);
        run_as(&engine, None, "{ greeting }").await;
        run_as(&engine, None, r#"{ greeting(lang: "fr") }"#).await;
        assert_eq!(engine.cache().invalidate_tag("greeting"), 2);
        assert!(engine.cache().is_empty());

        let again = run_as(&engine, None, "{ greeting }").await;
        assert_eq!(again.get("greeting"), Some(&Value::from("en#2")));
    }

    #[tokio::test]
    async fn auth_scoped_entries_are_per_user() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = counting_engine(&calls);
        let alice = run_as(&engine, Some("alice"), "{ mine }").await;
        let bob = run_as(&engine, Some("bob"), "{ mine }").await;
        run_as(&engine, Some("alice"), "{ mine }").await;
        assert_eq!(alice.get("mine"), Some(&Value::from("alice")));
        assert_eq!(bob.get("mine"), Some(&Value::from("bob")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert_eq!(engine.cache().invalidate_tag("alice:mine"), 1);
        assert_eq!(engine.cache().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_their_ttl() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = counting_engine(&calls);
        run_as(&engine, None, "{ greeting }").await;
        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        let later = run_as(&engine, None, "{ greeting }").await;
        assert_eq!(later.get("greeting"), Some(&Value::from("en#1")));
    }

    fn profile_engine(calls: &Arc<AtomicUsize>) -> Engine {
        let mut engine = Engine::default();
        load(
            &mut engine,
            r#"type Query { me: Person @cache(ttl: 60) }
               type Person { id: ID name: String }"#,
        );
        let calls = Arc::clone(calls);
        engine.register_resolver(OperationKind::Query, "me", move |_ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Record::new().with("id", 1).with("name", "Ada").into_value()) }
        });
        engine
    }

    #[tokio::test]
    async fn entries_are_keyed_by_the_requested_selection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = profile_engine(&calls);
        let ids = run_as(&engine, None, "{ me { id } }").await;
        let names = run_as(&engine, None, "{ me { name } }").await;
        assert_eq!(ids.to_json()["data"], json!({"me": {"id": "1"}}));
        assert_eq!(names.to_json()["data"], json!({"me": {"name": "Ada"}}));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let again = run_as(&engine, None, "{ me { id } }").await;
        assert_eq!(again.to_json()["data"], json!({"me": {"id": "1"}}));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn aliases_with_different_selections_do_not_share_entries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = profile_engine(&calls);
        let response = run_as(&engine, None, "{ a: me { id } b: me { name } }").await;
        assert!(response.is_ok(), "{:?}", response.errors);
        assert_eq!(
            response.to_json()["data"],
            json!({"a": {"id": "1"}, "b": {"name": "Ada"}})
        );
    }

    #[tokio::test]
    async fn reloading_the_schema_clears_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut engine = counting_engine(&calls);
        run_as(&engine, None, "{ greeting }").await;
        assert_eq!(engine.cache().len(), 1);
        load(&mut engine, "type Query { greeting: String }");
        assert!(engine.cache().is_empty());
    }
}

// =============================================================================
// Host directives
// =============================================================================

mod host {
    use super::*;

    struct Upper;

    #[async_trait]
    impl FieldDirective for Upper {
        async fn after(
            &self,
            _ctx: &FieldContext<'_>,
            _invocation: &DirectiveAnnotation,
            result: &Value,
        ) -> Result<Option<Value>, ExecutionError> {
            Ok(result.as_str().map(|s| Value::from(s.to_uppercase())))
        }
    }

    struct Maintenance;

    #[async_trait]
    impl FieldDirective for Maintenance {
        async fn before(
            &self,
            ctx: &FieldContext<'_>,
            _invocation: &DirectiveAnnotation,
        ) -> Result<Option<Value>, ExecutionError> {
            let down = ctx.request.value("maintenance").and_then(Value::as_bool);
            Ok(down.filter(|d| *d).map(|_| Value::from("down for maintenance")))
        }
    }

    fn engine_with_hooks(calls: &Arc<AtomicUsize>) -> Engine {
        let mut engine = Engine::default();
        engine
            .register_runtime_directive("upper", Upper)
            .register_runtime_directive("maintenance", Maintenance);
        load(
            &mut engine,
            r#"
            directive @upper on FIELD_DEFINITION
            directive @maintenance on FIELD_DEFINITION
            type Query { status: String @maintenance @upper user: User @upper }
            type User { name: String }
            "#,
        );
        let calls = Arc::clone(calls);
        engine
            .register_resolver(OperationKind::Query, "status", move |_ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(Value::from("ok")) }
            })
            .register_resolver(OperationKind::Query, "user", |_ctx| async move {
                Ok(Record::new().with("name", "ada").into_value())
            });
        engine
    }

    #[tokio::test]
    async fn after_hooks_may_replace_the_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with_hooks(&calls);
        let response = run_as(&engine, None, "{ status user { name } }").await;
        assert_eq!(
            response.to_json()["data"],
            json!({"status": "OK", "user": {"name": "ada"}})
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn before_hooks_short_circuit_resolution_and_after_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with_hooks(&calls);
        let response = engine
            .execute(
                RequestContext::new().with_value("maintenance", true),
                Request::new("{ status }"),
            )
            .await;
        assert_eq!(response.get("status"), Some(&Value::from("down for maintenance")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
