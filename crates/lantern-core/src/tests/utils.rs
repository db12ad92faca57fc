//! Shared fixtures: a small blog schema and in-memory tables behind it.

use crate::dataloader::partition_by_key;
use crate::relation::key_to_i64;
use crate::Engine;
use crate::EngineConfig;
use crate::FetchError;
use crate::Record;
use crate::Request;
use crate::RequestContext;
use crate::Response;
use crate::config::RootTypes;
use crate::directives::DefinitionDirectives;
use crate::scalar::ScalarRegistry;
use crate::schema::NodeStore;
use crate::schema::StoreBuilder;
use crate::SchemaLoadError;
use crate::lantern_parser::Value;
use crate::lantern_parser::ast::OperationKind;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;

pub(crate) const BLOG_SDL: &str = r#"
type Query {
  user(id: ID! @eq): User @first
  users(name: String @like, minAge: Int @gte(field: "age")): [User!]! @find
  pagedUsers(role: Role @eq): [User] @paginate(sortBy: "name")
  hello(name: String = "world"): String!
  me: User @auth
  greeting: String @cache(ttl: 60, tags: ["greeting"])
  search(term: String!): [SearchResult!]!
  broken: String!
  optional: String
  node(id: ID!): Node
}

type Mutation {
  rename(id: ID!, name: String!): User
}

interface Node {
  id: ID!
}

union SearchResult = User | Post

enum Role {
  ADMIN @enum(value: 1)
  MEMBER @enum(value: 2)
}

type User implements Node {
  id: ID!
  name: String!
  age: Int
  role: Role
  posts: [Post!]! @hasMany(foreignKey: "authorId")
}

type Post implements Node {
  id: ID!
  title: String!
  authorId: Int
  author: User @belongsTo(foreignKey: "authorId")
  tags: [Tag!]! @manyToMany(relation: "tags")
  comments: [Comment!]! @morphToMany(relation: "commentable")
}

type Tag {
  id: ID!
  label: String!
}

type Comment {
  id: ID!
  body: String!
  commentable: Post @morphTo
}
"#;

static LOGGING: Once = Once::new();

/// Routes `tracing` output to the test harness once per process.
pub(crate) fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub(crate) fn build_store(sdl: &str) -> Result<NodeStore, SchemaLoadError> {
    let directives = DefinitionDirectives::with_builtins();
    let scalars = ScalarRegistry::with_builtins();
    let roots = RootTypes::default();
    StoreBuilder::new(&directives, &scalars, &roots)
        .load_str(None, sdl)?
        .build()
}

pub(crate) fn users() -> Vec<Record> {
    vec![
        Record::new().with("id", 1).with("name", "Ada").with("age", 36).with("role", 1),
        Record::new().with("id", 2).with("name", "Grace").with("age", 45).with("role", "ADMIN"),
        Record::new().with("id", 3).with("name", "Linus").with("age", 17).with("role", 2),
    ]
}

pub(crate) fn posts() -> Vec<Record> {
    vec![
        Record::new().with("id", 10).with("title", "Engines").with("author_id", 1),
        Record::new().with("id", 11).with("title", "Compilers").with("author_id", 2),
        Record::new().with("id", 12).with("title", "Notes").with("author_id", 1),
        Record::new().with("id", 13).with("title", "Orphan").with("author_id", Value::Null),
    ]
}

pub(crate) fn tags() -> Vec<Record> {
    vec![
        Record::new().with("id", 100).with("label", "rust"),
        Record::new().with("id", 101).with("label", "db"),
    ]
}

pub(crate) fn post_tags() -> Vec<Record> {
    vec![
        Record::new().with("post_id", 10).with("tag_id", 100),
        Record::new().with("post_id", 10).with("tag_id", 101),
        Record::new().with("post_id", 11).with("tag_id", 100),
    ]
}

pub(crate) fn comments() -> Vec<Record> {
    vec![
        Record::new()
            .with("id", 1000)
            .with("body", "nice")
            .with("commentable_id", 10)
            .with("commentable_type", "post"),
        Record::new()
            .with("id", 1001)
            .with("body", "meh")
            .with("commentable_id", 10)
            .with("commentable_type", "video"),
    ]
}

/// Records every batch call it serves.
#[derive(Clone, Debug, Default)]
pub(crate) struct BatchLog {
    calls: Arc<Mutex<Vec<(String, Vec<i64>)>>>,
}

impl BatchLog {
    pub(crate) fn record(&self, loader: &str, keys: &[i64]) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((loader.to_string(), keys.to_vec()));
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<i64>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

fn table_batch(
    engine: &mut Engine,
    log: &BatchLog,
    type_name: &'static str,
    key_field: &'static str,
    rows: fn() -> Vec<Record>,
) {
    let log = log.clone();
    engine.register_batch(type_name, key_field, move |request| {
        let log = log.clone();
        async move {
            log.record(&format!("{type_name}.{key_field}"), &request.keys);
            let matching: Vec<Record> = rows()
                .into_iter()
                .filter(|row| request.filters.iter().all(|f| f.matches(row)))
                .collect();
            Ok::<_, FetchError>(partition_by_key(&request.keys, matching, |row| {
                row.get(&request.key_field).and_then(key_to_i64)
            }))
        }
    });
}

/// An engine over [`BLOG_SDL`] with every quick and batch function backed
/// by the fixture tables.
pub(crate) fn blog_engine_with(config: EngineConfig, log: &BatchLog) -> Engine {
    init_logging();
    let mut engine = Engine::new(config);
    if let Err(err) = engine.load_schema_str(BLOG_SDL) {
        panic!("fixture schema failed to load: {err}");
    }
    engine
        .register_find("User", |_ctx, query| async move { Ok(query.apply(users())) })
        .register_first("User", |_ctx, query| async move {
            Ok(query.apply(users()).into_iter().next())
        })
        .register_paginate("User", |_ctx, query| async move { Ok(query.apply(users())) })
        .register_count("User", |_ctx, query| async move {
            let mut unpaged = query;
            unpaged.offset = None;
            unpaged.limit = None;
            Ok(unpaged.apply(users()).len() as i64)
        })
        .register_resolver(OperationKind::Query, "hello", |ctx| async move {
            let name = ctx.argument("name").and_then(Value::as_str).unwrap_or("?");
            Ok(Value::from(format!("hello {name}")))
        })
        .register_resolver(OperationKind::Query, "broken", |_ctx| async move {
            Ok(Value::Null)
        })
        .register_resolver(OperationKind::Query, "optional", |_ctx| async move {
            Ok(Value::from("here"))
        })
        .register_resolver(OperationKind::Query, "search", |_ctx| async move {
            Ok(Value::List(vec![
                Record::typed("User").with("id", 1).with("name", "Ada").into_value(),
                Record::typed("Post").with("id", 10).with("title", "Engines").into_value(),
            ]))
        })
        .register_resolver(OperationKind::Query, "node", |ctx| async move {
            let id = ctx.argument("id").and_then(key_to_i64).unwrap_or_default();
            Ok(Record::typed("User").with("id", id).with("name", "Ada").into_value())
        })
        .register_resolver(OperationKind::Mutation, "rename", |ctx| async move {
            let name = ctx.argument("name").cloned().unwrap_or_default();
            Ok(Record::new().with("id", 1).with("name", name).into_value())
        });
    table_batch(&mut engine, log, "User", "id", users);
    table_batch(&mut engine, log, "Post", "author_id", posts);
    table_batch(&mut engine, log, "Post", "id", posts);
    table_batch(&mut engine, log, "PostTag", "post_id", post_tags);
    table_batch(&mut engine, log, "Tag", "id", tags);
    table_batch(&mut engine, log, "Comment", "commentable_id", comments);
    engine
}

pub(crate) fn blog_engine() -> Engine {
    blog_engine_with(EngineConfig::default(), &BatchLog::default())
}

pub(crate) async fn run(engine: &Engine, query: &str) -> Response {
    engine.execute(RequestContext::new(), Request::new(query)).await
}

/// The response as JSON, for compact assertions.
pub(crate) async fn run_json(engine: &Engine, query: &str) -> serde_json::Value {
    run(engine, query).await.to_json()
}
