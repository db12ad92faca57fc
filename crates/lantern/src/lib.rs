//! Schema-driven query engine.
//!
//! Load SDL into an [`Engine`], register the functions that fetch records
//! for it, then execute queries:
//!
//! ```
//! use lantern::{Engine, Record, Request, RequestContext};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), lantern::SchemaLoadError> {
//! let mut engine = Engine::default();
//! engine.load_schema_str("type Query { users: [User!]! @find } type User { id: ID! name: String }")?;
//! engine.register_find("User", |_ctx, query| async move {
//!     Ok(query.apply(vec![Record::new().with("id", 1).with("name", "Ada")]))
//! });
//! let response = engine
//!     .execute(RequestContext::new(), Request::new("{ users { name } }"))
//!     .await;
//! assert_eq!(response.to_json()["data"]["users"][0]["name"], "Ada");
//! # Ok(())
//! # }
//! ```

pub use lantern_core::*;
