//! Node store, directive system, validator and concurrent executor of the
//! lantern query engine.
//!
//! An [`Engine`] loads schema documents into a validated [`NodeStore`],
//! holds the host functions registered under typed keys in a
//! [`Registry`], and executes query documents against them. Relation
//! fields are loaded through batching [`DataLoader`](dataloader::DataLoader)s
//! and every fan-out is bounded by [`EngineConfig::max_concurrency`].

pub mod config;
pub mod dataloader;
pub mod directives;
mod engine;
pub mod error;
pub mod execution;
pub mod naming;
pub mod operation;
mod record;
pub mod registry;
pub mod relation;
pub mod scalar;
pub mod schema;
pub mod types;
pub mod validator;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::ExecutionError;
pub use error::ExecutionErrorKind;
pub use error::FetchError;
pub use error::GraphQLError;
pub use error::Location;
pub use error::SchemaLoadError;
pub use error::ValidateError;
pub use execution::QuickQuery;
pub use execution::Request;
pub use execution::RequestContext;
pub use execution::ResolverContext;
pub use execution::Response;
pub use lantern_parser;
pub use record::Record;
pub use record::TYPENAME_KEY;
pub use registry::Registry;
pub use registry::TypeName;
pub use relation::BatchRequest;
pub use schema::NodeStore;

#[cfg(test)]
mod tests;
