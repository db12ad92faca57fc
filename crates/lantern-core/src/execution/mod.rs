//! Running prepared operations against an engine's registry and store.

mod context;
mod executor;
mod filter;
mod introspection;
pub(crate) mod merge;
mod quick;
mod request;
mod response;
pub(crate) mod value_check;

pub use context::RequestContext;
pub use context::ResolverContext;
pub(crate) use executor::Executor;
pub use filter::Filter;
pub use filter::FilterOp;
pub use filter::filters_from_arguments;
pub use quick::OrderBy;
pub use quick::Page;
pub use quick::PaginateInfo;
pub use quick::QuickQuery;
pub use quick::SortDirection;
pub use request::Request;
pub use response::Response;
pub use value_check::coerce_input;
pub use value_check::serialize_leaf;
