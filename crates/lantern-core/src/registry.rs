//! Host functions the engine calls to produce data.

use crate::error::ExecutionError;
use crate::error::FetchError;
use crate::execution::QuickQuery;
use crate::execution::RequestContext;
use crate::execution::ResolverContext;
use crate::record::Record;
use crate::relation::BatchRequest;
use futures::FutureExt;
use futures::future::BoxFuture;
use lantern_parser::Value;
use lantern_parser::ast::OperationKind;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The name of an object type, as a registry key.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kinds of quick function a type can register.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum QuickVerb {
    Find,
    First,
    Paginate,
    Count,
}

impl fmt::Display for QuickVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuickVerb::Find => "find",
            QuickVerb::First => "first",
            QuickVerb::Paginate => "paginate",
            QuickVerb::Count => "count",
        })
    }
}

/// Identifies one dataloader: records of `type_name` looked up by
/// `key_field`, restricted by fixed equality filters.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LoaderKey {
    pub type_name: TypeName,
    pub key_field: String,
    pub filters: BTreeMap<String, String>,
}

impl LoaderKey {
    pub fn new(type_name: impl Into<TypeName>, key_field: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            key_field: key_field.into(),
            filters: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }
}

impl fmt::Display for LoaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.key_field)?;
        for (column, value) in &self.filters {
            write!(f, "[{column}={value}]")?;
        }
        Ok(())
    }
}

pub type ResolverFn =
    Arc<dyn Fn(ResolverContext) -> BoxFuture<'static, Result<Value, ExecutionError>> + Send + Sync>;

pub type ListFn = Arc<
    dyn Fn(Arc<RequestContext>, QuickQuery) -> BoxFuture<'static, Result<Vec<Record>, FetchError>>
        + Send
        + Sync,
>;

pub type FirstFn = Arc<
    dyn Fn(Arc<RequestContext>, QuickQuery) -> BoxFuture<'static, Result<Option<Record>, FetchError>>
        + Send
        + Sync,
>;

pub type CountFn = Arc<
    dyn Fn(Arc<RequestContext>, QuickQuery) -> BoxFuture<'static, Result<i64, FetchError>>
        + Send
        + Sync,
>;

/// Loads the records for many keys at once; returns one slot per key, in
/// key order.
pub type BatchFn = Arc<
    dyn Fn(BatchRequest) -> BoxFuture<'static, Result<Vec<Vec<Record>>, FetchError>> + Send + Sync,
>;

/// Narrows a quick query, e.g. by adding a filter.
pub type ScopeFn = Arc<dyn Fn(&mut QuickQuery) + Send + Sync>;

/// Every host function an engine dispatches to, under typed keys.
#[derive(Clone, Default)]
pub struct Registry {
    resolvers: HashMap<(OperationKind, String), ResolverFn>,
    lists: HashMap<(TypeName, QuickVerb), ListFn>,
    firsts: HashMap<TypeName, FirstFn>,
    counts: HashMap<TypeName, CountFn>,
    batches: HashMap<(TypeName, String), BatchFn>,
    scopes: HashMap<String, ScopeFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_resolver<F, Fut>(
        &mut self,
        kind: OperationKind,
        field: impl Into<String>,
        resolver: F,
    ) -> &mut Self
    where
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ExecutionError>> + Send + 'static,
    {
        self.resolvers
            .insert((kind, field.into()), Arc::new(move |ctx| resolver(ctx).boxed()));
        self
    }

    fn register_list<F, Fut>(&mut self, type_name: TypeName, verb: QuickVerb, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Record>, FetchError>> + Send + 'static,
    {
        self.lists
            .insert((type_name, verb), Arc::new(move |ctx, query| f(ctx, query).boxed()));
        self
    }

    pub fn register_find<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Record>, FetchError>> + Send + 'static,
    {
        self.register_list(type_name.into(), QuickVerb::Find, f)
    }

    /// Registers the page fetch of `@paginate`. The query carries `offset`,
    /// `limit` and `order_by`.
    pub fn register_paginate<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Record>, FetchError>> + Send + 'static,
    {
        self.register_list(type_name.into(), QuickVerb::Paginate, f)
    }

    pub fn register_first<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Record>, FetchError>> + Send + 'static,
    {
        self.firsts.insert(
            type_name.into(),
            Arc::new(move |ctx, query| f(ctx, query).boxed()),
        );
        self
    }

    pub fn register_count<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<i64, FetchError>> + Send + 'static,
    {
        self.counts.insert(
            type_name.into(),
            Arc::new(move |ctx, query| f(ctx, query).boxed()),
        );
        self
    }

    pub fn register_batch<F, Fut>(
        &mut self,
        type_name: impl Into<TypeName>,
        key_field: impl Into<String>,
        f: F,
    ) -> &mut Self
    where
        F: Fn(BatchRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Vec<Record>>, FetchError>> + Send + 'static,
    {
        self.batches.insert(
            (type_name.into(), key_field.into()),
            Arc::new(move |request| f(request).boxed()),
        );
        self
    }

    pub fn register_scope<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut QuickQuery) + Send + Sync + 'static,
    {
        self.scopes.insert(name.into(), Arc::new(f));
        self
    }

    pub fn resolver(&self, kind: OperationKind, field: &str) -> Option<&ResolverFn> {
        self.resolvers.get(&(kind, field.to_string()))
    }

    pub fn list(&self, type_name: &str, verb: QuickVerb) -> Option<&ListFn> {
        self.lists.get(&(TypeName::from(type_name), verb))
    }

    pub fn first(&self, type_name: &str) -> Option<&FirstFn> {
        self.firsts.get(&TypeName::from(type_name))
    }

    pub fn count(&self, type_name: &str) -> Option<&CountFn> {
        self.counts.get(&TypeName::from(type_name))
    }

    pub fn batch(&self, type_name: &TypeName, key_field: &str) -> Option<&BatchFn> {
        self.batches
            .get(&(type_name.clone(), key_field.to_string()))
    }

    pub fn scope(&self, name: &str) -> Option<&ScopeFn> {
        self.scopes.get(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("resolvers", &self.resolvers.len())
            .field("lists", &self.lists.len())
            .field("firsts", &self.firsts.len())
            .field("counts", &self.counts.len())
            .field("batches", &self.batches.len())
            .field("scopes", &self.scopes.len())
            .finish()
    }
}
