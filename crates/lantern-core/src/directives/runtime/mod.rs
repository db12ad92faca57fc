//! Hooks that run around the resolution of a top-level field.

mod auth;
mod cache;

pub use auth::AuthDirective;
pub use cache::CacheDirective;
pub use cache::TagCache;

use crate::config::EngineConfig;
use crate::error::ExecutionError;
use crate::execution::RequestContext;
use crate::operation::PreparedField;
use crate::schema::FieldDescriptor;
use crate::schema::NodeStore;
use async_trait::async_trait;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a runtime directive sees of the field it wraps.
pub struct FieldContext<'a> {
    pub request: &'a RequestContext,
    pub operation_name: Option<&'a str>,
    pub field: &'a PreparedField,
    /// Canonical rendering of the sub-selections requested for `field`.
    pub selection_shape: String,
    pub definition: &'a FieldDescriptor,
    pub store: &'a NodeStore,
    pub config: &'a EngineConfig,
}

/// A directive applied to a schema field that acts at execution time.
///
/// `before` hooks run in declaration order before the field is resolved.
/// Returning `Ok(Some(value))` answers the field without resolving it and
/// skips the `after` hooks. `after` hooks see the produced value and may
/// replace it.
#[async_trait]
pub trait FieldDirective: Send + Sync {
    async fn before(
        &self,
        _ctx: &FieldContext<'_>,
        _invocation: &DirectiveAnnotation,
    ) -> Result<Option<Value>, ExecutionError> {
        Ok(None)
    }

    async fn after(
        &self,
        _ctx: &FieldContext<'_>,
        _invocation: &DirectiveAnnotation,
        _result: &Value,
    ) -> Result<Option<Value>, ExecutionError> {
        Ok(None)
    }
}

/// Runtime directive implementations by directive name.
#[derive(Clone, Default)]
pub struct RuntimeDirectives {
    directives: HashMap<String, Arc<dyn FieldDirective>>,
}

impl RuntimeDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    /// `@auth`, and `@cache` backed by `cache`.
    pub fn with_builtins(cache: Arc<TagCache>) -> Self {
        let mut registry = Self::new();
        registry.register("auth", AuthDirective);
        registry.register("cache", CacheDirective::new(cache));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, directive: impl FieldDirective + 'static) {
        self.directives.insert(name.into(), Arc::new(directive));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FieldDirective>> {
        self.directives.get(name)
    }

    /// The applications on `field` that have a runtime implementation, in
    /// declaration order.
    pub fn applied_to<'f>(
        &self,
        field: &'f FieldDescriptor,
    ) -> Vec<(&'f DirectiveAnnotation, Arc<dyn FieldDirective>)> {
        field
            .directives
            .iter()
            .filter_map(|d| self.directives.get(&d.name).map(|imp| (d, Arc::clone(imp))))
            .collect()
    }
}

impl fmt::Debug for RuntimeDirectives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.directives.keys().collect();
        names.sort();
        f.debug_tuple("RuntimeDirectives").field(&names).finish()
    }
}
