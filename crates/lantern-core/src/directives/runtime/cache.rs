use crate::directives::runtime::FieldContext;
use crate::directives::runtime::FieldDirective;
use crate::directives::string_list_argument;
use crate::error::ExecutionError;
use async_trait::async_trait;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    tags: Vec<String>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    by_tag: HashMap<String, HashSet<String>>,
}

impl CacheState {
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        for tag in &entry.tags {
            if let Some(keys) = self.by_tag.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.by_tag.remove(tag);
                }
            }
        }
        Some(entry)
    }
}

/// An in-memory value cache whose entries expire and can be dropped by
/// tag.
#[derive(Debug, Default)]
pub struct TagCache {
    state: Mutex<CacheState>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("tag cache lock was poisoned; continuing with its last state");
            poisoned.into_inner()
        })
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut state = self.lock();
        let expired = state.entries.get(key)?.expires_at <= Instant::now();
        if expired {
            state.remove(key);
            return None;
        }
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Duration, tags: Vec<String>) {
        let key = key.into();
        let mut state = self.lock();
        state.remove(&key);
        for tag in &tags {
            state
                .by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        state.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
                tags,
            },
        );
    }

    /// Drops every entry stored under `tag`, returning how many went.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut state = self.lock();
        let keys = state.by_tag.remove(tag).unwrap_or_default();
        keys.iter().filter(|key| state.remove(key).is_some()).count()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.by_tag.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `@cache(ttl:, tags:, auth:)`: answers repeated requests for a field
/// from a [`TagCache`].
///
/// `ttl` is in seconds. With `auth: true` the key and tags are scoped to
/// the requesting user. Entries are keyed by the requested sub-selection
/// too, so a hit always has the shape the request asked for.
#[derive(Debug)]
pub struct CacheDirective {
    cache: Arc<TagCache>,
}

impl CacheDirective {
    pub fn new(cache: Arc<TagCache>) -> Self {
        Self { cache }
    }

    fn user_scope<'c>(
        ctx: &'c FieldContext<'_>,
        invocation: &DirectiveAnnotation,
    ) -> Option<&'c str> {
        let auth = invocation
            .argument("auth")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if auth { ctx.request.user_id() } else { None }
    }

    pub(crate) fn key(ctx: &FieldContext<'_>, invocation: &DirectiveAnnotation) -> String {
        let mut key = String::new();
        if let Some(operation) = ctx.operation_name {
            key.push_str(operation);
            key.push(':');
        }
        if let Some(user) = Self::user_scope(ctx, invocation) {
            key.push_str(user);
            key.push(':');
        }
        key.push_str(&ctx.field.name);
        key.push(':');
        let mut arguments: Vec<String> = ctx
            .field
            .arguments
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect();
        arguments.sort();
        key.push_str(&arguments.join(","));
        key.push_str(&ctx.selection_shape);
        key
    }
}

#[async_trait]
impl FieldDirective for CacheDirective {
    async fn before(
        &self,
        ctx: &FieldContext<'_>,
        invocation: &DirectiveAnnotation,
    ) -> Result<Option<Value>, ExecutionError> {
        let key = Self::key(ctx, invocation);
        let hit = self.cache.get(&key);
        tracing::trace!(%key, hit = hit.is_some(), "cache lookup");
        Ok(hit)
    }

    async fn after(
        &self,
        ctx: &FieldContext<'_>,
        invocation: &DirectiveAnnotation,
        result: &Value,
    ) -> Result<Option<Value>, ExecutionError> {
        let ttl = invocation
            .argument("ttl")
            .and_then(Value::as_i64)
            .and_then(|secs| u64::try_from(secs).ok())
            .map(Duration::from_secs)
            .unwrap_or(ctx.config.cache_ttl);
        let user = Self::user_scope(ctx, invocation);
        let tags = string_list_argument(invocation, "tags")
            .into_iter()
            .map(|tag| match user {
                Some(user) => format!("{user}:{tag}"),
                None => tag,
            })
            .collect();
        self.cache
            .set(Self::key(ctx, invocation), result.clone(), ttl, tags);
        Ok(None)
    }
}
