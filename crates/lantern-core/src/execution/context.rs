use indexmap::IndexMap;
use lantern_parser::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-request state handed to resolvers, quick functions and runtime
/// directives.
///
/// ```
/// # use lantern_core::RequestContext;
/// let ctx = RequestContext::new().with_user("42").with_value("locale", "en");
/// assert_eq!(ctx.user_id(), Some("42"));
/// assert_eq!(ctx.value("locale").and_then(|v| v.as_str()), Some("en"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    user_id: Option<String>,
    values: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// The authenticated user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }
}

/// What a custom resolver receives.
#[derive(Clone, Debug)]
pub struct ResolverContext {
    pub request: Arc<RequestContext>,
    pub field_name: String,
    /// Coerced arguments, with variables substituted and defaults applied.
    pub arguments: IndexMap<String, Value>,
}

impl ResolverContext {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}
