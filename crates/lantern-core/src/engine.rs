use crate::config::EngineConfig;
use crate::directives::DefinitionDirectives;
use crate::directives::ParentInfo;
use crate::directives::runtime::FieldDirective;
use crate::directives::runtime::RuntimeDirectives;
use crate::directives::runtime::TagCache;
use crate::error::ExecutionError;
use crate::error::FetchError;
use crate::error::GraphQLError;
use crate::error::SchemaLoadError;
use crate::error::ValidateError;
use crate::execution::Executor;
use crate::execution::QuickQuery;
use crate::execution::Request;
use crate::execution::RequestContext;
use crate::execution::ResolverContext;
use crate::execution::Response;
use crate::operation::prepare;
use crate::record::Record;
use crate::registry::Registry;
use crate::registry::TypeName;
use crate::relation::BatchRequest;
use crate::relation::LoaderPool;
use crate::scalar::ScalarRegistry;
use crate::scalar::ScalarType;
use crate::schema::FieldDescriptor;
use crate::schema::NodeStore;
use crate::schema::ObjectNode;
use crate::schema::StoreBuilder;
use lantern_parser::ParseError;
use lantern_parser::Source;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;
use lantern_parser::ast::ExecutableDocument;
use lantern_parser::ast::OperationKind;
use std::future::Future;
use std::sync::Arc;

/// A loaded schema together with the host functions that answer it.
///
/// Registration takes `&mut self`; execution takes `&self`, so a fully
/// configured engine can be shared behind an `Arc` and run requests
/// concurrently.
///
/// ```
/// # use lantern_core::{Engine, Request, RequestContext};
/// # use lantern_core::lantern_parser::ast::OperationKind;
/// # use lantern_core::lantern_parser::Value;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut engine = Engine::default();
/// engine.load_schema_str("type Query { hello: String }").unwrap();
/// engine.register_resolver(OperationKind::Query, "hello", |_| async {
///     Ok(Value::from("world"))
/// });
/// let response = engine
///     .execute(RequestContext::new(), Request::new("{ hello }"))
///     .await;
/// assert_eq!(response.get("hello"), Some(&Value::from("world")));
/// # }
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    registry: Registry,
    definition_directives: DefinitionDirectives,
    runtime_directives: RuntimeDirectives,
    scalars: ScalarRegistry,
    store: Option<Arc<NodeStore>>,
    loaders: LoaderPool,
    cache: Arc<TagCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = Arc::new(TagCache::new());
        Self {
            loaders: LoaderPool::new(config.dataloader.clone()),
            runtime_directives: RuntimeDirectives::with_builtins(Arc::clone(&cache)),
            definition_directives: DefinitionDirectives::with_builtins(),
            scalars: ScalarRegistry::with_builtins(),
            registry: Registry::new(),
            store: None,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parses, builds and validates a schema from `sources`, replacing any
    /// previously loaded schema. On error the previous schema stays.
    pub fn load_schema(&mut self, sources: &[Source]) -> Result<&NodeStore, SchemaLoadError> {
        let store = StoreBuilder::new(
            &self.definition_directives,
            &self.scalars,
            &self.config.root_types,
        )
        .load_sources(sources)?
        .build()?;
        tracing::info!(
            types = store.type_names().count(),
            sources = sources.len(),
            "schema loaded"
        );
        self.loaders.clear();
        self.cache.clear();
        let loaded: &NodeStore = self.store.insert(Arc::new(store));
        Ok(loaded)
    }

    pub fn load_schema_str(&mut self, sdl: &str) -> Result<&NodeStore, SchemaLoadError> {
        self.load_schema(&[Source::new(sdl)])
    }

    /// The current schema, if one loaded.
    pub fn store(&self) -> Option<&Arc<NodeStore>> {
        self.store.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// The store behind `@cache`, e.g. for tag invalidation after writes.
    pub fn cache(&self) -> &Arc<TagCache> {
        &self.cache
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
        self.registry.register_resolver(kind, field, resolver);
        self
    }

    pub fn register_find<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Record>, FetchError>> + Send + 'static,
    {
        self.registry.register_find(type_name, f);
        self
    }

    pub fn register_paginate<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Record>, FetchError>> + Send + 'static,
    {
        self.registry.register_paginate(type_name, f);
        self
    }

    pub fn register_first<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Record>, FetchError>> + Send + 'static,
    {
        self.registry.register_first(type_name, f);
        self
    }

    pub fn register_count<F, Fut>(&mut self, type_name: impl Into<TypeName>, f: F) -> &mut Self
    where
        F: Fn(Arc<RequestContext>, QuickQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<i64, FetchError>> + Send + 'static,
    {
        self.registry.register_count(type_name, f);
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
        self.registry.register_batch(type_name, key_field, f);
        self
    }

    pub fn register_scope<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut QuickQuery) + Send + Sync + 'static,
    {
        self.registry.register_scope(name, f);
        self
    }

    /// Takes effect for schemas loaded afterwards.
    pub fn register_scalar(&mut self, scalar: impl ScalarType + 'static) -> &mut Self {
        self.scalars.register(scalar);
        self
    }

    /// Registers a load-time field directive. Takes effect for schemas
    /// loaded afterwards.
    pub fn register_field_directive<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(
                &mut FieldDescriptor,
                &DirectiveAnnotation,
                &mut NodeStore,
                &ParentInfo<'_>,
            ) -> Result<(), ValidateError>
            + Send
            + Sync
            + 'static,
    {
        self.definition_directives.register_field(name, handler);
        self
    }

    /// Registers a load-time object directive. Takes effect for schemas
    /// loaded afterwards.
    pub fn register_object_directive<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut ObjectNode, &DirectiveAnnotation, &mut NodeStore) -> Result<(), ValidateError>
            + Send
            + Sync
            + 'static,
    {
        self.definition_directives.register_object(name, handler);
        self
    }

    pub fn register_runtime_directive(
        &mut self,
        name: impl Into<String>,
        directive: impl FieldDirective + 'static,
    ) -> &mut Self {
        self.runtime_directives.register(name, directive);
        self
    }

    /// Parses, prepares and runs `request`.
    ///
    /// Problems with the request itself come back as a response with no
    /// data; field failures come back next to the data that did resolve.
    pub async fn execute(&self, context: RequestContext, request: Request) -> Response {
        let Some(store) = self.store.as_deref() else {
            return Response::from_errors(vec![GraphQLError::new("no schema is loaded")]);
        };
        let parsed: Result<ExecutableDocument, Vec<ParseError>> =
            lantern_parser::parse_executable(&request.query).into();
        let document = match parsed {
            Ok(document) => document,
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "query failed to parse");
                return Response::from_errors(errors.iter().map(GraphQLError::from).collect());
            },
        };
        let operation = match prepare(
            store,
            &self.config.root_types,
            &document,
            request.operation_name.as_deref(),
            &request.variables,
        ) {
            Ok(operation) => operation,
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "operation rejected");
                return Response::from_errors(errors);
            },
        };
        tracing::debug!(
            kind = %operation.kind,
            name = operation.name.as_deref().unwrap_or("<anonymous>"),
            "executing operation"
        );
        Executor {
            store,
            registry: &self.registry,
            runtime: &self.runtime_directives,
            loaders: &self.loaders,
            config: &self.config,
            request: Arc::new(context),
            operation: &operation,
        }
        .run()
        .await
    }
}
