use crate::config::EngineConfig;
use crate::directives::runtime::FieldContext;
use crate::directives::runtime::RuntimeDirectives;
use crate::error::ExecutionError;
use crate::error::GraphQLError;
use crate::execution::RequestContext;
use crate::execution::ResolverContext;
use crate::execution::Response;
use crate::execution::introspection::Introspector;
use crate::execution::merge::FieldGroup;
use crate::execution::merge::SelectionSets;
use crate::execution::merge::collect_fields;
use crate::execution::merge::group_selections;
use crate::operation::PreparedField;
use crate::operation::PreparedOperation;
use crate::operation::selection_shape;
use crate::registry::Registry;
use crate::relation::LoaderPool;
use crate::schema::FieldDescriptor;
use crate::schema::NodeStore;
use futures::FutureExt;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream;
use indexmap::IndexMap;
use lantern_parser::Value;
use std::sync::Arc;

type RootResult<'p> = (&'p str, FieldGroup<'p>, Result<Value, ExecutionError>);

/// Everything one operation executes against.
pub(crate) struct Executor<'e> {
    pub store: &'e NodeStore,
    pub registry: &'e Registry,
    pub runtime: &'e RuntimeDirectives,
    pub loaders: &'e LoaderPool,
    pub config: &'e EngineConfig,
    pub request: Arc<RequestContext>,
    pub operation: &'e PreparedOperation,
}

impl Executor<'_> {
    /// Resolves every root field concurrently and assembles the response.
    ///
    /// A failed nullable root field becomes null with an error; a failed
    /// non-null root field nulls the whole `data`.
    pub async fn run(&self) -> Response {
        let operation = self.operation;
        let sets: SelectionSets<'_> = vec![operation.selection.as_slice()];
        let fields = collect_fields(self.store, &sets, Some(&operation.root_type));
        let mut pending: Vec<BoxFuture<'_, RootResult<'_>>> = Vec::with_capacity(fields.len());
        for (key, group) in fields {
            pending.push(
                async move {
                    let result = self.root_field(&group).await;
                    (key, group, result)
                }
                .boxed(),
            );
        }
        let results: Vec<RootResult<'_>> = stream::iter(pending)
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut data = IndexMap::with_capacity(results.len());
        let mut errors: Vec<GraphQLError> = Vec::new();
        let mut data_lost = false;
        for (key, group, result) in results {
            match result {
                Ok(value) => {
                    data.insert(key.to_string(), value);
                },
                Err(err) => {
                    let field = group[0];
                    tracing::debug!(field = %field.name, error = %err, "root field failed");
                    let non_null = self
                        .store
                        .field(&operation.root_type, &field.name)
                        .is_some_and(|def| def.type_ref.is_non_null());
                    data_lost |= non_null;
                    errors.push(
                        err.at(&field.locations)
                            .to_graphql_error()
                            .with_path(vec![key.to_string()]),
                    );
                    data.insert(key.to_string(), Value::Null);
                },
            }
        }
        Response {
            data: (!data_lost).then_some(data),
            errors,
        }
    }

    async fn root_field(&self, group: &FieldGroup<'_>) -> Result<Value, ExecutionError> {
        let field = group[0];
        let root_type = self.operation.root_type.as_str();
        if field.name == "__typename" {
            return Ok(Value::String(root_type.to_string()));
        }
        let definition = self.store.field(root_type, &field.name).ok_or_else(|| {
            ExecutionError::not_found(format!(
                "{} {} not found",
                self.operation.kind, field.name
            ))
        })?;

        let selections = group_selections(group);
        let ctx = FieldContext {
            request: &self.request,
            operation_name: self.operation.name.as_deref(),
            field,
            selection_shape: selection_shape(&selections),
            definition,
            store: self.store,
            config: self.config,
        };
        let hooks = self.runtime.applied_to(definition);
        for (invocation, directive) in &hooks {
            if let Some(value) = directive.before(&ctx, invocation).await? {
                tracing::trace!(field = %field.name, directive = %invocation.name, "answered by directive");
                return Ok(value);
            }
        }

        let mut value = self.produce(field, definition, selections).await?;

        for (invocation, directive) in &hooks {
            if let Some(replacement) = directive.after(&ctx, invocation, &value).await? {
                value = replacement;
            }
        }
        Ok(value)
    }

    /// Resolver first, then quick directive, then introspection.
    async fn produce(
        &self,
        field: &PreparedField,
        definition: &FieldDescriptor,
        selections: SelectionSets<'_>,
    ) -> Result<Value, ExecutionError> {
        if let Some(resolver) = self.registry.resolver(self.operation.kind, &field.name) {
            let value = resolver(ResolverContext {
                request: Arc::clone(&self.request),
                field_name: field.name.clone(),
                arguments: field.arguments.clone(),
            })
            .await?;
            return self
                .complete_value(value, &definition.type_ref, selections, field)
                .await;
        }
        if let Some(result) = self.run_quick(field, definition, selections.clone()).await {
            return result;
        }
        let introspector = Introspector::new(self.store, &self.config.root_types);
        match field.name.as_str() {
            "__schema" => introspector.schema(&selections),
            "__type" => {
                let name = field
                    .arguments
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                introspector.named_type(name, &selections)
            },
            _ => Err(ExecutionError::not_found(format!(
                "{} {} not found",
                self.operation.kind, field.name
            ))),
        }
    }
}
