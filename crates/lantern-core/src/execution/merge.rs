//! Shaping fetched values to the requested selection.

use crate::error::ExecutionError;
use crate::error::ExecutionErrorKind;
use crate::execution::executor::Executor;
use crate::execution::value_check::serialize_leaf;
use crate::naming::snake_case;
use crate::operation::PreparedField;
use crate::operation::PreparedSelection;
use crate::record::Record;
use crate::relation::RelationLoader;
use crate::schema::NodeStore;
use crate::types::TypeRef;
use futures::FutureExt;
use futures::StreamExt;
use futures::TryStreamExt;
use futures::future::BoxFuture;
use futures::stream;
use indexmap::IndexMap;
use lantern_parser::Value;
use smallvec::SmallVec;
use smallvec::smallvec;

/// The selection sets that apply to one value. Several sets arise when the
/// same response key is selected more than once.
pub(crate) type SelectionSets<'p> = Vec<&'p [PreparedSelection]>;

/// Fields selected under one response key, first occurrence first.
pub(crate) type FieldGroup<'p> = SmallVec<[&'p PreparedField; 1]>;

/// Flattens `sets` into fields by response key. A fragment group applies
/// when `object_type` satisfies its type condition, or unconditionally when
/// the object type is unknown.
pub(crate) fn collect_fields<'p>(
    store: &NodeStore,
    sets: &[&'p [PreparedSelection]],
    object_type: Option<&str>,
) -> IndexMap<&'p str, FieldGroup<'p>> {
    let mut fields: IndexMap<&'p str, FieldGroup<'p>> = IndexMap::new();
    for set in sets {
        collect_into(store, set, object_type, &mut fields);
    }
    fields
}

fn collect_into<'p>(
    store: &NodeStore,
    selections: &'p [PreparedSelection],
    object_type: Option<&str>,
    fields: &mut IndexMap<&'p str, FieldGroup<'p>>,
) {
    for selection in selections {
        match selection {
            PreparedSelection::Field(field) => {
                fields
                    .entry(field.response_key.as_str())
                    .and_modify(|group| group.push(field))
                    .or_insert_with(|| smallvec![field]);
            },
            PreparedSelection::Group(group) => {
                let applies = match (&group.type_condition, object_type) {
                    (Some(condition), Some(object_type)) => store.satisfies(object_type, condition),
                    _ => true,
                };
                if applies {
                    collect_into(store, &group.selection, object_type, fields);
                }
            },
        }
    }
}

/// The selection sets of every field in a group.
pub(crate) fn group_selections<'p>(group: &FieldGroup<'p>) -> SelectionSets<'p> {
    group.iter().map(|field| field.selection.as_slice()).collect()
}

impl Executor<'_> {
    /// The sub-selections of the fields named `field_name` selected on
    /// `parent_type`.
    pub(crate) fn sub_selections<'p>(
        &self,
        sets: &SelectionSets<'p>,
        parent_type: &str,
        field_name: &str,
    ) -> SelectionSets<'p> {
        collect_fields(self.store, sets, Some(parent_type))
            .into_values()
            .flatten()
            .filter(|field| field.name == field_name)
            .map(|field| field.selection.as_slice())
            .collect()
    }

    /// Coerces `value` to `type_ref`, descending into the selection for
    /// composite types.
    pub(crate) fn complete_value<'a>(
        &'a self,
        value: Value,
        type_ref: &'a TypeRef,
        selections: SelectionSets<'a>,
        field: &'a PreparedField,
    ) -> BoxFuture<'a, Result<Value, ExecutionError>> {
        async move {
            match type_ref {
                TypeRef::NonNull(inner) => {
                    let completed = self.complete_value(value, inner, selections, field).await?;
                    if completed.is_null() {
                        return Err(ExecutionError::new(
                            ExecutionErrorKind::NonNull,
                            format!(
                                "field `{}` of non-null type `{type_ref}` resolved to null",
                                field.response_key,
                            ),
                        )
                        .at(&field.locations));
                    }
                    Ok(completed)
                },
                _ if value.is_null() => Ok(Value::Null),
                TypeRef::List(inner) => {
                    let Value::List(items) = value else {
                        return Err(ExecutionError::shape_mismatch(format!(
                            "field `{}` expects a list for type `{type_ref}`, got {value}",
                            field.response_key,
                        ))
                        .at(&field.locations));
                    };
                    let pending: Vec<BoxFuture<'_, Result<Value, ExecutionError>>> = items
                        .into_iter()
                        .map(|item| self.complete_value(item, inner, selections.clone(), field))
                        .collect();
                    let items: Vec<Value> = stream::iter(pending)
                        .buffered(self.config.max_concurrency.max(1))
                        .try_collect()
                        .await?;
                    Ok(Value::List(items))
                },
                TypeRef::Named(named) => match named.kind {
                    Some(kind) if kind.is_leaf() => serialize_leaf(self.store, &named.name, &value)
                        .map_err(|message| {
                            ExecutionError::shape_mismatch(format!(
                                "field `{}`: {message}",
                                field.response_key,
                            ))
                            .at(&field.locations)
                        }),
                    Some(kind) if kind.is_composite() => {
                        let record = Record::from_value(value).ok_or_else(|| {
                            ExecutionError::shape_mismatch(format!(
                                "field `{}` expects an object of type `{}`",
                                field.response_key, named.name,
                            ))
                            .at(&field.locations)
                        })?;
                        self.complete_object(record, &named.name, selections).await
                    },
                    _ => Err(ExecutionError::shape_mismatch(format!(
                        "type `{}` of field `{}` cannot be output",
                        named.name, field.response_key,
                    ))
                    .at(&field.locations)),
                },
            }
        }
        .boxed()
    }

    /// Builds the response object for `record`, resolving the requested
    /// fields concurrently.
    pub(crate) fn complete_object<'a>(
        &'a self,
        record: Record,
        static_type: &'a str,
        selections: SelectionSets<'a>,
    ) -> BoxFuture<'a, Result<Value, ExecutionError>> {
        async move {
            let runtime_type = match record.type_name() {
                Some(name) if self.store.object(name).is_some() => name.to_string(),
                _ => static_type.to_string(),
            };
            let object_type = match (record.type_name(), self.store.object(static_type)) {
                (Some(_), _) | (None, Some(_)) => Some(runtime_type.as_str()),
                (None, None) => None,
            };
            let fields = collect_fields(self.store, &selections, object_type);
            let record = &record;
            let runtime_type = runtime_type.as_str();
            let mut pending: Vec<BoxFuture<'_, Result<(String, Value), ExecutionError>>> =
                Vec::with_capacity(fields.len());
            for (key, group) in fields {
                pending.push(
                    async move {
                        let value = self
                            .resolve_field(record, runtime_type, static_type, &group)
                            .await?;
                        Ok((key.to_string(), value))
                    }
                    .boxed(),
                );
            }
            let entries: Vec<(String, Value)> = stream::iter(pending)
                .buffered(self.config.max_concurrency.max(1))
                .try_collect()
                .await?;
            Ok(Value::Object(entries.into_iter().collect()))
        }
        .boxed()
    }

    async fn resolve_field(
        &self,
        record: &Record,
        runtime_type: &str,
        static_type: &str,
        group: &FieldGroup<'_>,
    ) -> Result<Value, ExecutionError> {
        let field = group[0];
        if field.name == "__typename" {
            return Ok(Value::String(runtime_type.to_string()));
        }
        let definition = self
            .store
            .field(runtime_type, &field.name)
            .or_else(|| self.store.field(static_type, &field.name))
            .ok_or_else(|| {
                ExecutionError::not_found(format!(
                    "`{runtime_type}` has no field `{}`",
                    field.name
                ))
                .at(&field.locations)
            })?;

        let stored = record
            .get(&snake_case(&field.name))
            .or_else(|| record.get(&field.name))
            .cloned();
        let value = match (stored, &definition.relation) {
            (Some(value), _) => value,
            (None, Some(relation)) => RelationLoader {
                registry: self.registry,
                loaders: self.loaders,
                max_concurrency: self.config.max_concurrency,
            }
            .fetch(record, relation)
            .await
            .map_err(|err| err.at(&field.locations))?
            .into_value(),
            (None, None) => Value::Null,
        };
        self.complete_value(value, &definition.type_ref, group_selections(group), field)
            .await
    }
}
