//! Loading the related records of a relation field through batched
//! dataloaders.

use crate::config::DataLoaderConfig;
use crate::dataloader::DataLoader;
use crate::error::ExecutionError;
use crate::error::ExecutionErrorKind;
use crate::execution::Filter;
use crate::naming::type_name_of;
use crate::record::Record;
use crate::registry::LoaderKey;
use crate::registry::Registry;
use crate::registry::TypeName;
use crate::schema::RelationDescriptor;
use crate::schema::RelationType;
use futures::StreamExt;
use futures::TryStreamExt;
use futures::stream;
use lantern_parser::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::PoisonError;

/// One call of a batch function: the rows of `type_name` whose `key_field`
/// is any of `keys`, restricted by `filters`.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchRequest {
    pub type_name: TypeName,
    pub key_field: String,
    pub keys: Vec<i64>,
    pub filters: Vec<Filter>,
}

pub type RecordLoader = DataLoader<i64, Vec<Record>>;

/// The dataloaders of an engine, created on first use and shared by every
/// request.
#[derive(Debug)]
pub struct LoaderPool {
    config: DataLoaderConfig,
    loaders: Mutex<HashMap<LoaderKey, RecordLoader>>,
}

impl LoaderPool {
    pub fn new(config: DataLoaderConfig) -> Self {
        Self {
            config,
            loaders: Mutex::new(HashMap::new()),
        }
    }

    /// The loader for `key`, created around the batch function registered
    /// for its type and key field.
    pub fn get_or_create(
        &self,
        key: &LoaderKey,
        registry: &Registry,
    ) -> Result<RecordLoader, ExecutionError> {
        let mut loaders = self.loaders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(loader) = loaders.get(key) {
            return Ok(loader.clone());
        }
        let batch = registry
            .batch(&key.type_name, &key.key_field)
            .cloned()
            .ok_or_else(|| {
                ExecutionError::new(
                    ExecutionErrorKind::RelationNotRegistered,
                    format!(
                        "no batch function is registered for `{}` by `{}`",
                        key.type_name, key.key_field,
                    ),
                )
            })?;
        let type_name = key.type_name.clone();
        let key_field = key.key_field.clone();
        let filters: Vec<Filter> = key
            .filters
            .iter()
            .map(|(column, value)| Filter::eq(column.clone(), value.as_str()))
            .collect();
        let loader = DataLoader::new(key.to_string(), self.config.clone(), move |keys| {
            batch(BatchRequest {
                type_name: type_name.clone(),
                key_field: key_field.clone(),
                keys,
                filters: filters.clone(),
            })
        });
        tracing::debug!(loader = %key, "created dataloader");
        loaders.insert(key.clone(), loader.clone());
        Ok(loader)
    }

    pub fn len(&self) -> usize {
        self.loaders.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached row of every loader.
    pub fn clear(&self) {
        for loader in self.loaders.lock().unwrap_or_else(PoisonError::into_inner).values() {
            loader.clear();
        }
    }
}

/// Reads a relation key. Integers, numeric strings and integral floats are
/// keys; anything else is not.
pub fn key_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::String(s) => s.trim().parse().ok(),
        Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
        _ => None,
    }
}

/// The related data of one record.
#[derive(Clone, Debug, PartialEq)]
pub enum Related {
    One(Option<Record>),
    Many(Vec<Record>),
}

impl Related {
    pub fn into_value(self) -> Value {
        match self {
            Related::One(record) => record.map(Record::into_value).unwrap_or(Value::Null),
            Related::Many(records) => {
                Value::List(records.into_iter().map(Record::into_value).collect())
            },
        }
    }
}

/// Resolves relation fields of records.
pub(crate) struct RelationLoader<'e> {
    pub registry: &'e Registry,
    pub loaders: &'e LoaderPool,
    pub max_concurrency: usize,
}

impl RelationLoader<'_> {
    /// Loads what `relation` relates `record` to. A missing batch function
    /// is reported against the relation.
    pub async fn fetch(
        &self,
        record: &Record,
        relation: &RelationDescriptor,
    ) -> Result<Related, ExecutionError> {
        self.fetch_related(record, relation).await.map_err(|err| {
            if err.kind == ExecutionErrorKind::RelationNotRegistered {
                ExecutionError::new(err.kind, format!("relation `{}`: {}", relation.name, err.message))
            } else {
                err
            }
        })
    }

    async fn fetch_related(
        &self,
        record: &Record,
        relation: &RelationDescriptor,
    ) -> Result<Related, ExecutionError> {
        tracing::trace!(
            relation = %relation.name,
            kind = %relation.relation_type,
            "loading relation"
        );
        match relation.relation_type {
            RelationType::BelongsTo => {
                let Some(key) = read_key(record, &relation.foreign_key)? else {
                    return Ok(Related::One(None));
                };
                let loader = self.loader(LoaderKey::new(
                    relation.target_type.as_str(),
                    relation.reference.as_str(),
                ))?;
                Ok(Related::One(first(loader.load(key).await?, &relation.target_type)))
            },
            RelationType::HasOne | RelationType::HasMany => {
                let Some(key) = read_key(record, &relation.reference)? else {
                    return Ok(empty(relation));
                };
                let loader = self.loader(LoaderKey::new(
                    relation.target_type.as_str(),
                    relation.foreign_key.as_str(),
                ))?;
                let rows = typed(loader.load(key).await?, &relation.target_type);
                Ok(match relation.relation_type {
                    RelationType::HasOne => Related::One(rows.into_iter().next()),
                    _ => Related::Many(rows),
                })
            },
            RelationType::MorphTo => {
                let morph_key = required(relation, relation.morph_key.as_deref(), "morph key")?;
                let morph_type = required(relation, relation.morph_type.as_deref(), "morph type")?;
                let Some(key) = read_key(record, morph_key)? else {
                    return Ok(Related::One(None));
                };
                let type_name = match record.get(morph_type) {
                    Some(Value::String(name) | Value::Enum(name)) => type_name_of(name),
                    Some(Value::Null) | None => return Ok(Related::One(None)),
                    Some(other) => {
                        return Err(ExecutionError::shape_mismatch(format!(
                            "morph type `{morph_type}` must be a string, got {other}"
                        )));
                    },
                };
                let loader = self.loader(LoaderKey::new(
                    type_name.as_str(),
                    relation.reference.as_str(),
                ))?;
                Ok(Related::One(first(loader.load(key).await?, &type_name)))
            },
            RelationType::MorphMany => {
                let morph_key = required(relation, relation.morph_key.as_deref(), "morph key")?;
                let morph_type = required(relation, relation.morph_type.as_deref(), "morph type")?;
                let current_type =
                    required(relation, relation.current_type.as_deref(), "current type")?;
                let Some(key) = read_key(record, &relation.reference)? else {
                    return Ok(Related::Many(Vec::new()));
                };
                let loader = self.loader(
                    LoaderKey::new(relation.target_type.as_str(), morph_key)
                        .with_filter(morph_type, current_type),
                )?;
                Ok(Related::Many(typed(loader.load(key).await?, &relation.target_type)))
            },
            RelationType::BelongsToMany => self.belongs_to_many(record, relation).await,
        }
    }

    async fn belongs_to_many(
        &self,
        record: &Record,
        relation: &RelationDescriptor,
    ) -> Result<Related, ExecutionError> {
        let pivot = required(relation, relation.pivot.as_deref(), "pivot")?;
        let pivot_foreign_key =
            required(relation, relation.pivot_foreign_key.as_deref(), "pivot foreign key")?;
        let pivot_reference =
            required(relation, relation.pivot_reference.as_deref(), "pivot reference")?;
        let relation_foreign_key = relation.relation_foreign_key.as_deref().unwrap_or("id");

        let Some(key) = read_key(record, &relation.foreign_key)? else {
            return Ok(Related::Many(Vec::new()));
        };
        let pivot_type = type_name_of(pivot);
        let pivots = self
            .loader(LoaderKey::new(pivot_type.as_str(), pivot_foreign_key))?
            .load(key)
            .await?;
        let mut target_keys = Vec::with_capacity(pivots.len());
        for row in &pivots {
            if let Some(key) = read_key(row, pivot_reference)? {
                target_keys.push(key);
            }
        }

        let targets = self.loader(LoaderKey::new(
            relation.target_type.as_str(),
            relation_foreign_key,
        ))?;
        let pending: Vec<_> = target_keys.into_iter().map(|key| targets.load(key)).collect();
        let related: Vec<Vec<Record>> = stream::iter(pending)
            .buffered(self.max_concurrency.max(1))
            .try_collect()
            .await?;
        Ok(Related::Many(
            related
                .into_iter()
                .filter_map(|rows| first(rows, &relation.target_type))
                .collect(),
        ))
    }

    fn loader(&self, key: LoaderKey) -> Result<RecordLoader, ExecutionError> {
        self.loaders.get_or_create(&key, self.registry)
    }
}

/// The key stored in `field`. A null key relates to nothing; a missing
/// field is an error.
fn read_key(record: &Record, field: &str) -> Result<Option<i64>, ExecutionError> {
    match record.get(field) {
        None => Err(ExecutionError::not_found(format!("field {field} not found"))),
        Some(Value::Null) => Ok(None),
        Some(value) => key_to_i64(value).map(Some).ok_or_else(|| {
            ExecutionError::shape_mismatch(format!(
                "field {field} holds {value}, which is not a valid relation key"
            ))
        }),
    }
}

fn required<'r>(
    relation: &RelationDescriptor,
    value: Option<&'r str>,
    what: &str,
) -> Result<&'r str, ExecutionError> {
    value.ok_or_else(|| {
        ExecutionError::shape_mismatch(format!(
            "{} relation `{}` has no {what}",
            relation.relation_type, relation.name,
        ))
    })
}

fn empty(relation: &RelationDescriptor) -> Related {
    match relation.relation_type {
        RelationType::HasOne | RelationType::BelongsTo | RelationType::MorphTo => {
            Related::One(None)
        },
        _ => Related::Many(Vec::new()),
    }
}

fn typed(rows: Vec<Record>, type_name: &str) -> Vec<Record> {
    rows.into_iter()
        .map(|mut row| {
            row.set_type_name(type_name);
            row
        })
        .collect()
}

fn first(rows: Vec<Record>, type_name: &str) -> Option<Record> {
    typed(rows, type_name).into_iter().next()
}
