//! `@find`, `@first` and `@paginate`: root fields answered by registered
//! fetch functions instead of a resolver.

use crate::error::ExecutionError;
use crate::error::ExecutionErrorKind;
use crate::execution::executor::Executor;
use crate::execution::filter::Filter;
use crate::execution::filter::filters_from_arguments;
use crate::execution::merge::SelectionSets;
use crate::execution::merge::collect_fields;
use crate::naming::snake_case;
use crate::record::Record;
use crate::registry::QuickVerb;
use crate::schema::FieldDescriptor;
use crate::directives::string_list_argument;
use crate::operation::PreparedField;
use indexmap::IndexMap;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;
use std::fmt;

/// What a quick fetch function is asked for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuickQuery {
    pub type_name: String,
    pub filters: Vec<Filter>,
    /// Snake-cased columns the query selects. Relation fields are not
    /// columns.
    pub columns: Vec<String>,
    /// Names of the scopes applied, in order.
    pub scopes: Vec<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub order_by: Option<OrderBy>,
}

impl QuickQuery {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Runs the query over in-memory records: filters, then order, then
    /// offset and limit.
    ///
    /// ```
    /// # use lantern_core::Record;
    /// # use lantern_core::execution::{Filter, QuickQuery};
    /// let rows = vec![
    ///     Record::new().with("id", 1).with("age", 30),
    ///     Record::new().with("id", 2).with("age", 17),
    /// ];
    /// let adults = QuickQuery::new("User")
    ///     .filter(Filter::new("age", lantern_core::execution::FilterOp::Gte, 18))
    ///     .apply(rows);
    /// assert_eq!(adults.len(), 1);
    /// ```
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        let mut rows: Vec<Record> = records
            .into_iter()
            .filter(|record| self.filters.iter().all(|f| f.matches(record)))
            .collect();
        if let Some(order) = &self.order_by {
            rows.sort_by(|a, b| {
                let ordering = compare_column(a.get(&order.column), b.get(&order.column));
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let rows = rows.into_iter().skip(offset);
        match self.limit {
            Some(limit) => rows.take(limit.max(0) as usize).collect(),
            None => rows.collect(),
        }
    }
}

fn compare_column(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Value::Int(x)), Some(Value::Int(y))) => x.cmp(y),
        (Some(x @ (Value::Int(_) | Value::Float(_))), Some(y @ (Value::Int(_) | Value::Float(_)))) => {
            x.as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal)
        },
        (Some(x), Some(y)) => match (x.as_str(), y.as_str()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Reads a `SortOrder` argument. Anything but `DESC` (or its code `-1`)
    /// sorts ascending.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Enum(name) | Value::String(name)) if name == "DESC" => SortDirection::Desc,
            Some(Value::Int(-1)) => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        })
    }
}

/// A validated page request.
///
/// ```
/// # use lantern_core::execution::Page;
/// let page = Page::new(3, 10).unwrap();
/// assert_eq!(page.offset(), 20);
/// let info = page.info(Some(25));
/// assert_eq!(info.total_page, Some(3));
/// assert_eq!(info.has_next_page, Some(false));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Page {
    pub page: i64,
    pub size: i64,
}

impl Page {
    pub fn new(page: i64, size: i64) -> Result<Self, ExecutionError> {
        if page < 1 {
            return Err(ExecutionError::operation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if size < 1 {
            return Err(ExecutionError::operation(format!(
                "size must be at least 1, got {size}"
            )));
        }
        Ok(Self { page, size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Page metadata; totals are only known when a count was fetched.
    pub fn info(&self, total_count: Option<i64>) -> PaginateInfo {
        let total_page = total_count
            .map(|total| total.div_euclid(self.size) + i64::from(total.rem_euclid(self.size) != 0));
        PaginateInfo {
            current_page: self.page,
            total_page,
            has_next_page: total_page.map(|pages| self.page < pages),
            total_count,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaginateInfo {
    pub current_page: i64,
    pub total_page: Option<i64>,
    pub has_next_page: Option<bool>,
    pub total_count: Option<i64>,
}

impl PaginateInfo {
    pub fn into_value(self) -> Value {
        let mut fields = IndexMap::new();
        fields.insert("currentPage".to_string(), Value::Int(self.current_page));
        fields.insert("totalPage".to_string(), self.total_page.into());
        fields.insert("hasNextPage".to_string(), self.has_next_page.into());
        fields.insert("totalCount".to_string(), self.total_count.into());
        Value::Object(fields)
    }
}

const COUNTED_INFO_FIELDS: [&str; 3] = ["totalCount", "totalPage", "hasNextPage"];

/// The quick directives a field can carry. Counting is only reached
/// through `@paginate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuickDirective {
    Find,
    First,
    Paginate,
}

impl QuickDirective {
    fn verb(self) -> QuickVerb {
        match self {
            QuickDirective::Find => QuickVerb::Find,
            QuickDirective::First => QuickVerb::First,
            QuickDirective::Paginate => QuickVerb::Paginate,
        }
    }
}

fn quick_directive(definition: &FieldDescriptor) -> Option<(QuickDirective, &DirectiveAnnotation)> {
    definition
        .directives
        .iter()
        .find_map(|d| match d.name.as_str() {
            "find" => Some((QuickDirective::Find, d)),
            "first" => Some((QuickDirective::First, d)),
            "paginate" => Some((QuickDirective::Paginate, d)),
            _ => None,
        })
}

fn missing(verb: QuickVerb, type_name: &str) -> ExecutionError {
    ExecutionError::new(
        ExecutionErrorKind::MissingQuickFunction,
        format!("no {verb} function is registered for type `{type_name}`"),
    )
}

impl Executor<'_> {
    /// Answers `field` through its quick directive. `None` when the field
    /// carries none.
    pub(crate) async fn run_quick<'s>(
        &self,
        field: &PreparedField,
        definition: &FieldDescriptor,
        selections: SelectionSets<'s>,
    ) -> Option<Result<Value, ExecutionError>> {
        let (kind, directive) = quick_directive(definition)?;
        Some(self.quick(kind, directive, field, definition, selections).await)
    }

    async fn quick<'s>(
        &self,
        kind: QuickDirective,
        directive: &DirectiveAnnotation,
        field: &PreparedField,
        definition: &FieldDescriptor,
        selections: SelectionSets<'s>,
    ) -> Result<Value, ExecutionError> {
        let target = match kind {
            QuickDirective::Paginate => self
                .store
                .field(definition.type_ref.name(), "data")
                .map(|data| data.type_ref.name().to_string())
                .ok_or_else(|| {
                    ExecutionError::shape_mismatch(format!(
                        "`{}` has no data field",
                        definition.type_ref.name()
                    ))
                })?,
            _ => definition.type_ref.name().to_string(),
        };

        let mut query = QuickQuery::new(target.clone());
        query.filters = filters_from_arguments(definition, &field.arguments);
        let row_selections = match kind {
            QuickDirective::Paginate => self.sub_selections(&selections, definition.type_ref.name(), "data"),
            _ => selections.clone(),
        };
        query.columns = self.requested_columns(&target, &row_selections);
        self.apply_scopes(&mut query, directive, &target)?;
        tracing::debug!(verb = %kind.verb(), type_name = %target, filters = query.filters.len(), "quick query");

        let value = match kind {
            QuickDirective::Find => {
                let find = self
                    .registry
                    .list(&target, QuickVerb::Find)
                    .ok_or_else(|| missing(QuickVerb::Find, &target))?;
                let rows = find(self.request.clone(), query).await?;
                Value::List(rows.into_iter().map(|row| typed(row, &target)).collect())
            },
            QuickDirective::First => {
                let first = self
                    .registry
                    .first(&target)
                    .ok_or_else(|| missing(QuickVerb::First, &target))?;
                match first(self.request.clone(), query).await? {
                    Some(row) => typed(row, &target),
                    None => Value::Null,
                }
            },
            QuickDirective::Paginate => self.paginate(directive, field, definition, query, &selections).await?,
        };
        self.complete_value(value, &definition.type_ref, selections, field)
            .await
    }

    async fn paginate(
        &self,
        directive: &DirectiveAnnotation,
        field: &PreparedField,
        definition: &FieldDescriptor,
        query: QuickQuery,
        selections: &SelectionSets<'_>,
    ) -> Result<Value, ExecutionError> {
        let page = Page::new(
            field.arguments.get("page").and_then(Value::as_i64).unwrap_or(1),
            field.arguments.get("size").and_then(Value::as_i64).unwrap_or(10),
        )?;
        let target = query.type_name.clone();
        let fetch = self
            .registry
            .list(&target, QuickVerb::Paginate)
            .ok_or_else(|| missing(QuickVerb::Paginate, &target))?;

        let info_selections = self.sub_selections(selections, definition.type_ref.name(), "paginateInfo");
        let needs_count = collect_fields(self.store, &info_selections, Some("PaginateInfo"))
            .values()
            .any(|group| COUNTED_INFO_FIELDS.contains(&group[0].name.as_str()));
        let total = if needs_count {
            let count = self
                .registry
                .count(&target)
                .ok_or_else(|| missing(QuickVerb::Count, &target))?;
            Some(count(self.request.clone(), query.clone()).await?)
        } else {
            None
        };

        let mut page_query = query;
        page_query.offset = Some(page.offset());
        page_query.limit = Some(page.limit());
        page_query.order_by = Some(OrderBy {
            column: directive
                .string_argument("sortBy")
                .map(snake_case)
                .unwrap_or_else(|| "id".to_string()),
            direction: SortDirection::from_value(field.arguments.get("sort")),
        });
        let rows = fetch(self.request.clone(), page_query).await?;

        let mut response = Record::typed(definition.type_ref.name());
        response.insert(
            "data",
            Value::List(rows.into_iter().map(|row| typed(row, &target)).collect()),
        );
        response.insert("paginateInfo", page.info(total).into_value());
        Ok(response.into_value())
    }

    fn apply_scopes(
        &self,
        query: &mut QuickQuery,
        directive: &DirectiveAnnotation,
        target: &str,
    ) -> Result<(), ExecutionError> {
        let mut names = string_list_argument(directive, "scopes");
        if let Some(object) = self.store.object(target) {
            names.extend(object.scopes.iter().cloned());
        }
        for name in names {
            let scope = self.registry.scope(&name).ok_or_else(|| {
                ExecutionError::not_found(format!("scope `{name}` is not registered"))
            })?;
            scope(query);
            query.scopes.push(name);
        }
        Ok(())
    }

    /// Snake-cased names of the non-relation fields selected on `type_name`.
    fn requested_columns(&self, type_name: &str, selections: &SelectionSets<'_>) -> Vec<String> {
        let mut columns = Vec::new();
        for group in collect_fields(self.store, selections, Some(type_name)).values() {
            let name = group[0].name.as_str();
            if name.starts_with("__") {
                continue;
            }
            let is_relation = self
                .store
                .field(type_name, name)
                .is_some_and(|def| def.relation.is_some());
            let column = snake_case(name);
            if !is_relation && !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }
}

fn typed(mut row: Record, type_name: &str) -> Value {
    if row.type_name().is_none() {
        row.set_type_name(type_name);
    }
    row.into_value()
}
