use crate::config::RootTypes;
use crate::error::GraphQLError;
use crate::error::Location;
use crate::execution::value_check::coerce_input;
use crate::schema::FieldDescriptor;
use crate::schema::NodeCategory;
use crate::schema::NodeStore;
use crate::types::TypeRef;
use indexmap::IndexMap;
use lantern_parser::SourceSpan;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;
use lantern_parser::ast::ExecutableDocument;
use lantern_parser::ast::OperationDefinition;
use lantern_parser::ast::OperationKind;
use lantern_parser::ast::Selection;
use std::collections::HashSet;

/// An operation whose fields, arguments and fragments are known to fit the
/// schema.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedOperation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub root_type: String,
    pub selection: Vec<PreparedSelection>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PreparedSelection {
    Field(PreparedField),
    /// The selections of a fragment spread or inline fragment.
    Group(PreparedGroup),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreparedGroup {
    pub type_condition: Option<String>,
    pub selection: Vec<PreparedSelection>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreparedField {
    pub response_key: String,
    pub name: String,
    /// The type the field was selected on.
    pub parent_type: String,
    /// Arguments with variables substituted and defaults applied.
    pub arguments: IndexMap<String, Value>,
    pub selection: Vec<PreparedSelection>,
    pub locations: Vec<Location>,
}

impl PreparedSelection {
    /// Appends a canonical rendering of this selection to `out`: response
    /// keys, field names, arguments and type conditions, without
    /// whitespace or locations.
    pub fn write_shape(&self, out: &mut String) {
        match self {
            PreparedSelection::Field(field) => {
                out.push_str(&field.response_key);
                if field.response_key != field.name {
                    out.push(':');
                    out.push_str(&field.name);
                }
                if !field.arguments.is_empty() {
                    out.push('(');
                    for (i, (name, value)) in field.arguments.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        out.push_str(&format!("{name}:{value}"));
                    }
                    out.push(')');
                }
                write_set_shape(&field.selection, out);
            },
            PreparedSelection::Group(group) => {
                out.push_str("...");
                if let Some(condition) = &group.type_condition {
                    out.push_str("on ");
                    out.push_str(condition);
                }
                write_set_shape(&group.selection, out);
            },
        }
    }
}

fn write_set_shape(selections: &[PreparedSelection], out: &mut String) {
    if selections.is_empty() {
        return;
    }
    out.push('{');
    for (i, selection) in selections.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        selection.write_shape(out);
    }
    out.push('}');
}

/// The canonical rendering of every selection set in `sets`, in order.
pub fn selection_shape(sets: &[&[PreparedSelection]]) -> String {
    let mut out = String::new();
    for set in sets {
        write_set_shape(set, &mut out);
    }
    out
}

/// Selects the operation to run and checks it against `store`.
///
/// Every problem found is reported, not only the first.
pub fn prepare(
    store: &NodeStore,
    root_types: &RootTypes,
    document: &ExecutableDocument,
    operation_name: Option<&str>,
    variables: &IndexMap<String, Value>,
) -> Result<PreparedOperation, Vec<GraphQLError>> {
    let operation = select_operation(document, operation_name)?;
    let root_type = root_types.for_kind(operation.kind).to_string();
    if store.object(&root_type).is_none() {
        return Err(vec![
            GraphQLError::new(format!(
                "schema has no {} root type `{root_type}`",
                operation.kind
            ))
            .with_locations(vec![Location::from_span(&operation.span)]),
        ]);
    }

    let mut preparer = Preparer {
        store,
        document,
        query_root: &root_types.query,
        variables: IndexMap::new(),
        declared: HashSet::new(),
        rejected: HashSet::new(),
        fragment_stack: Vec::new(),
        errors: Vec::new(),
    };
    preparer.coerce_variables(operation, variables);
    let selection = preparer.selection_set(&operation.selection_set.selections, &root_type);
    if !preparer.errors.is_empty() {
        return Err(preparer.errors);
    }
    Ok(PreparedOperation {
        kind: operation.kind,
        name: operation.name.clone(),
        root_type,
        selection,
    })
}

fn select_operation<'d>(
    document: &'d ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<&'d OperationDefinition, Vec<GraphQLError>> {
    match operation_name {
        Some(name) => document
            .operations
            .iter()
            .find(|op| op.name.as_deref() == Some(name))
            .ok_or_else(|| vec![GraphQLError::new(format!("unknown operation `{name}`"))]),
        None => match document.operations.as_slice() {
            [operation] => Ok(operation),
            [] => Err(vec![GraphQLError::new("document contains no operation")]),
            _ => Err(vec![GraphQLError::new(
                "an operation name is required when the document contains several operations",
            )]),
        },
    }
}

/// Fills in the kinds of the named types inside `type_ref`. Returns false
/// when a name is unknown.
fn resolve_kinds(store: &NodeStore, type_ref: &mut TypeRef) -> bool {
    let named = type_ref.named_type_mut();
    named.kind = store.type_kind(&named.name);
    named.kind.is_some()
}

struct Preparer<'a> {
    store: &'a NodeStore,
    document: &'a ExecutableDocument,
    query_root: &'a str,
    variables: IndexMap<String, Value>,
    declared: HashSet<String>,
    /// Declared variables whose value was rejected and already reported.
    rejected: HashSet<String>,
    fragment_stack: Vec<String>,
    errors: Vec<GraphQLError>,
}

impl<'a> Preparer<'a> {
    fn error(&mut self, message: impl Into<String>, span: &SourceSpan) {
        self.errors
            .push(GraphQLError::new(message).with_locations(vec![Location::from_span(span)]));
    }

    fn coerce_variables(
        &mut self,
        operation: &OperationDefinition,
        provided: &IndexMap<String, Value>,
    ) {
        for definition in &operation.variable_definitions {
            let name = &definition.name;
            self.declared.insert(name.clone());
            self.rejected.insert(name.clone());
            let mut type_ref = TypeRef::from_annotation(&definition.type_annotation);
            if !resolve_kinds(self.store, &mut type_ref) {
                self.error(
                    format!("variable `${name}` has unknown type `{type_ref}`"),
                    &definition.span,
                );
                continue;
            }
            if !type_ref.named_kind().is_some_and(|kind| kind.is_input()) {
                self.error(
                    format!("variable `${name}` cannot have non-input type `{type_ref}`"),
                    &definition.span,
                );
                continue;
            }
            let value = match (provided.get(name), &definition.default_value) {
                (Some(value), _) => value,
                (None, Some(default)) => default,
                (None, None) if type_ref.is_non_null() => {
                    self.error(
                        format!("missing value for required variable `${name}` of type `{type_ref}`"),
                        &definition.span,
                    );
                    continue;
                },
                (None, None) => {
                    self.rejected.remove(name);
                    continue;
                },
            };
            match coerce_input(self.store, value, &type_ref) {
                Ok(coerced) => {
                    self.rejected.remove(name);
                    self.variables.insert(name.clone(), coerced);
                },
                Err(message) => self.error(format!("variable `${name}`: {message}"), &definition.span),
            }
        }
        if let Some(extra) = provided.keys().find(|name| !self.declared.contains(*name)) {
            tracing::debug!(variable = %extra, "ignoring undeclared variable");
        }
    }

    /// Replaces variable references. An absent nullable variable becomes
    /// null.
    fn substitute(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Variable(name) => {
                if !self.declared.contains(name) {
                    return Err(format!("variable `${name}` is not defined"));
                }
                Ok(self.variables.get(name).cloned().unwrap_or(Value::Null))
            },
            Value::List(items) => items
                .iter()
                .map(|item| self.substitute(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Object(fields) => fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), self.substitute(v)?)))
                .collect::<Result<IndexMap<_, _>, String>>()
                .map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    /// Evaluates `@skip` and `@include`.
    fn included(&mut self, directives: &[DirectiveAnnotation], span: &SourceSpan) -> bool {
        let mut included = true;
        for directive in directives {
            let skip_when = match directive.name.as_str() {
                "skip" => true,
                "include" => false,
                _ => continue,
            };
            let condition = directive
                .argument("if")
                .map(|value| self.substitute(value))
                .transpose();
            match condition {
                Ok(Some(Value::Boolean(flag))) => {
                    if flag == skip_when {
                        included = false;
                    }
                },
                Ok(_) => self.error(
                    format!("argument `if` of @{} must be a Boolean", directive.name),
                    span,
                ),
                Err(message) => self.error(message, span),
            }
        }
        included
    }

    fn selection_set(&mut self, selections: &[Selection], parent_type: &str) -> Vec<PreparedSelection> {
        let mut prepared = Vec::with_capacity(selections.len());
        for selection in selections {
            match selection {
                Selection::Field(field) => {
                    if !self.included(&field.directives, &field.span) {
                        continue;
                    }
                    if let Some(field) = self.field(field, parent_type) {
                        prepared.push(PreparedSelection::Field(field));
                    }
                },
                Selection::FragmentSpread(spread) => {
                    if !self.included(&spread.directives, &spread.span) {
                        continue;
                    }
                    let Some(fragment) = self.document.fragment(&spread.name) else {
                        self.error(format!("unknown fragment `{}`", spread.name), &spread.span);
                        continue;
                    };
                    if self.fragment_stack.contains(&spread.name) {
                        self.error(
                            format!("fragment `{}` spreads itself", spread.name),
                            &spread.span,
                        );
                        continue;
                    }
                    if !self.check_condition(&fragment.type_condition, &spread.span) {
                        continue;
                    }
                    self.fragment_stack.push(spread.name.clone());
                    let selection =
                        self.selection_set(&fragment.selection_set.selections, &fragment.type_condition);
                    self.fragment_stack.pop();
                    prepared.push(PreparedSelection::Group(PreparedGroup {
                        type_condition: Some(fragment.type_condition.clone()),
                        selection,
                    }));
                },
                Selection::InlineFragment(inline) => {
                    if !self.included(&inline.directives, &inline.span) {
                        continue;
                    }
                    if let Some(condition) = &inline.type_condition
                        && !self.check_condition(condition, &inline.span)
                    {
                        continue;
                    }
                    let scope = inline.type_condition.as_deref().unwrap_or(parent_type);
                    let selection = self.selection_set(&inline.selection_set.selections, scope);
                    prepared.push(PreparedSelection::Group(PreparedGroup {
                        type_condition: inline.type_condition.clone(),
                        selection,
                    }));
                },
            }
        }
        prepared
    }

    fn check_condition(&mut self, condition: &str, span: &SourceSpan) -> bool {
        match self.store.category(condition) {
            Some(NodeCategory::Object | NodeCategory::Interface | NodeCategory::Union) => true,
            Some(category) => {
                self.error(
                    format!("fragment cannot be conditioned on `{condition}`, which is {category}"),
                    span,
                );
                false
            },
            None => {
                self.error(format!("unknown type `{condition}` in type condition"), span);
                false
            },
        }
    }

    fn definition(&self, parent_type: &str, name: &str) -> Option<&'a FieldDescriptor> {
        match name {
            "__typename" => self.store.meta_field(name),
            "__schema" | "__type" if parent_type == self.query_root => self.store.meta_field(name),
            "__schema" | "__type" => None,
            _ => self
                .store
                .fields_of(parent_type)
                .and_then(|fields| fields.get(name)),
        }
    }

    fn field(
        &mut self,
        field: &lantern_parser::ast::Field,
        parent_type: &str,
    ) -> Option<PreparedField> {
        let Some(definition) = self.definition(parent_type, &field.name) else {
            self.error(
                format!("type `{parent_type}` has no field `{}`", field.name),
                &field.span,
            );
            return None;
        };
        let arguments = self.arguments(definition, field, parent_type);
        let type_name = definition.type_ref.name();
        let composite = definition
            .type_ref
            .named_kind()
            .is_some_and(|kind| kind.is_composite());
        let selection = match (&field.selection_set, composite) {
            (Some(set), true) => self.selection_set(&set.selections, type_name),
            (None, false) => Vec::new(),
            (Some(_), false) => {
                self.error(
                    format!(
                        "field `{}` of leaf type `{type_name}` cannot have a selection",
                        field.name
                    ),
                    &field.span,
                );
                return None;
            },
            (None, true) => {
                self.error(
                    format!(
                        "field `{}` of type `{type_name}` must have a selection",
                        field.name
                    ),
                    &field.span,
                );
                return None;
            },
        };
        Some(PreparedField {
            response_key: field.response_key().to_string(),
            name: field.name.clone(),
            parent_type: parent_type.to_string(),
            arguments,
            selection,
            locations: vec![Location::from_span(&field.span)],
        })
    }

    fn arguments(
        &mut self,
        definition: &FieldDescriptor,
        field: &lantern_parser::ast::Field,
        parent_type: &str,
    ) -> IndexMap<String, Value> {
        for name in field.arguments.keys() {
            if !definition.arguments.contains_key(name) {
                self.error(
                    format!("unknown argument `{name}` on field `{parent_type}.{}`", field.name),
                    &field.span,
                );
            }
        }
        let mut coerced = IndexMap::new();
        for (name, argument) in &definition.arguments {
            let provided = match field.arguments.get(name) {
                Some(Value::Variable(variable)) if self.rejected.contains(variable) => continue,
                Some(Value::Variable(variable))
                    if self.declared.contains(variable) && !self.variables.contains_key(variable) =>
                {
                    None
                },
                Some(value) => match self.substitute(value) {
                    Ok(value) => Some(value),
                    Err(message) => {
                        self.error(message, &field.span);
                        continue;
                    },
                },
                None => None,
            };
            match provided {
                Some(value) => match coerce_input(self.store, &value, &argument.type_ref) {
                    Ok(value) => {
                        coerced.insert(name.clone(), value);
                    },
                    Err(message) => self.error(
                        format!("argument `{name}` on field `{parent_type}.{}`: {message}", field.name),
                        &field.span,
                    ),
                },
                None => match &argument.default_value {
                    Some(default) => {
                        coerced.insert(name.clone(), default.clone());
                    },
                    None if argument.type_ref.is_non_null() => self.error(
                        format!(
                            "missing required argument `{name}` on field `{parent_type}.{}`",
                            field.name
                        ),
                        &field.span,
                    ),
                    None => {},
                },
            }
        }
        coerced
    }
}
