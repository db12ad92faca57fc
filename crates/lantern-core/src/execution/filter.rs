use crate::record::Record;
use crate::schema::FieldDescriptor;
use indexmap::IndexMap;
use lantern_parser::Value;
use std::cmp::Ordering;
use std::fmt;

/// Comparison of a filter. Each is also the name of the argument directive
/// that requests it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Like,
}

impl FilterOp {
    pub fn from_directive(name: &str) -> Option<Self> {
        Some(match name {
            "eq" => FilterOp::Eq,
            "neq" => FilterOp::Neq,
            "gt" => FilterOp::Gt,
            "gte" => FilterOp::Gte,
            "lt" => FilterOp::Lt,
            "lte" => FilterOp::Lte,
            "in" => FilterOp::In,
            "notIn" => FilterOp::NotIn,
            "like" => FilterOp::Like,
            _ => return None,
        })
    }

    /// The SQL spelling of the comparison.
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Neq => "!=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::In => "IN",
            FilterOp::NotIn => "NOT IN",
            FilterOp::Like => "LIKE",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One condition of a quick query: `column op value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    /// Evaluates the filter against an in-memory record. A record without
    /// the column never matches.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(&self.column) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => loosely_equal(actual, &self.value),
            FilterOp::Neq => !loosely_equal(actual, &self.value),
            FilterOp::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            FilterOp::Lte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::In => self
                .value
                .as_list()
                .is_some_and(|items| items.iter().any(|item| loosely_equal(actual, item))),
            FilterOp::NotIn => self
                .value
                .as_list()
                .is_some_and(|items| !items.iter().any(|item| loosely_equal(actual, item))),
            FilterOp::Like => match (actual.as_str(), self.value.as_str()) {
                (Some(text), Some(pattern)) => like(text, pattern),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)
    }
}

/// Builds one filter per declared argument that carries a filter directive
/// and was given a non-null value. The column is the directive's `field`
/// argument, or the argument name as declared.
pub fn filters_from_arguments(
    definition: &FieldDescriptor,
    arguments: &IndexMap<String, Value>,
) -> Vec<Filter> {
    let mut filters = Vec::new();
    for (name, argument) in &definition.arguments {
        let Some(value) = arguments.get(name).filter(|v| !v.is_null()) else {
            continue;
        };
        for directive in &argument.directives {
            let Some(op) = FilterOp::from_directive(&directive.name) else {
                continue;
            };
            let column = directive
                .string_argument("field")
                .unwrap_or(name)
                .to_string();
            filters.push(Filter::new(column, op, value.clone()));
        }
    }
    filters
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            compare(a, b) == Some(Ordering::Equal)
        },
        (Value::String(x) | Value::Enum(x), Value::String(y) | Value::Enum(y)) => x == y,
        // IDs arrive as strings but are usually stored as integers.
        (Value::Int(i), Value::String(s)) | (Value::String(s), Value::Int(i)) => {
            s.trim().parse::<i64>().is_ok_and(|parsed| parsed == *i)
        },
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}
