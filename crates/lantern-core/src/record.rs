use indexmap::IndexMap;
use lantern_parser::Value;
use serde::Serialize;

/// Key under which a record's type name travels inside a [`Value`].
pub const TYPENAME_KEY: &str = "__typename";

/// One row of data: an optional runtime type name and ordered fields.
///
/// ```
/// # use lantern_core::Record;
/// let user = Record::typed("User").with("id", 1).with("name", "Ada");
/// assert_eq!(user.type_name(), Some("User"));
/// assert_eq!(user.get("name").and_then(|v| v.as_str()), Some("Ada"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "__typename", skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(flatten)]
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields: IndexMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = Some(type_name.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Reads an object value. A string `__typename` entry becomes the type
    /// name. Anything other than an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let type_name = match fields.shift_remove(TYPENAME_KEY) {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        Some(Self { type_name, fields })
    }

    /// The inverse of [`Record::from_value`].
    pub fn into_value(self) -> Value {
        let mut fields = self.fields;
        if let Some(type_name) = self.type_name {
            fields.insert(TYPENAME_KEY.to_string(), Value::String(type_name));
        }
        Value::Object(fields)
    }
}

impl From<IndexMap<String, Value>> for Record {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self {
            type_name: None,
            fields,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            type_name: None,
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}
