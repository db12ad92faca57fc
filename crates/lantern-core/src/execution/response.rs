use crate::error::GraphQLError;
use indexmap::IndexMap;
use lantern_parser::Value;
use serde::Serialize;

/// The result of executing one request.
///
/// `data` is `None` when the operation could not run at all, or when a
/// non-null root field failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Response {
    pub data: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl Response {
    pub fn from_errors(errors: Vec<GraphQLError>) -> Self {
        Self { data: None, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Looks up a root response key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
