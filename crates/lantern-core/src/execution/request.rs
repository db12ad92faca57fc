use indexmap::IndexMap;
use lantern_parser::Value;

/// A query document with the variables and operation name to run it with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Request {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: IndexMap<String, Value>,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: IndexMap<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Reads variables from a JSON object; anything else leaves them empty.
    pub fn json_variables(mut self, variables: serde_json::Value) -> Self {
        if let Value::Object(fields) = Value::from(variables) {
            self.variables = fields;
        }
        self
    }
}
