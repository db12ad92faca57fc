//! Coercion rules for scalar types.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use lantern_parser::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Input and output coercion for one scalar type.
///
/// Errors are plain messages; the caller adds the field or argument they
/// concern.
pub trait ScalarType: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Coerces a variable or argument value.
    fn parse_value(&self, value: &Value) -> Result<Value, String>;

    /// Coerces a literal written in a document. Literals and variables share
    /// one value model, so this is `parse_value` unless a scalar needs to
    /// tell them apart.
    fn parse_literal(&self, value: &Value) -> Result<Value, String> {
        self.parse_value(value)
    }

    /// Coerces a value produced by a resolver or fetch function for output.
    fn serialize(&self, value: &Value) -> Result<Value, String>;
}

fn expected(scalar: &str, value: &Value) -> String {
    format!("{scalar} cannot represent value {value}")
}

#[derive(Debug)]
pub struct IdScalar;

impl ScalarType for IdScalar {
    fn name(&self) -> &str {
        "ID"
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(_) => Ok(value.clone()),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            _ => Err(expected("ID", value)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        self.parse_value(value)
    }
}

#[derive(Debug)]
pub struct StringScalar;

impl ScalarType for StringScalar {
    fn name(&self) -> &str {
        "String"
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(expected("String", value)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(_) => Ok(value.clone()),
            Value::Enum(s) => Ok(Value::String(s.clone())),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            Value::Float(f) => Ok(Value::String(f.to_string())),
            Value::Boolean(b) => Ok(Value::String(b.to_string())),
            _ => Err(expected("String", value)),
        }
    }
}

#[derive(Debug)]
pub struct IntScalar;

impl ScalarType for IntScalar {
    fn name(&self) -> &str {
        "Int"
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Int(_) => Ok(value.clone()),
            _ => Err(expected("Int", value)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Int(_) => Ok(value.clone()),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Value::Int(*f as i64)),
            Value::Boolean(b) => Ok(Value::Int(i64::from(*b))),
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| expected("Int", value)),
            _ => Err(expected("Int", value)),
        }
    }
}

#[derive(Debug)]
pub struct FloatScalar;

impl ScalarType for FloatScalar {
    fn name(&self) -> &str {
        "Float"
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Float(_) => Ok(value.clone()),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            _ => Err(expected("Float", value)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(s) => s
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| expected("Float", value)),
            _ => self.parse_value(value),
        }
    }
}

#[derive(Debug)]
pub struct BooleanScalar;

impl ScalarType for BooleanScalar {
    fn name(&self) -> &str {
        "Boolean"
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Boolean(_) => Ok(value.clone()),
            _ => Err(expected("Boolean", value)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Int(i) => Ok(Value::Boolean(*i != 0)),
            _ => self.parse_value(value),
        }
    }
}

/// RFC 3339 timestamps, normalized to UTC. Integers are read as Unix
/// seconds.
#[derive(Debug)]
pub struct DateTimeScalar;

impl DateTimeScalar {
    fn coerce(&self, value: &Value) -> Result<Value, String> {
        let parsed: DateTime<Utc> = match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map_err(|e| format!("DateTime cannot represent {value}: {e}"))?
                .with_timezone(&Utc),
            Value::Int(secs) => {
                DateTime::from_timestamp(*secs, 0).ok_or_else(|| expected("DateTime", value))?
            },
            _ => return Err(expected("DateTime", value)),
        };
        Ok(Value::String(parsed.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }
}

impl ScalarType for DateTimeScalar {
    fn name(&self) -> &str {
        "DateTime"
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        self.coerce(value)
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        self.coerce(value)
    }
}

/// Scalar behaviors by type name.
#[derive(Clone, Debug)]
pub struct ScalarRegistry {
    scalars: HashMap<String, Arc<dyn ScalarType>>,
}

impl ScalarRegistry {
    /// A registry holding the built-in `ID`, `String`, `Int`, `Float`,
    /// `Boolean` and `DateTime` behaviors.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            scalars: HashMap::new(),
        };
        registry.register(IdScalar);
        registry.register(StringScalar);
        registry.register(IntScalar);
        registry.register(FloatScalar);
        registry.register(BooleanScalar);
        registry.register(DateTimeScalar);
        registry
    }

    /// Registers `scalar` under its own name, replacing any earlier
    /// behavior.
    pub fn register(&mut self, scalar: impl ScalarType + 'static) {
        self.scalars
            .insert(scalar.name().to_string(), Arc::new(scalar));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ScalarType>> {
        self.scalars.get(name).cloned()
    }
}

impl Default for ScalarRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
