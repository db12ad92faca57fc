//! Tests for [`Value`](crate::Value).

use crate::Value;
use indexmap::IndexMap;
use serde_json::json;

fn sample() -> Value {
    let mut fields = IndexMap::new();
    fields.insert("name".to_string(), Value::from("Ann"));
    fields.insert("age".to_string(), Value::Int(31));
    fields.insert("score".to_string(), Value::Float(2.5));
    fields.insert("role".to_string(), Value::Enum("ADMIN".to_string()));
    fields.insert("tags".to_string(), Value::from(vec!["a", "b"]));
    fields.insert("manager".to_string(), Value::Null);
    Value::Object(fields)
}

#[test]
fn serializes_as_response_json() {
    let json = serde_json::to_value(sample()).expect("serializable");
    assert_eq!(
        json,
        json!({
            "name": "Ann",
            "age": 31,
            "score": 2.5,
            "role": "ADMIN",
            "tags": ["a", "b"],
            "manager": null,
        }),
    );
    assert_eq!(sample().to_json(), json);
}

#[test]
fn serialization_keeps_field_order() {
    let text = serde_json::to_string(&sample()).expect("serializable");
    let name = text.find("\"name\"").expect("name key");
    let manager = text.find("\"manager\"").expect("manager key");
    assert!(name < manager);
}

#[test]
fn non_finite_floats_serialize_as_null() {
    assert_eq!(serde_json::to_value(Value::Float(f64::NAN)).ok(), Some(json!(null)));
    assert_eq!(Value::Float(f64::INFINITY).to_json(), json!(null));
}

#[test]
fn converts_from_json() {
    let value = Value::from(json!({"id": 7, "ratio": 0.5, "ok": true, "list": [null]}));
    let object = value.as_object().expect("an object");
    assert_eq!(object["id"], Value::Int(7));
    assert_eq!(object["ratio"], Value::Float(0.5));
    assert_eq!(object["ok"].as_bool(), Some(true));
    assert_eq!(object["list"].as_list().map(<[Value]>::len), Some(1));
}

#[test]
fn displays_in_literal_syntax() {
    let mut fields = IndexMap::new();
    fields.insert("b".to_string(), Value::Enum("RED".to_string()));
    let value = Value::List(vec![
        Value::Int(1),
        Value::from("a"),
        Value::Float(1.0),
        Value::Object(fields),
        Value::Variable("v".to_string()),
    ]);
    assert_eq!(value.to_string(), r#"[1, "a", 1.0, {b: RED}, $v]"#);
}

#[test]
fn accessors() {
    assert_eq!(Value::Int(3).as_f64(), Some(3.0));
    assert_eq!(Value::Enum("X".to_string()).as_str(), Some("X"));
    assert_eq!(Value::from(Option::<i64>::None), Value::Null);
    assert!(Value::default().is_null());
    assert!(!Value::from(vec![1i64, 2]).contains_variables());
}
