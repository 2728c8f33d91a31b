//! Narrowing helpers over the untyped document tree.
//!
//! The raw document is kept as a [`serde_json::Value`]; every read site goes
//! through one of these helpers so its type assumption is explicit.

use serde_json::{Map, Value};

/// A JSON object node.
pub type RawObject = Map<String, Value>;

pub fn as_object(value: &Value) -> Option<&RawObject> {
    value.as_object()
}

pub fn as_array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array()
}

pub fn as_str(value: &Value) -> Option<&str> {
    value.as_str()
}

/// A string field, ignoring values of any other type.
pub fn str_field<'a>(object: &'a RawObject, key: &str) -> Option<&'a str> {
    object.get(key).and_then(as_str)
}

pub fn object_field<'a>(object: &'a RawObject, key: &str) -> Option<&'a RawObject> {
    object.get(key).and_then(as_object)
}

pub fn array_field<'a>(object: &'a RawObject, key: &str) -> Option<&'a Vec<Value>> {
    object.get(key).and_then(as_array)
}

/// `true` only for a literal boolean `true`.
pub fn flag_field(object: &RawObject, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// String entries of an array field; non-strings are dropped.
pub fn string_list(object: &RawObject, key: &str) -> Vec<String> {
    array_field(object, key)
        .map(|items| {
            items
                .iter()
                .filter_map(as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
