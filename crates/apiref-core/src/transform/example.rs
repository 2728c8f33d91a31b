//! Representative sample values for schema nodes.
//!
//! Synthesis is best effort and total: unresolvable references, cycles and
//! malformed schemas degrade to `None` or an empty string, never an error.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::parse::raw::{RawObject, array_field, as_object, object_field, str_field};
use crate::parse::ref_resolve::RefResolver;

/// Placeholder used for a required parameter whose schema yields no sample.
pub const REQUIRED_PLACEHOLDER: &str = "required-value";

/// Synthesize a sample value for `schema`.
///
/// `visited` holds the `$ref` strings already followed on the current branch.
/// It is never mutated: following a reference extends a copy, so sibling
/// branches (object properties, `allOf` members) each see only their own
/// ancestry.
pub fn synthesize(
    schema: &Value,
    resolver: &RefResolver<'_>,
    visited: &HashSet<String>,
) -> Option<Value> {
    synthesize_object(as_object(schema)?, resolver, visited)
}

fn synthesize_object(
    schema: &RawObject,
    resolver: &RefResolver<'_>,
    visited: &HashSet<String>,
) -> Option<Value> {
    if let Some(example) = schema.get("example") {
        return Some(example.clone());
    }
    if let Some(default) = schema.get("default") {
        return Some(default.clone());
    }
    if let Some(first) = array_field(schema, "enum").and_then(|values| values.first()) {
        return Some(first.clone());
    }

    if let Some(reference) = str_field(schema, "$ref") {
        if visited.contains(reference) {
            return None;
        }
        // An unresolvable ref falls through to the remaining rules.
        if let Some(target) = resolver.resolve(reference) {
            let mut branch = visited.clone();
            branch.insert(reference.to_string());
            return synthesize_object(target, resolver, &branch);
        }
    }

    if let Some(members) = array_field(schema, "allOf") {
        let merged = members.iter().fold(Value::Object(Map::new()), |acc, member| {
            merge_fragment(acc, synthesize(member, resolver, visited))
        });
        return Some(merged);
    }

    match schema_type(schema) {
        Some("object") => Some(object_sample(schema, resolver, visited)),
        Some("array") => Some(array_sample(schema, resolver, visited)),
        Some("boolean") => Some(Value::Bool(true)),
        Some("integer") | Some("number") => Some(Value::from(0)),
        _ => Some(Value::String(String::new())),
    }
}

/// The effective type: `properties` implies an object and `items` an array.
///
/// For a type list such as `["string", "null"]` the first non-null entry wins.
fn schema_type(schema: &RawObject) -> Option<&str> {
    let declared = match schema.get("type") {
        Some(Value::String(name)) => Some(name.as_str()),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null"),
        _ => None,
    };
    if declared == Some("object") || schema.contains_key("properties") {
        Some("object")
    } else if declared == Some("array") || schema.contains_key("items") {
        Some("array")
    } else {
        declared
    }
}

fn object_sample(
    schema: &RawObject,
    resolver: &RefResolver<'_>,
    visited: &HashSet<String>,
) -> Value {
    let mut result = Map::new();
    if let Some(properties) = object_field(schema, "properties") {
        for (name, property) in properties {
            let sample = synthesize(property, resolver, visited)
                .unwrap_or_else(|| Value::String(String::new()));
            result.insert(name.clone(), sample);
        }
    }
    Value::Object(result)
}

fn array_sample(schema: &RawObject, resolver: &RefResolver<'_>, visited: &HashSet<String>) -> Value {
    let item = schema
        .get("items")
        .and_then(|items| synthesize(items, resolver, visited));
    Value::Array(item.into_iter().collect())
}

/// Shallow-merge one `allOf` member's sample into the accumulator.
fn merge_fragment(acc: Value, sample: Option<Value>) -> Value {
    match (acc, sample) {
        (Value::Object(mut merged), Some(Value::Object(fragment))) => {
            merged.extend(fragment);
            Value::Object(merged)
        }
        (_, Some(sample)) if !sample.is_null() => sample,
        (acc, _) => acc,
    }
}

/// Render a parameter's sample as the string shown in the request form.
pub fn parameter_sample(
    schema: Option<&Value>,
    resolver: &RefResolver<'_>,
    required: bool,
) -> String {
    let value = schema.and_then(|schema| synthesize(schema, resolver, &HashSet::new()));
    match value {
        None | Some(Value::Null) if required => REQUIRED_PLACEHOLDER.to_string(),
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => serde_json::to_string(&other).unwrap_or_default(),
    }
}

/// Synthesize a request body sample as pretty-printed JSON.
pub fn body_sample(schema: &Value, resolver: &RefResolver<'_>) -> Option<String> {
    let value = synthesize(schema, resolver, &HashSet::new())?;
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(doc: &Value, schema: Value) -> Option<Value> {
        synthesize(&schema, &RefResolver::new(doc), &HashSet::new())
    }

    #[test]
    fn test_literal_priorities() {
        let doc = json!({});
        assert_eq!(
            sample(&doc, json!({ "type": "string", "example": "rose", "default": "x", "enum": ["y"] })),
            Some(json!("rose"))
        );
        assert_eq!(
            sample(&doc, json!({ "type": "string", "default": "x", "enum": ["y"] })),
            Some(json!("x"))
        );
        assert_eq!(
            sample(&doc, json!({ "type": "string", "enum": ["y", "z"] })),
            Some(json!("y"))
        );
        assert_eq!(sample(&doc, json!({ "example": null })), Some(Value::Null));
        assert_eq!(sample(&doc, json!({ "type": "string", "enum": [] })), Some(json!("")));
    }

    #[test]
    fn test_types() {
        let doc = json!({});
        assert_eq!(sample(&doc, json!({ "type": "boolean" })), Some(json!(true)));
        assert_eq!(sample(&doc, json!({ "type": "integer" })), Some(json!(0)));
        assert_eq!(sample(&doc, json!({ "type": "number" })), Some(json!(0)));
        assert_eq!(sample(&doc, json!({ "type": "string" })), Some(json!("")));
        assert_eq!(sample(&doc, json!({})), Some(json!("")));
        assert_eq!(sample(&doc, json!({ "type": ["null", "integer"] })), Some(json!(0)));
        assert_eq!(sample(&doc, json!("not a schema")), None);
    }

    #[test]
    fn test_object_and_array() {
        let doc = json!({});
        let schema = json!({
            "properties": {
                "name": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string", "example": "green" } },
                "sizes": { "items": { "type": "integer" } },
                "empty": { "type": "array" },
                "broken": 42,
            }
        });
        assert_eq!(
            sample(&doc, schema),
            Some(json!({
                "name": "",
                "tags": ["green"],
                "sizes": [0],
                "empty": [],
                "broken": "",
            }))
        );
    }

    #[test]
    fn test_refs_and_all_of() {
        let doc = json!({
            "components": { "schemas": {
                "Plant": {
                    "type": "object",
                    "properties": { "name": { "type": "string" }, "tag": { "type": "string" } }
                },
                "NewPlant": {
                    "allOf": [
                        { "$ref": "#/components/schemas/Plant" },
                        { "type": "object", "properties": { "id": { "type": "integer" } } }
                    ]
                }
            }}
        });
        assert_eq!(
            sample(&doc, json!({ "$ref": "#/components/schemas/NewPlant" })),
            Some(json!({ "name": "", "tag": "", "id": 0 }))
        );
    }

    #[test]
    fn test_all_of_later_member_wins() {
        let doc = json!({});
        assert_eq!(
            sample(&doc, json!({ "allOf": [
                { "properties": { "a": { "example": 1 }, "b": { "example": 1 } } },
                { "properties": { "b": { "example": 2 } } }
            ]})),
            Some(json!({ "a": 1, "b": 2 }))
        );
        assert_eq!(
            sample(&doc, json!({ "allOf": [
                { "type": "array", "items": { "type": "integer" } },
                { "type": "string", "example": "last" }
            ]})),
            Some(json!("last"))
        );
        assert_eq!(sample(&doc, json!({ "allOf": [] })), Some(json!({})));
        assert_eq!(
            sample(&doc, json!({ "allOf": [
                { "properties": { "a": { "example": 1 } } },
                { "example": null }
            ]})),
            Some(json!({ "a": 1 }))
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let doc = json!({
            "components": { "schemas": { "Node": {
                "type": "object",
                "properties": {
                    "value": { "type": "integer" },
                    "next": { "$ref": "#/components/schemas/Node" },
                    "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
                }
            }}}
        });
        assert_eq!(
            sample(&doc, json!({ "$ref": "#/components/schemas/Node" })),
            Some(json!({ "value": 0, "next": "", "children": [] }))
        );
    }

    #[test]
    fn test_sibling_branches_have_independent_visited_sets() {
        let doc = json!({
            "components": { "schemas": {
                "Pot": { "type": "object", "properties": { "size": { "type": "integer" } } },
                "Cycle": { "allOf": [
                    { "$ref": "#/components/schemas/Cycle" },
                    { "properties": { "depth": { "example": 3 } } }
                ]}
            }}
        });
        assert_eq!(
            sample(&doc, json!({ "properties": {
                "indoor": { "$ref": "#/components/schemas/Pot" },
                "outdoor": { "$ref": "#/components/schemas/Pot" }
            }})),
            Some(json!({ "indoor": { "size": 0 }, "outdoor": { "size": 0 } }))
        );
        assert_eq!(
            sample(&doc, json!({ "$ref": "#/components/schemas/Cycle" })),
            Some(json!({ "depth": 3 }))
        );
    }

    #[test]
    fn test_unresolvable_ref_degrades() {
        let doc = json!({});
        assert_eq!(
            sample(&doc, json!({ "$ref": "#/components/schemas/Missing" })),
            Some(json!(""))
        );
        assert_eq!(
            sample(&doc, json!({ "$ref": "external.yaml#/Plant", "type": "integer" })),
            Some(json!(0))
        );
    }

    #[test]
    fn test_parameter_sample() {
        let doc = json!({});
        let resolver = RefResolver::new(&doc);
        assert_eq!(parameter_sample(Some(&json!({ "type": "integer" })), &resolver, false), "0");
        assert_eq!(parameter_sample(Some(&json!({ "type": "boolean" })), &resolver, false), "true");
        assert_eq!(
            parameter_sample(Some(&json!({ "type": "string", "example": "fern" })), &resolver, true),
            "fern"
        );
        assert_eq!(
            parameter_sample(Some(&json!({ "type": "array", "items": { "type": "integer" } })), &resolver, false),
            "[0]"
        );
        assert_eq!(parameter_sample(None, &resolver, true), REQUIRED_PLACEHOLDER);
        assert_eq!(parameter_sample(None, &resolver, false), "");
        assert_eq!(
            parameter_sample(Some(&json!({ "default": null })), &resolver, true),
            REQUIRED_PLACEHOLDER
        );
    }

    #[test]
    fn test_body_sample_is_pretty_printed() {
        let doc = json!({});
        let body = body_sample(
            &json!({ "properties": { "name": { "example": "Fern" }, "id": { "type": "integer" } } }),
            &RefResolver::new(&doc),
        )
        .unwrap();
        assert_eq!(body, "{\n  \"name\": \"Fern\",\n  \"id\": 0\n}");
    }
}
