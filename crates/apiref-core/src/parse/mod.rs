pub mod raw;
pub mod ref_resolve;
pub mod source;

use serde_json::Value;

use crate::error::SourceError;

/// Parse an OpenAPI document from YAML into the raw tree.
pub fn from_yaml(input: &str) -> Result<Value, SourceError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse an OpenAPI document from JSON into the raw tree.
pub fn from_json(input: &str) -> Result<Value, SourceError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_keeps_document_order() {
        let doc = from_yaml(
            r#"
paths:
  /zebras: {}
  /apples: {}
  /mangos: {}
"#,
        )
        .unwrap();
        let keys: Vec<&String> = doc["paths"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["/zebras", "/apples", "/mangos"]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(from_yaml("a: [1, 2"), Err(SourceError::Yaml(_))));
        assert!(matches!(from_json("{\"a\":"), Err(SourceError::Json(_))));
    }
}
