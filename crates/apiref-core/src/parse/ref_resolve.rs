use std::borrow::Cow;
use std::collections::HashSet;

use serde_json::Value;

use super::raw::{RawObject, str_field};

/// Resolves local JSON-Pointer references (`#/a/b/c`) against a document.
///
/// Resolution never fails loudly: external refs, malformed pointers and
/// missing targets all yield `None`.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    document: &'a Value,
}

impl<'a> RefResolver<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    /// Walk the document to the node addressed by `reference`.
    ///
    /// Only object targets count as resolved.
    pub fn resolve(&self, reference: &str) -> Option<&'a RawObject> {
        let pointer = reference.strip_prefix("#/")?;
        let mut current = self.document;
        for token in pointer.split('/') {
            let token = unescape_token(token);
            current = match current {
                Value::Object(map) => map.get(token.as_ref())?,
                Value::Array(items) => items.get(token.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        current.as_object()
    }

    /// Follow a chain of `$ref` objects until a concrete object is reached.
    ///
    /// Returns `None` for an unresolvable link or a reference cycle. Objects
    /// without `$ref` are returned unchanged.
    pub fn follow(&self, object: &'a RawObject) -> Option<&'a RawObject> {
        let mut current = object;
        let mut seen: HashSet<&'a str> = HashSet::new();
        while let Some(reference) = str_field(current, "$ref") {
            if !seen.insert(reference) {
                log::debug!("reference cycle at {reference}");
                return None;
            }
            current = self.resolve(reference)?;
        }
        Some(current)
    }
}

/// Undo JSON-Pointer escaping: `~1` → `/`, then `~0` → `~`.
fn unescape_token(token: &str) -> Cow<'_, str> {
    if token.contains('~') {
        Cow::Owned(token.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(token)
    }
}
