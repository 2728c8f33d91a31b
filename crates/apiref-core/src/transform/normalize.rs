use std::cmp::Ordering;

use serde_json::Value;

use crate::config::{OperationOverride, SpecConfig};
use crate::ir::{HttpMethod, NormalizedOperation, NormalizedServer, NormalizedSpec};
use crate::parse::raw::{RawObject, as_object, object_field, str_field, string_list};
use crate::parse::ref_resolve::RefResolver;

use super::content::{
    extract_parameters, normalize_parameters, normalize_request_body, normalize_responses,
    normalize_security, normalize_servers,
};
use super::ordering::{eq_ignore_case, locale_cmp};
use super::slug::{build_operation_id, build_operation_key, build_slug_segments};

/// Everything needed to normalize one operation entry.
#[derive(Debug, Clone, Copy)]
pub struct OperationInput<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub raw_operation: &'a RawObject,
    /// Path-item (or webhook-item) level parameters, placed before the
    /// operation's own parameters when merging.
    pub shared_parameters: &'a [&'a RawObject],
    pub path_servers: &'a [NormalizedServer],
    pub spec_servers: &'a [NormalizedServer],
    pub config: &'a SpecConfig,
    pub document_security: Option<&'a Value>,
    pub is_webhook: bool,
    pub resolver: &'a RefResolver<'a>,
}

/// Normalize every operation under `paths` and `webhooks`.
///
/// Entries whose method value is not an object are skipped; keys other than
/// the eight HTTP methods are ignored.
pub fn normalize_spec(config: &SpecConfig, document: &Value) -> NormalizedSpec {
    let resolver = RefResolver::new(document);
    let root = as_object(document);
    let spec_servers = normalize_servers(root.and_then(|doc| doc.get("servers")));
    let document_security = root.and_then(|doc| doc.get("security"));

    let mut operations = Vec::new();
    for (section, is_webhook) in [("paths", false), ("webhooks", true)] {
        let Some(items) = root.and_then(|doc| object_field(doc, section)) else {
            continue;
        };
        for (path, item) in items {
            let Some(item) = as_object(item).and_then(|item| resolver.follow(item)) else {
                log::debug!("skipping non-object {section} entry {path}");
                continue;
            };
            let shared_parameters = extract_parameters(item.get("parameters"), &resolver);
            let path_servers = normalize_servers(item.get("servers"));

            for method in HttpMethod::ALL {
                let Some(raw_operation) = object_field(item, method.field()) else {
                    continue;
                };
                operations.push(normalize_operation(&OperationInput {
                    path,
                    method,
                    raw_operation,
                    shared_parameters: &shared_parameters,
                    path_servers: &path_servers,
                    spec_servers: &spec_servers,
                    config,
                    document_security,
                    is_webhook,
                    resolver: &resolver,
                }));
            }
        }
    }

    operations.sort_by(compare_operations);
    log::debug!(
        "normalized {} operations for spec '{}'",
        operations.len(),
        config.id
    );

    NormalizedSpec {
        config: config.clone(),
        servers: spec_servers,
        operations,
    }
}

/// Order by group, then title.
pub fn compare_operations(a: &NormalizedOperation, b: &NormalizedOperation) -> Ordering {
    locale_cmp(&a.group, &b.group).then_with(|| locale_cmp(&a.title, &b.title))
}

/// Build the normalized record for a single operation.
pub fn normalize_operation(input: &OperationInput<'_>) -> NormalizedOperation {
    let op = input.raw_operation;
    let method = input.method.as_str();
    let key = build_operation_key(method, input.path, input.is_webhook);
    let override_ = input.config.operation_overrides.get(&key);

    let title = override_
        .and_then(|o| o.title.clone())
        .or_else(|| str_field(op, "summary").map(str::to_string))
        .or_else(|| str_field(op, "operationId").map(str::to_string))
        .unwrap_or_else(|| format!("{method} {}", input.path));
    let description = override_
        .and_then(|o| o.description.clone())
        .or_else(|| str_field(op, "description").map(str::to_string))
        .or_else(|| str_field(op, "summary").map(str::to_string));
    let tags = string_list(op, "tags");
    let group = resolve_group(&tags, override_, input.config, input.is_webhook);

    let mut merged_parameters = input.shared_parameters.to_vec();
    merged_parameters.extend(extract_parameters(op.get("parameters"), input.resolver));
    let (parameters, mut prefill) = normalize_parameters(&merged_parameters, input.resolver);
    let (request_body, body_sample) = normalize_request_body(op.get("requestBody"), input.resolver);
    prefill.body = body_sample;
    let responses = normalize_responses(op.get("responses"), input.resolver);

    // Only an absent `security` inherits; an explicit `[]` means no auth.
    let security = match op.get("security") {
        Some(declared) if !declared.is_null() => normalize_security(Some(declared)),
        _ => normalize_security(input.document_security),
    };

    let servers = resolve_servers(
        normalize_servers(op.get("servers")),
        input.path_servers,
        input.spec_servers,
    );

    let slug = override_
        .and_then(|o| o.slug.clone())
        .unwrap_or_else(|| build_slug_segments(input.path, method, input.is_webhook));
    let id = build_operation_id(&input.config.id, &slug, input.is_webhook);

    NormalizedOperation {
        spec_id: input.config.id.clone(),
        id,
        key,
        slug,
        title,
        description,
        method: input.method,
        path: input.path.to_string(),
        is_webhook: input.is_webhook,
        group,
        badge: override_.and_then(|o| o.badge.clone()),
        tags,
        servers,
        parameters,
        request_body,
        responses,
        security,
        hidden: override_.and_then(|o| o.hidden).unwrap_or(false),
        prefill,
    }
}

/// Operation servers, else path-item servers, else document servers.
fn resolve_servers(
    operation: Vec<NormalizedServer>,
    path: &[NormalizedServer],
    spec: &[NormalizedServer],
) -> Vec<NormalizedServer> {
    if !operation.is_empty() {
        operation
    } else if !path.is_empty() {
        path.to_vec()
    } else {
        spec.to_vec()
    }
}

/// Pick the navigation group for an operation. Never empty.
pub fn resolve_group(
    tags: &[String],
    override_: Option<&OperationOverride>,
    config: &SpecConfig,
    is_webhook: bool,
) -> String {
    if let Some(group) = override_
        .and_then(|o| o.group.as_deref())
        .filter(|group| !group.is_empty())
    {
        return group.to_string();
    }
    if is_webhook {
        return config.webhook_group().to_string();
    }
    for ordered in &config.tags_order {
        if let Some(tag) = tags.iter().find(|tag| eq_ignore_case(tag, ordered)) {
            return tag.clone();
        }
    }
    if let Some(first) = tags.first().filter(|tag| !tag.is_empty()) {
        return first.clone();
    }
    config.default_group().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecSource;
    use serde_json::json;

    fn config() -> SpecConfig {
        let mut config = SpecConfig::new(
            "test",
            "Test",
            SpecSource::Inline {
                document: json!({}),
            },
        );
        config.tags_order = vec!["Plants".to_string(), "webhooks".to_string()];
        config
    }

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_resolution_order() {
        let config = config();
        let group_override = OperationOverride {
            group: Some("Pinned".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_group(&tags(&["plants"]), Some(&group_override), &config, true),
            "Pinned"
        );
        assert_eq!(resolve_group(&tags(&["plants"]), None, &config, true), "Webhooks");
        assert_eq!(
            resolve_group(&tags(&["misc", "PLANTS"]), None, &config, false),
            "PLANTS"
        );
        assert_eq!(resolve_group(&tags(&["misc", "other"]), None, &config, false), "misc");
        assert_eq!(resolve_group(&[], None, &config, false), "Endpoints");

        let mut custom = config.clone();
        custom.default_group = Some("Core".to_string());
        custom.webhook_group = Some("Hooks".to_string());
        assert_eq!(resolve_group(&[], None, &custom, false), "Core");
        assert_eq!(resolve_group(&[], None, &custom, true), "Hooks");
    }

    #[test]
    fn test_group_matches_non_ascii_tags() {
        let mut config = config();
        config.tags_order = vec!["Übersicht".to_string(), "other".to_string()];
        assert_eq!(
            resolve_group(&tags(&["other", "übersicht"]), None, &config, false),
            "übersicht"
        );
    }

    #[test]
    fn test_group_prefers_earliest_tags_order_entry() {
        let config = config();
        assert_eq!(
            resolve_group(&tags(&["webhooks", "plants"]), None, &config, false),
            "plants"
        );
    }

    fn normalize_one(config: &SpecConfig, document: &Value) -> NormalizedOperation {
        let mut spec = normalize_spec(config, document);
        assert_eq!(spec.operations.len(), 1);
        spec.operations.remove(0)
    }

    #[test]
    fn test_title_and_description_fallbacks() {
        let config = config();
        let op = normalize_one(
            &config,
            &json!({ "paths": { "/a": { "get": { "operationId": "getA" } } } }),
        );
        assert_eq!(op.title, "getA");
        assert_eq!(op.description, None);

        let op = normalize_one(&config, &json!({ "paths": { "/a": { "get": {} } } }));
        assert_eq!(op.title, "GET /a");

        let op = normalize_one(
            &config,
            &json!({ "paths": { "/a": { "get": { "summary": "Sum", "operationId": "getA" } } } }),
        );
        assert_eq!(op.title, "Sum");
        assert_eq!(op.description.as_deref(), Some("Sum"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = config();
        config.operation_overrides.insert(
            "GET /a".to_string(),
            OperationOverride {
                title: Some("Custom".to_string()),
                description: Some("Custom description".to_string()),
                badge: Some("Beta".to_string()),
                slug: Some(vec!["custom".to_string(), "path".to_string()]),
                hidden: Some(true),
                ..Default::default()
            },
        );
        let op = normalize_one(
            &config,
            &json!({ "paths": { "/a": { "get": { "summary": "Sum", "description": "Desc" } } } }),
        );
        assert_eq!(op.title, "Custom");
        assert_eq!(op.description.as_deref(), Some("Custom description"));
        assert_eq!(op.badge.as_deref(), Some("Beta"));
        assert_eq!(op.slug, ["custom", "path"]);
        assert_eq!(op.id, "endpoint-test-custom-path");
        assert!(op.hidden);
    }

    #[test]
    fn test_security_inheritance_and_explicit_empty() {
        let config = config();
        let document = json!({
            "security": [{ "bearerAuth": [] }],
            "paths": {
                "/inherits": { "get": {} },
                "/public": { "get": { "security": [] } },
                "/own": { "get": { "security": [{ "apiKey": [] }, { "oauth": ["read"] }] } },
            }
        });
        let spec = normalize_spec(&config, &document);
        let by_path = |path: &str| {
            spec.operations
                .iter()
                .find(|op| op.path == path)
                .unwrap()
                .security
                .clone()
        };

        let inherited = by_path("/inherits");
        assert_eq!(inherited.len(), 1);
        assert_eq!(inherited[0][0].name, "bearerAuth");

        assert!(by_path("/public").is_empty());

        let own = by_path("/own");
        assert_eq!(own.len(), 2);
        assert_eq!(own[1][0].scopes, ["read"]);
    }

    #[test]
    fn test_server_precedence() {
        let config = config();
        let document = json!({
            "servers": [{ "url": "https://doc.example.com" }],
            "paths": {
                "/doc": { "get": {} },
                "/path": {
                    "servers": [{ "url": "https://path.example.com" }],
                    "get": {},
                    "post": { "servers": [{ "url": "https://op.example.com", "description": "Op" }] },
                },
            }
        });
        let spec = normalize_spec(&config, &document);
        let url = |method: HttpMethod, path: &str| {
            spec.operations
                .iter()
                .find(|op| op.method == method && op.path == path)
                .map(|op| op.servers[0].url.clone())
                .unwrap()
        };
        assert_eq!(url(HttpMethod::Get, "/doc"), "https://doc.example.com");
        assert_eq!(url(HttpMethod::Get, "/path"), "https://path.example.com");
        assert_eq!(url(HttpMethod::Post, "/path"), "https://op.example.com");

        let bare = normalize_one(&config, &json!({ "paths": { "/x": { "get": {} } } }));
        assert!(bare.servers.is_empty());
    }

    #[test]
    fn test_skips_malformed_entries() {
        let config = config();
        let document = json!({
            "paths": {
                "/a": { "get": "not an operation", "post": {}, "x-extension": {}, "parameters": [] },
                "/b": "not a path item",
                "/c": { "trace": {}, "head": {}, "query": {} },
            },
            "webhooks": [],
        });
        let spec = normalize_spec(&config, &document);
        assert_eq!(spec.operations.len(), 3);

        assert!(normalize_spec(&config, &json!("junk")).operations.is_empty());
    }

    #[test]
    fn test_operations_sorted_by_group_then_title() {
        let config = config();
        let document = json!({
            "paths": {
                "/z": { "get": { "summary": "Zeta", "tags": ["beta"] } },
                "/a": { "get": { "summary": "alpha", "tags": ["beta"] } },
                "/m": { "get": { "summary": "Middle", "tags": ["Alpha"] } },
            }
        });
        let spec = normalize_spec(&config, &document);
        let titles: Vec<&str> = spec.operations.iter().map(|op| op.title.as_str()).collect();
        assert_eq!(titles, ["Middle", "alpha", "Zeta"]);
    }

    #[test]
    fn test_path_item_refs_are_followed() {
        let config = config();
        let document = json!({
            "paths": { "/shared": { "$ref": "#/components/pathItems/Shared" } },
            "components": { "pathItems": { "Shared": { "get": { "summary": "Shared" } } } }
        });
        let op = normalize_one(&config, &document);
        assert_eq!(op.title, "Shared");
        assert_eq!(op.path, "/shared");
    }
}
