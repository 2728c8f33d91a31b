use indexmap::IndexMap;
use serde::Serialize;

use super::operations::HttpMethod;
use super::types::OperationNode;
use crate::config::SpecConfig;
use crate::transform::ordering::{eq_ignore_case, locale_cmp};

/// A sidebar group of operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationGroup {
    pub title: String,
    pub items: Vec<NavigationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationItem {
    pub id: String,
    pub title: String,
    pub href: String,
    pub slug: Vec<String>,
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl From<&OperationNode> for NavigationItem {
    fn from(node: &OperationNode) -> Self {
        let operation = &node.operation;
        Self {
            id: operation.id.clone(),
            title: operation.title.clone(),
            href: node.href.clone(),
            slug: node.slug.clone(),
            method: operation.method,
            path: operation.path.clone(),
            badge: operation.badge.clone(),
        }
    }
}

/// Group nodes by their operation group.
///
/// Groups named in `tags_order` come first in that order, then the webhook
/// group, then everything else alphabetically. Items are sorted by title.
pub fn build_navigation(nodes: &[OperationNode], config: &SpecConfig) -> Vec<NavigationGroup> {
    let mut grouped: IndexMap<&str, Vec<NavigationItem>> = IndexMap::new();
    for node in nodes {
        grouped
            .entry(node.operation.group.as_str())
            .or_default()
            .push(NavigationItem::from(node));
    }

    let mut groups: Vec<NavigationGroup> = grouped
        .into_iter()
        .map(|(title, mut items)| {
            items.sort_by(|a, b| locale_cmp(&a.title, &b.title));
            NavigationGroup {
                title: title.to_string(),
                items,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        group_weight(&a.title, config)
            .cmp(&group_weight(&b.title, config))
            .then_with(|| locale_cmp(&a.title, &b.title))
    });
    groups
}

fn group_weight(title: &str, config: &SpecConfig) -> usize {
    let order = &config.tags_order;
    if let Some(index) = order.iter().position(|tag| eq_ignore_case(tag, title)) {
        index
    } else if title == config.webhook_group() {
        order.len()
    } else {
        order.len() + 1
    }
}

/// One searchable operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub href: String,
    pub keywords: Vec<String>,
}

pub fn build_search_index(nodes: &[OperationNode]) -> Vec<SearchEntry> {
    nodes
        .iter()
        .map(|node| {
            let operation = &node.operation;
            SearchEntry {
                id: operation.id.clone(),
                title: operation.title.clone(),
                description: operation
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("{} {}", operation.method.as_str(), operation.path)),
                href: node.href.clone(),
                keywords: operation.tags.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecSource;
    use crate::transform::normalize_spec;
    use serde_json::json;

    fn nodes_for(config: &SpecConfig, document: serde_json::Value) -> Vec<OperationNode> {
        normalize_spec(config, &document)
            .operations
            .into_iter()
            .map(OperationNode::new)
            .collect()
    }

    fn config() -> SpecConfig {
        let mut config = SpecConfig::new(
            "garden",
            "Garden",
            SpecSource::Inline {
                document: json!({}),
            },
        );
        config.tags_order = vec!["plants".to_string(), "Pots".to_string()];
        config
    }

    #[test]
    fn test_group_order() {
        let config = config();
        let nodes = nodes_for(
            &config,
            json!({
                "paths": {
                    "/soil": { "get": { "tags": ["Soil"] } },
                    "/misc": { "get": {} },
                    "/pots": { "get": { "tags": ["pots"] } },
                    "/plants": { "get": { "tags": ["Plants"] } },
                },
                "webhooks": { "newPlant": { "post": {} } },
            }),
        );
        let titles: Vec<String> = build_navigation(&nodes, &config)
            .into_iter()
            .map(|group| group.title)
            .collect();
        assert_eq!(titles, ["Plants", "pots", "Webhooks", "Endpoints", "Soil"]);
    }

    #[test]
    fn test_group_order_matches_non_ascii_tags() {
        let mut config = config();
        config.tags_order = vec!["Übersicht".to_string(), "plants".to_string()];
        let nodes = nodes_for(
            &config,
            json!({ "paths": {
                "/plants": { "get": { "tags": ["plants"] } },
                "/overview": { "get": { "tags": ["übersicht"] } },
            }}),
        );
        let titles: Vec<String> = build_navigation(&nodes, &config)
            .into_iter()
            .map(|group| group.title)
            .collect();
        assert_eq!(titles, ["übersicht", "plants"]);
    }

    #[test]
    fn test_items_sorted_by_title() {
        let config = config();
        let nodes = nodes_for(
            &config,
            json!({ "paths": {
                "/b": { "get": { "summary": "banana", "tags": ["plants"] } },
                "/a": { "post": { "summary": "Apple", "tags": ["plants"] } },
            }}),
        );
        let navigation = build_navigation(&nodes, &config);
        assert_eq!(navigation.len(), 1);
        let items = &navigation[0].items;
        assert_eq!(items[0].title, "Apple");
        assert_eq!(items[0].method, HttpMethod::Post);
        assert_eq!(items[0].href, "/api/garden/a/post");
        assert_eq!(items[1].title, "banana");
    }

    #[test]
    fn test_search_index_description_fallback() {
        let config = config();
        let nodes = nodes_for(
            &config,
            json!({ "paths": {
                "/a": { "get": { "summary": "List", "description": "Lists things", "tags": ["x", "y"] } },
                "/b": { "delete": {} },
            }}),
        );
        let index = build_search_index(&nodes);
        let by_title = |title: &str| index.iter().find(|entry| entry.title == title).unwrap();
        assert_eq!(by_title("List").description, "Lists things");
        assert_eq!(by_title("List").keywords, ["x", "y"]);
        assert_eq!(by_title("DELETE /b").description, "DELETE /b");
        assert!(by_title("DELETE /b").keywords.is_empty());
    }
}
