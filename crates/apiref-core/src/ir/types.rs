use serde::Serialize;

use super::operations::NormalizedOperation;
use crate::config::SpecConfig;

/// A fully normalized spec: every operation, sorted by group then title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSpec {
    pub config: SpecConfig,
    pub servers: Vec<NormalizedServer>,
    pub operations: Vec<NormalizedOperation>,
}

/// A server URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedServer {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A visible operation together with its navigable location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationNode {
    pub operation: NormalizedOperation,
    /// Spec id followed by the operation slug.
    pub slug: Vec<String>,
    pub href: String,
}

impl OperationNode {
    pub fn new(operation: NormalizedOperation) -> Self {
        let slug: Vec<String> = std::iter::once(operation.spec_id.clone())
            .chain(operation.slug.iter().cloned())
            .collect();
        let href = format!("/api/{}", slug.join("/"));
        Self {
            operation,
            slug,
            href,
        }
    }

    /// The slug without its leading spec id.
    pub fn operation_slug(&self) -> &[String] {
        &self.slug[1..]
    }
}
