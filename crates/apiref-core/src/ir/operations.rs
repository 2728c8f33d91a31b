use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::types::NormalizedServer;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Every method an OpenAPI path item may declare, in lookup order.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// The lowercase key used in a path item.
    pub fn field(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// GET and HEAD requests never carry a body.
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub const ALL: [ParameterLocation; 4] = [
        ParameterLocation::Path,
        ParameterLocation::Query,
        ParameterLocation::Header,
        ParameterLocation::Cookie,
    ];

    /// Parse the `in` field of a parameter object. Unknown locations yield `None`.
    pub fn from_raw(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// A path/query/header/cookie parameter after merging and deduplication.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// Parameters bucketed by location. All four buckets always exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedParameters {
    pub path: Vec<NormalizedParameter>,
    pub query: Vec<NormalizedParameter>,
    pub header: Vec<NormalizedParameter>,
    pub cookie: Vec<NormalizedParameter>,
}

impl GroupedParameters {
    pub fn get(&self, location: ParameterLocation) -> &[NormalizedParameter] {
        match location {
            ParameterLocation::Path => &self.path,
            ParameterLocation::Query => &self.query,
            ParameterLocation::Header => &self.header,
            ParameterLocation::Cookie => &self.cookie,
        }
    }

    pub fn get_mut(&mut self, location: ParameterLocation) -> &mut Vec<NormalizedParameter> {
        match location {
            ParameterLocation::Path => &mut self.path,
            ParameterLocation::Query => &mut self.query,
            ParameterLocation::Header => &mut self.header,
            ParameterLocation::Cookie => &mut self.cookie,
        }
    }

    pub fn len(&self) -> usize {
        self.path.len() + self.query.len() + self.header.len() + self.cookie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named example attached to a media type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedExample {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMediaType {
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    pub examples: Vec<NormalizedExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub contents: Vec<NormalizedMediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contents: Vec<NormalizedMediaType>,
}

/// One scheme inside a security requirement group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSecurityRequirement {
    pub name: String,
    pub scopes: Vec<String>,
}

/// Values used to pre-fill the request form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationPrefill {
    pub path: IndexMap<String, String>,
    pub query: IndexMap<String, String>,
    pub header: IndexMap<String, String>,
    pub cookie: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl OperationPrefill {
    pub fn get(&self, location: ParameterLocation) -> &IndexMap<String, String> {
        match location {
            ParameterLocation::Path => &self.path,
            ParameterLocation::Query => &self.query,
            ParameterLocation::Header => &self.header,
            ParameterLocation::Cookie => &self.cookie,
        }
    }

    pub fn get_mut(&mut self, location: ParameterLocation) -> &mut IndexMap<String, String> {
        match location {
            ParameterLocation::Path => &mut self.path,
            ParameterLocation::Query => &mut self.query,
            ParameterLocation::Header => &mut self.header,
            ParameterLocation::Cookie => &mut self.cookie,
        }
    }
}

/// A fully normalized, render-ready operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOperation {
    pub spec_id: String,
    /// DOM-safe identifier: lowercase, hyphen-delimited.
    pub id: String,
    /// Stable deep-link key, see [`crate::transform::slug::build_operation_key`].
    pub key: String,
    pub slug: Vec<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub is_webhook: bool,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub tags: Vec<String>,
    pub servers: Vec<NormalizedServer>,
    pub parameters: GroupedParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<NormalizedRequestBody>,
    pub responses: Vec<NormalizedResponse>,
    /// Alternative requirement groups: any one group satisfies the operation.
    pub security: Vec<Vec<NormalizedSecurityRequirement>>,
    pub hidden: bool,
    pub prefill: OperationPrefill,
}
