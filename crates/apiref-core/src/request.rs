//! "Try it" requests assembled from an operation's prefill values.

use indexmap::IndexMap;
use serde::Serialize;
use url::form_urlencoded;

use crate::ir::{HttpMethod, NormalizedOperation, OperationPrefill};

/// Headers a client may not forward on the caller's behalf.
const BLOCKED_HEADERS: [&str; 3] = ["host", "connection", "content-length"];

/// A request ready to be shown as curl or handed to an HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedRequest {
    pub method: HttpMethod,
    /// Empty when no server URL is configured.
    pub url: String,
    pub headers: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub is_server_configured: bool,
    pub curl_lines: Vec<String>,
}

impl PreparedRequest {
    /// Build a request for `operation` against `server_url` using `values`,
    /// typically the operation's prefill after user edits.
    pub fn from_prefill(
        operation: &NormalizedOperation,
        server_url: Option<&str>,
        values: &OperationPrefill,
    ) -> Self {
        let server_url = server_url.filter(|url| !url.is_empty());
        let url = server_url
            .map(|base| build_url(base, &operation.path, values))
            .unwrap_or_default();
        let headers = sanitize_headers(&values.header);
        let body = values
            .body
            .clone()
            .filter(|body| operation.method.allows_body() && !body.is_empty());
        let curl_lines = curl_lines(operation.method, &url, &headers, body.as_deref());

        Self {
            method: operation.method,
            url,
            headers,
            body,
            is_server_configured: server_url.is_some(),
            curl_lines,
        }
    }

    /// The curl lines joined with shell line continuations.
    pub fn curl_command(&self) -> String {
        self.curl_lines.join(" \\\n")
    }
}

/// Drop empty values and headers that must not be forwarded.
pub fn sanitize_headers(headers: &IndexMap<String, String>) -> IndexMap<String, String> {
    headers
        .iter()
        .filter(|(name, value)| {
            !value.is_empty()
                && !BLOCKED_HEADERS
                    .iter()
                    .any(|blocked| name.eq_ignore_ascii_case(blocked))
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn build_url(base: &str, path: &str, values: &OperationPrefill) -> String {
    let mut url = base.strip_suffix('/').unwrap_or(base).to_string();
    let path = fill_path(path, &values.path);
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(&path);

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;
    for (name, value) in values.query.iter().filter(|(_, value)| !value.is_empty()) {
        query.append_pair(name, value);
        has_query = true;
    }
    if has_query {
        url.push('?');
        url.push_str(&query.finish());
    }
    url
}

/// Substitute `{name}` placeholders with percent-encoded values. A missing
/// value leaves the placeholder in place, itself percent-encoded.
fn fill_path(path: &str, values: &IndexMap<String, String>) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        out.push_str(&rest[..start]);
        match values.get(name) {
            Some(value) => out.push_str(&urlencoding::encode(value)),
            None => out.push_str(&urlencoding::encode(&rest[start..=start + len])),
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

fn curl_lines(
    method: HttpMethod,
    url: &str,
    headers: &IndexMap<String, String>,
    body: Option<&str>,
) -> Vec<String> {
    if url.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![
        format!("curl --request {}", method.as_str()),
        format!("  --url {}", shell_quote(url)),
    ];
    for (name, value) in headers {
        lines.push(format!("  -H {}", shell_quote(&format!("{name}: {value}"))));
    }
    if let Some(body) = body {
        lines.push(format!("  --data {}", shell_quote(body)));
    }
    lines
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}
