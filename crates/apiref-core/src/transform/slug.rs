//! Operation keys, navigable slugs and DOM-safe identifiers.

/// Build the stable key used for overrides and deep links.
///
/// Examples:
/// - `GET /plants` for a regular operation
/// - `WEBHOOK POST /plant/webhook` for a webhook
pub fn build_operation_key(method: &str, path: &str, is_webhook: bool) -> String {
    let prefix = if is_webhook { "WEBHOOK " } else { "" };
    format!("{prefix}{} {path}", method.to_uppercase())
}

/// Derive slug segments from a path and method.
///
/// Examples:
/// - `GET /plants` → `["plants", "get"]`
/// - `DELETE /plants/{id}` → `["plants", "id", "delete"]`
/// - `GET /` → `["root", "get"]`
/// - webhook `POST /plant/webhook` → `["webhooks", "plant", "webhook", "post"]`
pub fn build_slug_segments(path: &str, method: &str, is_webhook: bool) -> Vec<String> {
    let mut segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(clean_segment)
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        segments.push("root".to_string());
    }

    if is_webhook && segments[0] != "webhooks" {
        segments.insert(0, "webhooks".to_string());
    }

    segments.push(method.to_lowercase());
    segments
}

/// Build the DOM/href-safe operation identifier.
pub fn build_operation_id(spec_id: &str, slug: &[String], is_webhook: bool) -> String {
    let prefix = if is_webhook { "webhook" } else { "endpoint" };
    let parts: Vec<String> = std::iter::once(prefix)
        .chain(std::iter::once(spec_id))
        .chain(slug.iter().map(String::as_str))
        .map(clean_segment)
        .collect();
    collapse_hyphens(&parts.join("-"))
        .trim_matches('-')
        .to_string()
}

/// Strip path-parameter braces, collapse every run of characters other than
/// ASCII letters and digits into one hyphen, and lowercase.
fn clean_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars().filter(|c| *c != '{' && *c != '}') {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out
}

fn collapse_hyphens(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch == '-' && out.ends_with('-') {
            continue;
        }
        out.push(ch);
    }
    out
}
