//! Normalization of servers, parameters, bodies, responses and security.

use indexmap::IndexMap;
use serde_json::Value;

use crate::ir::{
    GroupedParameters, NormalizedExample, NormalizedMediaType, NormalizedParameter,
    NormalizedRequestBody, NormalizedResponse, NormalizedSecurityRequirement, NormalizedServer,
    OperationPrefill, ParameterLocation,
};
use crate::parse::raw::{RawObject, as_array, as_object, flag_field, object_field, str_field};
use crate::parse::ref_resolve::RefResolver;

use super::example::{body_sample, parameter_sample};
use super::ordering::natural_cmp;

/// Servers with a string `url`; anything else is dropped.
pub fn normalize_servers(raw: Option<&Value>) -> Vec<NormalizedServer> {
    raw.and_then(as_array)
        .map(|servers| {
            servers
                .iter()
                .filter_map(as_object)
                .filter_map(|server| {
                    Some(NormalizedServer {
                        url: str_field(server, "url")?.to_string(),
                        description: str_field(server, "description").map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parameter objects of a `parameters` array, with `$ref` entries followed.
pub fn extract_parameters<'a>(
    raw: Option<&'a Value>,
    resolver: &RefResolver<'a>,
) -> Vec<&'a RawObject> {
    raw.and_then(as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(as_object)
                .filter_map(|param| resolver.follow(param))
                .collect()
        })
        .unwrap_or_default()
}

/// Deduplicate by `location:name` (first declaration wins), bucket by
/// location and compute the prefill value for each parameter.
pub fn normalize_parameters(
    params: &[&RawObject],
    resolver: &RefResolver<'_>,
) -> (GroupedParameters, OperationPrefill) {
    let mut deduped: IndexMap<String, &RawObject> = IndexMap::new();
    for &param in params {
        let (Some(name), Some(location)) = (str_field(param, "name"), str_field(param, "in")) else {
            continue;
        };
        deduped.entry(format!("{location}:{name}")).or_insert(param);
    }

    let mut grouped = GroupedParameters::default();
    let mut prefill = OperationPrefill::default();
    for param in deduped.values() {
        let Some(location) = str_field(param, "in").and_then(ParameterLocation::from_raw) else {
            continue;
        };
        let parameter = NormalizedParameter {
            name: str_field(param, "name").unwrap_or_default().to_string(),
            location,
            required: flag_field(param, "required"),
            description: str_field(param, "description").map(str::to_string),
            schema: object_field(param, "schema").map(|schema| Value::Object(schema.clone())),
        };
        let sample = parameter_sample(parameter.schema.as_ref(), resolver, parameter.required);
        prefill
            .get_mut(location)
            .insert(parameter.name.clone(), sample);
        grouped.get_mut(location).push(parameter);
    }
    (grouped, prefill)
}

/// Normalize a request body and synthesize its sample from the first media type.
pub fn normalize_request_body(
    raw: Option<&Value>,
    resolver: &RefResolver<'_>,
) -> (Option<NormalizedRequestBody>, Option<String>) {
    let Some(body) = raw.and_then(as_object).and_then(|body| resolver.follow(body)) else {
        return (None, None);
    };
    let contents = normalize_content(body.get("content"), resolver);
    let Some(primary) = contents.first() else {
        return (None, None);
    };
    let sample = primary
        .schema
        .as_ref()
        .and_then(|schema| body_sample(schema, resolver));

    let normalized = NormalizedRequestBody {
        description: str_field(body, "description").map(str::to_string),
        required: flag_field(body, "required"),
        contents,
    };
    (Some(normalized), sample)
}

/// Responses ordered by numeric-aware code comparison.
pub fn normalize_responses(raw: Option<&Value>, resolver: &RefResolver<'_>) -> Vec<NormalizedResponse> {
    let Some(responses) = raw.and_then(as_object) else {
        return Vec::new();
    };
    let mut normalized: Vec<NormalizedResponse> = responses
        .iter()
        .map(|(code, response)| {
            let response = as_object(response).and_then(|r| resolver.follow(r));
            NormalizedResponse {
                code: code.clone(),
                description: response
                    .and_then(|r| str_field(r, "description"))
                    .map(str::to_string),
                contents: normalize_content(response.and_then(|r| r.get("content")), resolver),
            }
        })
        .collect();
    normalized.sort_by(|a, b| natural_cmp(&a.code, &b.code));
    normalized
}

/// Media types of a `content` map, in document order.
pub fn normalize_content(raw: Option<&Value>, resolver: &RefResolver<'_>) -> Vec<NormalizedMediaType> {
    let Some(content) = raw.and_then(as_object) else {
        return Vec::new();
    };
    content
        .iter()
        .map(|(media_type, definition)| {
            let definition = as_object(definition);
            NormalizedMediaType {
                media_type: media_type.clone(),
                schema: definition
                    .and_then(|d| object_field(d, "schema"))
                    .map(|schema| Value::Object(schema.clone())),
                example: definition.and_then(|d| d.get("example")).cloned(),
                examples: normalize_examples(definition.and_then(|d| d.get("examples")), resolver),
            }
        })
        .collect()
}

fn normalize_examples(raw: Option<&Value>, resolver: &RefResolver<'_>) -> Vec<NormalizedExample> {
    let Some(examples) = raw.and_then(as_object) else {
        return Vec::new();
    };
    examples
        .iter()
        .filter_map(|(key, example)| {
            let example = resolver.follow(as_object(example)?)?;
            Some(NormalizedExample {
                key: key.clone(),
                summary: str_field(example, "summary").map(str::to_string),
                description: str_field(example, "description").map(str::to_string),
                value: example
                    .get("value")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(example.clone())),
            })
        })
        .collect()
}

/// Security requirement groups. Empty requirement objects are dropped, so
/// `security: []` and `security: [{}]` both mean "no authentication".
pub fn normalize_security(raw: Option<&Value>) -> Vec<Vec<NormalizedSecurityRequirement>> {
    let Some(requirements) = raw.and_then(as_array) else {
        return Vec::new();
    };
    requirements
        .iter()
        .filter_map(as_object)
        .map(|requirement| {
            requirement
                .iter()
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, scopes)| NormalizedSecurityRequirement {
                    name: name.clone(),
                    scopes: scopes
                        .as_array()
                        .map(|s| s.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default(),
                })
                .collect::<Vec<_>>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}
