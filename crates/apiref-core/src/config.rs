use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ReferenceError};

/// Group used for operations without tags when a spec does not name one.
pub const DEFAULT_GROUP: &str = "Endpoints";

/// Group used for webhook operations when a spec does not name one.
pub const DEFAULT_WEBHOOK_GROUP: &str = "Webhooks";

/// Top-level configuration loaded from `.apiref.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub default_spec_id: String,
    pub specs: Vec<SpecConfig>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            default_spec_id: "default".to_string(),
            specs: Vec::new(),
        }
    }
}

impl ReferenceConfig {
    /// Look up a spec by id, using the default spec when `spec_id` is `None`.
    pub fn spec(&self, spec_id: Option<&str>) -> Result<&SpecConfig, ReferenceError> {
        let resolved = spec_id.unwrap_or(&self.default_spec_id);
        self.specs
            .iter()
            .find(|spec| spec.id == resolved)
            .ok_or_else(|| ReferenceError::UnknownSpec(resolved.to_string()))
    }

    pub fn contains(&self, spec_id: &str) -> bool {
        self.specs.iter().any(|spec| spec.id == spec_id)
    }

    /// Map a requested id onto a configured one, falling back to the default.
    pub fn resolve_spec_id<'a>(&'a self, spec_id: Option<&'a str>) -> &'a str {
        match spec_id {
            Some(id) if self.contains(id) => id,
            _ => &self.default_spec_id,
        }
    }
}

/// Where the raw OpenAPI document comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecSource {
    /// A local YAML or JSON file, absolute or relative to the loader root.
    File { path: PathBuf },
    /// An HTTP(S) endpoint returning JSON.
    Url {
        url: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        headers: IndexMap<String, String>,
    },
    /// An already-parsed document.
    Inline { document: serde_json::Value },
}

/// One API spec rendered by the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecConfig {
    pub id: String,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub source: SpecSource,

    /// Tag names, in the order their groups should appear.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags_order: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_group: Option<String>,

    /// Keyed by operation key, e.g. `GET /plants` or `WEBHOOK POST /plant/webhook`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub operation_overrides: IndexMap<String, OperationOverride>,
}

impl SpecConfig {
    /// A spec with the given id and source and every optional field unset.
    pub fn new(id: impl Into<String>, label: impl Into<String>, source: SpecSource) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            version: None,
            source,
            tags_order: Vec::new(),
            default_group: None,
            webhook_group: None,
            operation_overrides: IndexMap::new(),
        }
    }

    pub fn default_group(&self) -> &str {
        self.default_group
            .as_deref()
            .filter(|group| !group.is_empty())
            .unwrap_or(DEFAULT_GROUP)
    }

    pub fn webhook_group(&self) -> &str {
        self.webhook_group
            .as_deref()
            .filter(|group| !group.is_empty())
            .unwrap_or(DEFAULT_WEBHOOK_GROUP)
    }
}

/// Per-operation presentation overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apiref.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ReferenceConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: ReferenceConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apiref configuration
default_spec_id: default

specs:
  - id: default
    label: API Reference
    source:
      type: file          # file | url | inline
      path: openapi.yaml
      # type: url
      # url: https://api.example.com/openapi.json
      # headers:
      #   Authorization: Bearer <token>
    tags_order: []        # tag names in sidebar order
    # default_group: Endpoints
    # webhook_group: Webhooks
    operation_overrides: {}
      # "GET /plants":
      #   title: List plants
      #   badge: Stable
      #   hidden: false
"#
}
