use thiserror::Error;

/// The spec document could not be obtained or parsed.
///
/// Cloneable so a cached failure can be handed to every caller waiting on the
/// same load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("failed to read OpenAPI spec {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to fetch OpenAPI spec from {url} ({status})")]
    Http { url: String, status: u16 },

    #[error("failed to fetch OpenAPI spec from {url}: {message}")]
    Transport { url: String, message: String },

    #[error("failed to parse YAML: {0}")]
    Yaml(String),

    #[error("failed to parse JSON: {0}")]
    Json(String),
}

impl From<serde_yaml_ng::Error> for SourceError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SourceError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Json(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("unknown API reference spec: {0}")]
    UnknownSpec(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
