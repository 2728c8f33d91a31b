use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::cache::SingleFlight;
use crate::config::{SpecConfig, SpecSource};
use crate::error::SourceError;

/// Obtains the raw document for a spec source.
///
/// The default implementation reads files and performs blocking HTTP GETs;
/// hosts can substitute their own transport.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, source: &SpecSource) -> Result<Value, SourceError>;
}

/// Reads files relative to `root` and fetches URLs with `reqwest`.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    root: PathBuf,
}

impl DefaultFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_file(&self, path: &Path) -> Result<Value, SourceError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let content = fs::read_to_string(&absolute).map_err(|e| SourceError::Io {
            path: absolute.display().to_string(),
            message: e.to_string(),
        })?;
        log::debug!("read OpenAPI spec from {}", absolute.display());
        if is_yaml_path(&absolute) {
            super::from_yaml(&content)
        } else {
            super::from_json(&content)
        }
    }

    fn fetch_url(&self, url: &str, headers: &IndexMap<String, String>) -> Result<Value, SourceError> {
        let transport = |e: reqwest::Error| SourceError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(transport)?;
        let mut request = client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(transport)?;
        log::debug!("fetched OpenAPI spec from {url} ({} bytes)", body.len());
        super::from_json(&body)
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(root)
    }
}

impl DocumentFetcher for DefaultFetcher {
    fn fetch(&self, source: &SpecSource) -> Result<Value, SourceError> {
        match source {
            SpecSource::File { path } => self.read_file(path),
            SpecSource::Url { url, headers } => self.fetch_url(url, headers),
            SpecSource::Inline { document } => Ok(document.clone()),
        }
    }
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

type LoadResult = Result<Arc<Value>, SourceError>;

/// Loads spec documents, at most once per spec id.
///
/// Concurrent loads of the same id share one fetch. Failures are cached like
/// successes until [`SourceLoader::invalidate`] is called.
pub struct SourceLoader<F = DefaultFetcher> {
    fetcher: F,
    documents: SingleFlight<LoadResult>,
}

impl Default for SourceLoader<DefaultFetcher> {
    fn default() -> Self {
        Self::new(DefaultFetcher::default())
    }
}

impl<F: DocumentFetcher> SourceLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            documents: SingleFlight::new(),
        }
    }

    pub fn load(&self, config: &SpecConfig) -> LoadResult {
        self.documents.get_or_init(&config.id, || {
            log::debug!("loading OpenAPI spec '{}'", config.id);
            let result = self.fetcher.fetch(&config.source).map(Arc::new);
            if let Err(ref e) = result {
                log::warn!("failed to load OpenAPI spec '{}': {e}", config.id);
            }
            result
        })
    }

    pub fn invalidate(&self, spec_id: &str) -> bool {
        self.documents.invalidate(spec_id)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
