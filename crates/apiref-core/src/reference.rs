//! Aggregated, memoized access to every configured spec.
//!
//! [`ApiReference`] owns the configuration, loads each spec at most once,
//! normalizes it at most once, and answers the lookups a documentation site
//! needs: operation nodes, slug and key lookups, navigation and search.

use std::sync::Arc;

use crate::cache::SingleFlight;
use crate::config::ReferenceConfig;
use crate::error::ReferenceError;
use crate::ir::grouping::{build_navigation, build_search_index};
use crate::ir::{NavigationGroup, NormalizedSpec, OperationNode, SearchEntry};
use crate::parse::source::{DefaultFetcher, DocumentFetcher, SourceLoader};
use crate::transform::{build_operation_key, normalize_spec};

type SpecResult = Result<Arc<NormalizedSpec>, ReferenceError>;

pub struct ApiReference<F = DefaultFetcher> {
    config: ReferenceConfig,
    loader: SourceLoader<F>,
    specs: SingleFlight<SpecResult>,
}

impl ApiReference<DefaultFetcher> {
    pub fn new(config: ReferenceConfig) -> Self {
        Self::with_fetcher(config, DefaultFetcher::default())
    }
}

impl<F: DocumentFetcher> ApiReference<F> {
    pub fn with_fetcher(config: ReferenceConfig, fetcher: F) -> Self {
        Self {
            config,
            loader: SourceLoader::new(fetcher),
            specs: SingleFlight::new(),
        }
    }

    pub fn config(&self) -> &ReferenceConfig {
        &self.config
    }

    /// The normalized spec for `spec_id`, or for the default spec when the id
    /// is absent or not configured.
    pub fn normalized_spec(&self, spec_id: Option<&str>) -> SpecResult {
        let resolved = self.config.resolve_spec_id(spec_id);
        let spec_config = self.config.spec(Some(resolved))?;
        self.specs.get_or_init(resolved, || {
            let document = self.loader.load(spec_config)?;
            Ok(Arc::new(normalize_spec(spec_config, &document)))
        })
    }

    /// Visible operations of one spec, in normalized order.
    pub fn operation_nodes(&self, spec_id: Option<&str>) -> Result<Vec<OperationNode>, ReferenceError> {
        let spec = self.normalized_spec(spec_id)?;
        Ok(spec
            .operations
            .iter()
            .filter(|operation| !operation.hidden)
            .cloned()
            .map(OperationNode::new)
            .collect())
    }

    /// Visible operations of every configured spec, in configuration order.
    pub fn all_operation_nodes(&self) -> Result<Vec<OperationNode>, ReferenceError> {
        let mut nodes = Vec::new();
        for spec in &self.config.specs {
            nodes.extend(self.operation_nodes(Some(&spec.id))?);
        }
        Ok(nodes)
    }

    /// Find an operation by its href segments.
    ///
    /// A leading segment naming a configured spec selects that spec and is
    /// dropped; otherwise every segment is matched against the default spec.
    pub fn operation_by_slug<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<Option<OperationNode>, ReferenceError> {
        let Some(first) = segments.first() else {
            return Ok(None);
        };
        let first = first.as_ref();
        let (spec_id, rest) = if self.config.contains(first) {
            (Some(first), &segments[1..])
        } else {
            (None, segments)
        };

        let nodes = self.operation_nodes(spec_id)?;
        Ok(nodes.into_iter().find(|node| {
            let slug = node.operation_slug();
            slug.len() == rest.len()
                && slug.iter().zip(rest).all(|(a, b)| a.as_str() == b.as_ref())
        }))
    }

    /// Find an operation by method and path.
    ///
    /// Without a spec id every spec is searched in configuration order. An
    /// explicit id that is not configured finds nothing.
    pub fn operation_by_key(
        &self,
        method: &str,
        path: &str,
        is_webhook: bool,
        spec_id: Option<&str>,
    ) -> Result<Option<OperationNode>, ReferenceError> {
        if method.is_empty() || path.is_empty() {
            return Ok(None);
        }
        let key = build_operation_key(method, path, is_webhook);
        let nodes = match spec_id {
            Some(id) if !self.config.contains(id) => return Ok(None),
            Some(id) => self.operation_nodes(Some(id))?,
            None => self.all_operation_nodes()?,
        };
        Ok(nodes.into_iter().find(|node| node.operation.key == key))
    }

    pub fn navigation(&self, spec_id: Option<&str>) -> Result<Vec<NavigationGroup>, ReferenceError> {
        let spec = self.normalized_spec(spec_id)?;
        let nodes = self.operation_nodes(Some(&spec.config.id))?;
        Ok(build_navigation(&nodes, &spec.config))
    }

    pub fn search_index(&self) -> Result<Vec<SearchEntry>, ReferenceError> {
        Ok(build_search_index(&self.all_operation_nodes()?))
    }

    /// Forget the loaded document and normalized spec for `spec_id`.
    pub fn invalidate(&self, spec_id: &str) -> bool {
        let document = self.loader.invalidate(spec_id);
        let spec = self.specs.invalidate(spec_id);
        if document || spec {
            log::debug!("invalidated spec '{spec_id}'");
        }
        document || spec
    }
}
