use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: Analyzer,
    /// Pluggable extractor. Default: BlockingTextExtractor (pdf-extract, zip + quick-xml).
    pub extractor: Arc<dyn TextExtractor>,
}
