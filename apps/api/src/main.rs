mod analysis;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::dictionary::Dictionary;
use crate::analysis::language::{
    DetectorBackend, FixedLanguageDetector, LanguageDetector, StopwordLanguageDetector,
    WhatlangLanguageDetector,
};
use crate::analysis::scoring::ScoringEngine;
use crate::analysis::Analyzer;
use crate::config::Config;
use crate::extraction::BlockingTextExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvscan v{}", env!("CARGO_PKG_VERSION"));

    let dictionary = Arc::new(load_dictionary(&config)?);

    let engine = ScoringEngine::new(dictionary.clone())
        .with_strategy(config.token_strategy)
        .with_preview_chars(config.preview_chars);
    info!("Scoring engine initialized (strategy: {:?})", engine.strategy());

    let detector: Arc<dyn LanguageDetector> = match (config.detect_language, config.detector_backend) {
        (false, _) => Arc::new(FixedLanguageDetector(config.default_language)),
        (true, DetectorBackend::Whatlang) => {
            Arc::new(WhatlangLanguageDetector::new(config.default_language))
        }
        (true, DetectorBackend::Stopword) => {
            Arc::new(StopwordLanguageDetector::new(dictionary.clone()))
        }
    };
    info!(
        "Language detector: {} (default: {})",
        detector.name(),
        config.default_language.as_str()
    );

    let extractor = Arc::new(BlockingTextExtractor::new(config.extraction_timeout));
    info!(
        "Text extractor initialized (timeout: {:?}, max upload: {} bytes)",
        config.extraction_timeout, config.max_upload_bytes
    );

    let state = AppState {
        analyzer: Analyzer::new(engine, detector, config.default_language),
        extractor,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_dictionary(config: &Config) -> Result<Dictionary> {
    match &config.dictionary_path {
        Some(path) => {
            let dictionary = Dictionary::from_json_file(path)
                .with_context(|| format!("loading dictionary from {}", path.display()))?;
            info!("Dictionary loaded from {}", path.display());
            Ok(dictionary)
        }
        None => {
            info!("Using built-in dictionary");
            Ok(Dictionary::builtin())
        }
    }
}
