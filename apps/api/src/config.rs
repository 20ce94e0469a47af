use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::analysis::dictionary::Language;
use crate::analysis::language::DetectorBackend;
use crate::analysis::tokenizer::TokenStrategy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Used when a caller override is unsupported, and as the fixed language when
    /// detection is disabled.
    pub default_language: Language,
    pub detect_language: bool,
    pub detector_backend: DetectorBackend,
    pub max_upload_bytes: usize,
    pub extraction_timeout: Duration,
    pub preview_chars: usize,
    pub token_strategy: TokenStrategy,
    /// Optional JSON dictionary replacing the built-in tables.
    pub dictionary_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default_language = match lookup("CVSCAN_DEFAULT_LANGUAGE") {
            Some(tag) => Language::from_tag(&tag)
                .ok_or_else(|| anyhow!("CVSCAN_DEFAULT_LANGUAGE must be 'en' or 'fr', got '{tag}'"))?,
            None => Language::En,
        };

        let token_strategy = match lookup("CVSCAN_TOKEN_STRATEGY") {
            Some(name) => TokenStrategy::from_name(&name).ok_or_else(|| {
                anyhow!(
                    "CVSCAN_TOKEN_STRATEGY must be 'synonym_expanding' or 'strict_letters', got '{name}'"
                )
            })?,
            None => TokenStrategy::default(),
        };

        let detector_backend = match lookup("CVSCAN_LANGUAGE_DETECTOR") {
            Some(name) => DetectorBackend::from_name(&name).ok_or_else(|| {
                anyhow!("CVSCAN_LANGUAGE_DETECTOR must be 'whatlang' or 'stopword', got '{name}'")
            })?,
            None => DetectorBackend::default(),
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_language,
            detect_language: parse_or(&lookup, "CVSCAN_DETECT_LANGUAGE", true)?,
            detector_backend,
            max_upload_bytes: parse_or(&lookup, "CVSCAN_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            extraction_timeout: Duration::from_secs(parse_or(
                &lookup,
                "CVSCAN_EXTRACTION_TIMEOUT_SECS",
                20,
            )?),
            preview_chars: parse_or(&lookup, "CVSCAN_PREVIEW_CHARS", 800)?,
            token_strategy,
            dictionary_path: lookup("CVSCAN_DICTIONARY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
