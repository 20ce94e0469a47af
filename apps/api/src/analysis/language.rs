//! Language detection boundary.
//!
//! The engine only consumes a `Language`. Detection sits behind a trait so the
//! heuristic can be swapped; an explicit caller override always wins.

use std::sync::Arc;

use tracing::debug;
use whatlang::{Detector, Lang};

use crate::analysis::dictionary::{Dictionary, Language};

pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Language;

    /// Human-readable backend name, logged at startup.
    fn name(&self) -> &str;
}

/// Counts dictionary stop words per language. French only wins on a strict majority.
pub struct StopwordLanguageDetector {
    dictionary: Arc<Dictionary>,
}

impl StopwordLanguageDetector {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self { dictionary }
    }
}

impl LanguageDetector for StopwordLanguageDetector {
    fn detect(&self, text: &str) -> Language {
        let en_tables = self.dictionary.tables(Language::En);
        let fr_tables = self.dictionary.tables(Language::Fr);

        let (mut en_hits, mut fr_hits) = (0usize, 0usize);
        // Word occurrences matter here, not the distinct set.
        let lowered = text.to_lowercase();
        for word in lowered.split(|c: char| !c.is_alphabetic()) {
            if en_tables.is_stop_word(word) {
                en_hits += 1;
            }
            if fr_tables.is_stop_word(word) {
                fr_hits += 1;
            }
        }

        let detected = if fr_hits > en_hits {
            Language::Fr
        } else {
            Language::En
        };
        debug!(en_hits, fr_hits, "Detected language '{}'", detected.as_str());
        detected
    }

    fn name(&self) -> &str {
        "stopword"
    }
}

/// Trigram-statistics detection restricted to the supported languages.
/// Text whatlang cannot classify (empty, digits only) gets `fallback`.
pub struct WhatlangLanguageDetector {
    detector: Detector,
    fallback: Language,
}

impl WhatlangLanguageDetector {
    pub fn new(fallback: Language) -> Self {
        Self {
            detector: Detector::with_allowlist(vec![Lang::Eng, Lang::Fra]),
            fallback,
        }
    }
}

impl LanguageDetector for WhatlangLanguageDetector {
    fn detect(&self, text: &str) -> Language {
        match self.detector.detect(text) {
            Some(info) => {
                let detected = match info.lang() {
                    Lang::Fra => Language::Fr,
                    _ => Language::En,
                };
                debug!(
                    confidence = info.confidence(),
                    reliable = info.is_reliable(),
                    "Detected language '{}'",
                    detected.as_str()
                );
                detected
            }
            None => {
                debug!("Language undetectable, using '{}'", self.fallback.as_str());
                self.fallback
            }
        }
    }

    fn name(&self) -> &str {
        "whatlang"
    }
}

/// Which detector backs automatic detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectorBackend {
    #[default]
    Whatlang,
    Stopword,
}

impl DetectorBackend {
    pub fn from_name(name: &str) -> Option<DetectorBackend> {
        match name.trim().to_ascii_lowercase().as_str() {
            "whatlang" => Some(DetectorBackend::Whatlang),
            "stopword" | "stopwords" => Some(DetectorBackend::Stopword),
            _ => None,
        }
    }
}

/// Used when detection is switched off; every document gets the configured default.
pub struct FixedLanguageDetector(pub Language);

impl LanguageDetector for FixedLanguageDetector {
    fn detect(&self, _text: &str) -> Language {
        self.0
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Resolves the analysis language: a supported override wins, an unsupported one
/// recovers to `default`, and no override defers to the detector.
pub fn resolve_language(
    text: &str,
    override_tag: Option<&str>,
    detector: &dyn LanguageDetector,
    default: Language,
) -> Language {
    match override_tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => Language::from_tag_or(tag, default),
        None => detector.detect(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> StopwordLanguageDetector {
        StopwordLanguageDetector::new(Arc::new(Dictionary::builtin()))
    }

    #[test]
    fn test_detects_french() {
        let text = "Je suis développeur avec une expérience dans les projets de la banque et des assurances.";
        assert_eq!(detector().detect(text), Language::Fr);
    }

    #[test]
    fn test_detects_english() {
        let text = "I am a developer with experience in the banking sector and a passion for the cloud.";
        assert_eq!(detector().detect(text), Language::En);
    }

    #[test]
    fn test_tie_defaults_to_english() {
        assert_eq!(detector().detect("Python Docker Kubernetes"), Language::En);
        assert_eq!(detector().detect(""), Language::En);
    }

    #[test]
    fn test_override_wins_over_detector() {
        let text = "the and for with that this from";
        let lang = resolve_language(text, Some("FR"), &detector(), Language::En);
        assert_eq!(lang, Language::Fr);
    }

    #[test]
    fn test_unsupported_override_uses_default() {
        let text = "les des pour avec une dans sur";
        let lang = resolve_language(text, Some("de"), &detector(), Language::En);
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn test_blank_override_defers_to_detector() {
        let text = "les des pour avec une dans sur";
        let lang = resolve_language(text, Some("  "), &detector(), Language::En);
        assert_eq!(lang, Language::Fr);
    }

    #[test]
    fn test_whatlang_detects_french_cv() {
        let text = "Développeur backend depuis cinq ans, j'ai conduit la migration \
                    des applications bancaires vers une architecture en microservices \
                    et encadré une équipe de quatre personnes.";
        let detector = WhatlangLanguageDetector::new(Language::En);
        assert_eq!(detector.detect(text), Language::Fr);
    }

    #[test]
    fn test_whatlang_detects_english_cv() {
        let text = "Backend developer for five years, I led the migration of banking \
                    applications to a microservice architecture and mentored a team \
                    of four engineers.";
        let detector = WhatlangLanguageDetector::new(Language::Fr);
        assert_eq!(detector.detect(text), Language::En);
    }

    #[test]
    fn test_whatlang_undetectable_uses_fallback() {
        let detector = WhatlangLanguageDetector::new(Language::Fr);
        assert_eq!(detector.detect(""), Language::Fr);
        assert_eq!(detector.name(), "whatlang");
    }

    #[test]
    fn test_detector_backend_from_name() {
        assert_eq!(
            DetectorBackend::from_name("Whatlang"),
            Some(DetectorBackend::Whatlang)
        );
        assert_eq!(
            DetectorBackend::from_name("stopword"),
            Some(DetectorBackend::Stopword)
        );
        assert_eq!(DetectorBackend::from_name("langid"), None);
    }

    #[test]
    fn test_fixed_detector() {
        let fixed = FixedLanguageDetector(Language::Fr);
        assert_eq!(fixed.detect("the the the"), Language::Fr);
        assert_eq!(fixed.name(), "fixed");
    }
}
