// CV analysis core: tokenization, dictionaries, contact/section detection, scoring.
// No I/O in here; extraction lives in `crate::extraction`.

pub mod contacts;
pub mod dictionary;
pub mod language;
pub mod scoring;
pub mod sections;
pub mod tokenizer;

use std::sync::Arc;

use tracing::info;

use crate::analysis::dictionary::Language;
use crate::analysis::language::{resolve_language, LanguageDetector};
use crate::analysis::scoring::{AnalysisResult, ScoringEngine};

/// Entry point used by the HTTP layer: language resolution followed by scoring.
#[derive(Clone)]
pub struct Analyzer {
    engine: ScoringEngine,
    detector: Arc<dyn LanguageDetector>,
    default_language: Language,
}

impl Analyzer {
    pub fn new(
        engine: ScoringEngine,
        detector: Arc<dyn LanguageDetector>,
        default_language: Language,
    ) -> Self {
        Self {
            engine,
            detector,
            default_language,
        }
    }

    /// `language` is an optional caller override (`"en"` / `"fr"`); without it the
    /// detector decides.
    pub fn analyze(
        &self,
        cv_text: &str,
        job_text: Option<&str>,
        language: Option<&str>,
    ) -> AnalysisResult {
        let language = resolve_language(
            cv_text,
            language,
            self.detector.as_ref(),
            self.default_language,
        );
        let result = self.engine.score(cv_text, job_text, language);
        info!(
            total_score = result.total_score,
            mode = ?result.mode,
            language = language.as_str(),
            "Analysis complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dictionary::Dictionary;
    use crate::analysis::language::{FixedLanguageDetector, StopwordLanguageDetector};
    use crate::analysis::scoring::AnalysisMode;

    fn analyzer() -> Analyzer {
        let dictionary = Arc::new(Dictionary::builtin());
        Analyzer::new(
            ScoringEngine::new(dictionary.clone()),
            Arc::new(StopwordLanguageDetector::new(dictionary)),
            Language::En,
        )
    }

    #[test]
    fn test_detects_french_cv_without_override() {
        let cv = "Je suis développeur. Compétences : Python, gestion de projets, anglais. \
                  Expérience dans les banques et des assurances pour une équipe agile.";
        let result = analyzer().analyze(cv, None, None);
        assert_eq!(result.language, Language::Fr);
        assert!(result.matched_keywords.contains(&"gestion".to_string()));
    }

    #[test]
    fn test_override_beats_detection() {
        let cv = "Je suis développeur avec une expérience dans les banques";
        let result = analyzer().analyze(cv, None, Some("en"));
        assert_eq!(result.language, Language::En);
    }

    #[test]
    fn test_job_text_switches_mode() {
        let result = analyzer().analyze(
            "Rust and Tokio developer",
            Some("Looking for a Rust developer"),
            None,
        );
        assert_eq!(result.mode, AnalysisMode::JobMatch);
    }

    #[test]
    fn test_fixed_detector_uses_configured_language() {
        let dictionary = Arc::new(Dictionary::builtin());
        let analyzer = Analyzer::new(
            ScoringEngine::new(dictionary),
            Arc::new(FixedLanguageDetector(Language::Fr)),
            Language::Fr,
        );
        let result = analyzer.analyze("the and for with", None, None);
        assert_eq!(result.language, Language::Fr);
    }
}
