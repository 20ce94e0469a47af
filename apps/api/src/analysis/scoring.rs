//! Combines keyword, section, contact and length signals.
//!
//! Default weighting: 0.45 keywords + 0.25 sections + 0.20 contacts + 0.10 length.
//! Pure and synchronous; the only shared input is the read-only `Dictionary`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::contacts::{extract_contacts, ContactInfo};
use crate::analysis::dictionary::{Dictionary, Language, Section};
use crate::analysis::sections::{detect_sections, SectionReport};
use crate::analysis::tokenizer::{TokenSet, TokenStrategy};

/// Job text must be longer than this (trimmed, in characters) to enable Job-Match mode.
const MIN_JOB_TEXT_CHARS: usize = 10;
const MAX_MISSING_REPORTED: usize = 15;
const MIN_DISTINCT_TOKENS: usize = 300;
const MAX_DISTINCT_TOKENS: usize = 1200;
const LOW_MATCH_THRESHOLD: f64 = 50.0;
const HIGH_MATCH_THRESHOLD: f64 = 80.0;
pub const DEFAULT_PREVIEW_CHARS: usize = 800;

pub const GENERIC_AUDIT_NOTICE: &str = "General Audit Mode (No Job Description provided).";
pub const MISSING_EMAIL_ADVICE: &str = "Critical: Add your Email address.";
pub const MISSING_PHONE_ADVICE: &str = "Critical: Add your Phone number.";
pub const MISSING_PROJECTS_ADVICE: &str =
    "Tip: Add a 'Projects' or 'Réalisations' section to showcase your work.";
pub const LOW_MATCH_ADVICE: &str =
    "Low match score. Tailor your CV specifically to the keywords in the job description.";
pub const HIGH_MATCH_ADVICE: &str = "Great match! Your CV is well-optimized.";

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Target vocabulary = tokens of the supplied job description.
    JobMatch,
    /// Target vocabulary = the language's static generic keyword set.
    GenericAudit,
}

/// Per-factor sub-scores, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub keywords: u32,
    pub sections: u32,
    pub contacts: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0 – 100
    pub total_score: u32,
    pub mode: AnalysisMode,
    pub language: Language,
    pub sub_scores: SubScores,
    pub matched_keywords: Vec<String>,
    /// At most 15, lexicographic.
    pub missing_keywords: Vec<String>,
    pub sections: SectionReport,
    pub contacts: ContactInfo,
    /// Number of *distinct* normalized CV tokens. This is what the advice calls
    /// "words"; it is not a literal word count.
    pub distinct_token_count: usize,
    pub advice: Vec<String>,
    pub text_preview: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keywords: f64,
    pub sections: f64,
    pub contacts: f64,
    pub length: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keywords: 0.45,
            sections: 0.25,
            contacts: 0.20,
            length: 0.10,
        }
    }
}

/// Weighted sum of the four sub-scores, clamped to 0 – 100.
pub fn compute_total_score(
    keywords: f64,
    sections: f64,
    contacts: f64,
    length: f64,
    weights: &ScoringWeights,
) -> f64 {
    (weights.keywords * keywords
        + weights.sections * sections
        + weights.contacts * contacts
        + weights.length * length)
        .clamp(0.0, 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    dictionary: Arc<Dictionary>,
    weights: ScoringWeights,
    strategy: TokenStrategy,
    preview_chars: usize,
}

impl ScoringEngine {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self {
            dictionary,
            weights: ScoringWeights::default(),
            strategy: TokenStrategy::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_strategy(mut self, strategy: TokenStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn strategy(&self) -> TokenStrategy {
        self.strategy
    }

    /// Scores a CV, optionally against a job description, in the given language.
    ///
    /// Never fails: weak input only lowers the score and adds advice.
    pub fn score(&self, cv_text: &str, job_text: Option<&str>, language: Language) -> AnalysisResult {
        let tables = self.dictionary.tables(language);
        let cv_tokens = self.strategy.normalize(cv_text, &self.dictionary);
        let distinct_token_count = cv_tokens.len();
        let mut advice = Vec::new();

        // Mode and target vocabulary
        let (mode, target) = match job_text.filter(|j| j.trim().chars().count() > MIN_JOB_TEXT_CHARS) {
            Some(job) => (
                AnalysisMode::JobMatch,
                self.strategy.normalize(job, &self.dictionary),
            ),
            None => {
                advice.push(GENERIC_AUDIT_NOTICE.to_string());
                (
                    AnalysisMode::GenericAudit,
                    tables.generic_keywords.iter().cloned().collect::<TokenSet>(),
                )
            }
        };

        // Keyword overlap
        let matched_keywords: Vec<String> =
            cv_tokens.intersection(&target).map(String::from).collect();
        let missing_keywords: Vec<String> = target
            .difference(&cv_tokens)
            .filter(|kw| {
                !(self.strategy.filters_stop_words() && self.dictionary.is_any_stop_word(kw))
            })
            .take(MAX_MISSING_REPORTED)
            .map(String::from)
            .collect();
        let keyword_score = keyword_coverage(matched_keywords.len(), target.len());

        let sections = detect_sections(cv_text, language, &self.dictionary);
        let contacts = extract_contacts(cv_text);

        let length = length_score(distinct_token_count);
        if distinct_token_count < MIN_DISTINCT_TOKENS {
            advice.push(format!(
                "CV is short ({distinct_token_count} words). Aim for {MIN_DISTINCT_TOKENS}+."
            ));
        }

        let total = compute_total_score(
            keyword_score,
            sections.score,
            contacts.score as f64,
            length as f64,
            &self.weights,
        );

        advice.extend(build_advice(mode, keyword_score, &contacts, &sections));

        debug!(
            mode = ?mode,
            language = language.as_str(),
            target = target.len(),
            matched = matched_keywords.len(),
            distinct_token_count,
            total,
            "CV scored"
        );

        AnalysisResult {
            total_score: total.round_ties_even() as u32,
            mode,
            language,
            sub_scores: SubScores {
                keywords: keyword_score.round_ties_even() as u32,
                sections: sections.score.round_ties_even() as u32,
                contacts: contacts.score,
                length,
            },
            matched_keywords,
            missing_keywords,
            sections,
            contacts,
            distinct_token_count,
            advice,
            text_preview: preview(cv_text, self.preview_chars),
        }
    }
}

/// |matches| / |target| × 100; an empty target scores 0.
fn keyword_coverage(matched: usize, target: usize) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (matched as f64 / target as f64 * 100.0).clamp(0.0, 100.0)
}

fn length_score(distinct_token_count: usize) -> u32 {
    if (MIN_DISTINCT_TOKENS..=MAX_DISTINCT_TOKENS).contains(&distinct_token_count) {
        100
    } else {
        50
    }
}

/// Contact, section and match-quality advice, in a fixed order.
fn build_advice(
    mode: AnalysisMode,
    keyword_score: f64,
    contacts: &ContactInfo,
    sections: &SectionReport,
) -> Vec<String> {
    let mut advice = Vec::new();

    if contacts.email.is_none() {
        advice.push(MISSING_EMAIL_ADVICE.to_string());
    }
    if contacts.phone.is_none() {
        advice.push(MISSING_PHONE_ADVICE.to_string());
    }
    if sections.is_missing(Section::Projects) {
        advice.push(MISSING_PROJECTS_ADVICE.to_string());
    }
    if mode == AnalysisMode::JobMatch {
        if keyword_score < LOW_MATCH_THRESHOLD {
            advice.push(LOW_MATCH_ADVICE.to_string());
        } else if keyword_score >= HIGH_MATCH_THRESHOLD {
            advice.push(HIGH_MATCH_ADVICE.to_string());
        }
    }

    advice
}

/// First `max_chars` characters followed by `...`.
fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::analysis::dictionary::LanguageTables;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(Arc::new(Dictionary::builtin()))
    }

    /// `n` distinct filler tokens that hit no dictionary entry.
    fn filler(n: usize) -> String {
        (0..n).map(|i| format!("zq{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_generic_audit_without_matches_scores_zero_keywords() {
        let result = engine().score("Bonjour le monde, rien ici", None, Language::En);
        assert_eq!(result.mode, AnalysisMode::GenericAudit);
        assert_eq!(result.sub_scores.keywords, 0);
        assert!(result.matched_keywords.is_empty());
        assert_eq!(result.advice[0], GENERIC_AUDIT_NOTICE);
        assert_eq!(result.missing_keywords.len(), 15);
    }

    #[test]
    fn test_short_job_text_falls_back_to_generic_audit() {
        let result = engine().score("python docker", Some("  rust   "), Language::En);
        assert_eq!(result.mode, AnalysisMode::GenericAudit);
        assert_eq!(result.matched_keywords, vec!["docker", "python"]);
    }

    #[test]
    fn test_job_match_superset_scores_100() {
        let job = "Rust engineer: Docker, Kubernetes, PostgreSQL";
        let cv = "Rust engineer with Docker, Kubernetes, PostgreSQL, Linux and Python";
        let result = engine().score(cv, Some(job), Language::En);
        assert_eq!(result.mode, AnalysisMode::JobMatch);
        assert_eq!(result.sub_scores.keywords, 100);
        assert!(result.missing_keywords.is_empty());
        assert!(result.advice.contains(&HIGH_MATCH_ADVICE.to_string()));
        assert!(!result.advice.contains(&GENERIC_AUDIT_NOTICE.to_string()));
    }

    #[test]
    fn test_job_match_low_overlap_warns() {
        let job = "Senior Java developer with Spring, Kafka, Oracle and Kotlin";
        let cv = "Python developer";
        let result = engine().score(cv, Some(job), Language::En);
        assert!(result.sub_scores.keywords < 50);
        assert!(result.advice.contains(&LOW_MATCH_ADVICE.to_string()));
        assert!(result.missing_keywords.contains(&"kafka".to_string()));
    }

    #[test]
    fn test_short_cv_gets_length_advice_with_count() {
        let result = engine().score(&filler(50), None, Language::En);
        assert_eq!(result.distinct_token_count, 50);
        assert_eq!(result.sub_scores.length, 50);
        assert!(result
            .advice
            .iter()
            .any(|a| a.contains("CV is short (50 words)") && a.contains("300")));
    }

    #[test]
    fn test_length_window_is_inclusive() {
        assert_eq!(length_score(299), 50);
        assert_eq!(length_score(300), 100);
        assert_eq!(length_score(1200), 100);
        assert_eq!(length_score(1201), 50);

        let result = engine().score(&filler(300), None, Language::En);
        assert_eq!(result.sub_scores.length, 100);
        assert!(!result.advice.iter().any(|a| a.starts_with("CV is short")));
    }

    #[test]
    fn test_distinct_token_count_ignores_repeats() {
        let result = engine().score("rust rust rust RUST go", None, Language::En);
        assert_eq!(result.distinct_token_count, 2);
    }

    #[test]
    fn test_full_cv_weighted_total() {
        // 19 generic keywords, all present → keywords 100
        // 5/5 sections → 100, full contacts → 100, < 300 tokens → length 50
        let cv = "Experience Education Skills Projects Languages \
                  python java c++ javascript sql html css react node docker kubernetes \
                  aws azure linux git agile scrum communication leadership \
                  jane@example.com +33 6 12 34 56 78 github.com/jane";
        let result = engine().score(cv, None, Language::En);
        assert_eq!(result.sub_scores.keywords, 100);
        assert_eq!(result.sub_scores.sections, 100);
        assert_eq!(result.sub_scores.contacts, 100);
        assert_eq!(result.sub_scores.length, 50);
        // 45 + 25 + 20 + 5
        assert_eq!(result.total_score, 95);
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_advice_order() {
        let result = engine().score("nothing useful", None, Language::En);
        let expected = vec![
            GENERIC_AUDIT_NOTICE.to_string(),
            "CV is short (2 words). Aim for 300+.".to_string(),
            MISSING_EMAIL_ADVICE.to_string(),
            MISSING_PHONE_ADVICE.to_string(),
            MISSING_PROJECTS_ADVICE.to_string(),
        ];
        assert_eq!(result.advice, expected);
    }

    #[test]
    fn test_empty_target_is_division_safe() {
        let dict = Dictionary::new(BTreeMap::new(), BTreeMap::new());
        let engine = ScoringEngine::new(Arc::new(dict));
        let result = engine.score("python docker", None, Language::Fr);
        assert_eq!(result.sub_scores.keywords, 0);
        assert!(result.missing_keywords.is_empty());
        assert!(result.total_score <= 100);
    }

    #[test]
    fn test_job_text_of_only_symbols_is_division_safe() {
        let result = engine().score("python", Some("--- /// ::: ((( )))"), Language::En);
        assert_eq!(result.mode, AnalysisMode::JobMatch);
        assert_eq!(result.sub_scores.keywords, 0);
    }

    #[test]
    fn test_synthetic_dictionary_is_used() {
        let mut languages = BTreeMap::new();
        languages.insert(
            Language::En,
            LanguageTables {
                generic_keywords: ["rust", "tokio"].iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        );
        let engine = ScoringEngine::new(Arc::new(Dictionary::new(BTreeMap::new(), languages)));
        let result = engine.score("I write Rust", None, Language::En);
        assert_eq!(result.sub_scores.keywords, 50);
        assert_eq!(result.matched_keywords, vec!["rust"]);
        assert_eq!(result.missing_keywords, vec!["tokio"]);
    }

    #[test]
    fn test_strict_strategy_drops_stop_words_from_missing() {
        let job = "Experience with the Rust language and distributed systems";
        let result = engine()
            .with_strategy(TokenStrategy::StrictLetters)
            .score("Rust", Some(job), Language::En);
        assert!(!result.missing_keywords.contains(&"the".to_string()));
        assert!(!result.missing_keywords.contains(&"with".to_string()));
        assert!(result.missing_keywords.contains(&"distributed".to_string()));
        // stop words still count toward the denominator: 1/8 = 12.5, ties to even
        assert_eq!(result.sub_scores.keywords, 12);
    }

    #[test]
    fn test_strict_strategy_drops_stop_words_of_other_language() {
        let job = "Experience with the Rust language and distributed systems";
        let result = engine()
            .with_strategy(TokenStrategy::StrictLetters)
            .score("Je code en Rust", Some(job), Language::Fr);
        assert!(!result.missing_keywords.contains(&"the".to_string()));
        assert!(!result.missing_keywords.contains(&"with".to_string()));
        assert!(!result.missing_keywords.contains(&"and".to_string()));
        assert!(result.missing_keywords.contains(&"systems".to_string()));
    }

    #[test]
    fn test_half_scores_round_to_even() {
        let job = "alpha beta gamma delta epsilon zeta eta theta";
        let result = engine().score("alpha", Some(job), Language::En);
        // keywords 1/8 = 12.5 -> 12; total 0.45 * 12.5 + 0.10 * 50 = 10.625 -> 11
        assert_eq!(result.sub_scores.keywords, 12);
        assert_eq!(result.total_score, 11);
    }

    #[test]
    fn test_missing_keywords_capped_and_sorted() {
        let job = (0..40).map(|i| format!("kw{i:02}")).collect::<Vec<_>>().join(" ");
        let result = engine().score("nothing", Some(&job), Language::En);
        assert_eq!(result.missing_keywords.len(), 15);
        let mut sorted = result.missing_keywords.clone();
        sorted.sort();
        assert_eq!(result.missing_keywords, sorted);
        assert_eq!(result.missing_keywords[0], "kw00");
    }

    #[test]
    fn test_scores_bounded_for_odd_inputs() {
        let long = filler(1500);
        let inputs = ["", "   ", "€€€ ### +++", "ÉQUIPE équipe equipe", long.as_str()];
        for cv in inputs {
            for job in [None, Some("a job description long enough")] {
                let result = engine().score(cv, job, Language::Fr);
                assert!(result.total_score <= 100);
                let s = result.sub_scores;
                for sub in [s.keywords, s.sections, s.contacts, s.length] {
                    assert!(sub <= 100);
                }
            }
        }
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(900);
        let result = engine().with_preview_chars(10).score(&text, None, Language::Fr);
        assert_eq!(result.text_preview, format!("{}...", "é".repeat(10)));
    }

    #[test]
    fn test_french_generic_audit_uses_french_keywords() {
        let result = engine().score("Gestion d'équipe, anglais courant", None, Language::Fr);
        assert!(result.matched_keywords.contains(&"gestion".to_string()));
        assert!(result.matched_keywords.contains(&"anglais".to_string()));
        assert_eq!(result.language, Language::Fr);
    }

    #[test]
    fn test_compute_total_score_clamped() {
        let w = ScoringWeights {
            keywords: 1.0,
            sections: 1.0,
            contacts: 1.0,
            length: 1.0,
        };
        assert_eq!(compute_total_score(100.0, 100.0, 100.0, 100.0, &w), 100.0);
        assert_eq!(
            compute_total_score(0.0, 0.0, 0.0, 0.0, &ScoringWeights::default()),
            0.0
        );
    }
}
