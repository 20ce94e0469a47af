//! Bilingual keyword, section and stop-word tables.
//!
//! Built once at startup (`Dictionary::builtin()` or a JSON override file) and
//! shared read-only through `Arc<Dictionary>`. Nothing here is ever mutated
//! after construction.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Keys
// ────────────────────────────────────────────────────────────────────────────

/// Supported CV languages. Anything else falls back to the default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    /// Parses a language tag such as `"fr"`, `"FR"` or `"fr-CA"`.
    pub fn from_tag(tag: &str) -> Option<Language> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or("");
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "fr" => Some(Language::Fr),
            _ => None,
        }
    }

    /// Like `from_tag`, but unsupported tags recover to `fallback`.
    pub fn from_tag_or(tag: &str, fallback: Language) -> Language {
        Language::from_tag(tag).unwrap_or_else(|| {
            debug!("Unsupported language tag '{tag}', using '{}'", fallback.as_str());
            fallback
        })
    }
}

/// The five canonical CV sections, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Experience,
    Education,
    Skills,
    Projects,
    Languages,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Languages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Languages => "Languages",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

/// Everything the engine needs for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageTables {
    /// Target vocabulary for Generic-Audit mode.
    pub generic_keywords: BTreeSet<String>,
    /// Lowercase trigger substrings per section.
    pub sections: BTreeMap<Section, Vec<String>>,
    #[serde(default)]
    pub stop_words: BTreeSet<String>,
}

impl LanguageTables {
    pub fn triggers(&self, section: Section) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

static EMPTY_TABLES: Lazy<LanguageTables> = Lazy::new(LanguageTables::default);

/// Immutable, language-keyed dictionary plus the language-independent synonym map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    /// surface form → canonical alias (e.g. `github` → `git`)
    pub synonyms: BTreeMap<String, String>,
    pub languages: BTreeMap<Language, LanguageTables>,
}

impl Dictionary {
    #[cfg(test)]
    pub fn new(
        synonyms: BTreeMap<String, String>,
        languages: BTreeMap<Language, LanguageTables>,
    ) -> Self {
        Self {
            synonyms,
            languages,
        }
    }

    /// The built-in English/French tables.
    pub fn builtin() -> Self {
        let synonyms = SYNONYMS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut languages = BTreeMap::new();
        languages.insert(
            Language::En,
            build_tables(EN_GENERIC_KEYWORDS, EN_SECTIONS, EN_STOP_WORDS),
        );
        languages.insert(
            Language::Fr,
            build_tables(FR_GENERIC_KEYWORDS, FR_SECTIONS, FR_STOP_WORDS),
        );

        Self {
            synonyms,
            languages,
        }
    }

    /// Loads a dictionary from a JSON file with the same shape as the serialized builtin.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary file '{}'", path.display()))?;
        let dictionary: Dictionary = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid dictionary JSON in '{}'", path.display()))?;
        Ok(dictionary)
    }

    /// Tables for `language`, falling back to English, then to empty tables.
    pub fn tables(&self, language: Language) -> &LanguageTables {
        self.languages
            .get(&language)
            .or_else(|| {
                debug!(
                    "No tables for '{}', falling back to '{}'",
                    language.as_str(),
                    Language::En.as_str()
                );
                self.languages.get(&Language::En)
            })
            .unwrap_or(&EMPTY_TABLES)
    }

    /// Stop word in any supported language, whatever the language of the CV.
    pub fn is_any_stop_word(&self, word: &str) -> bool {
        Language::ALL
            .into_iter()
            .filter_map(|language| self.languages.get(&language))
            .any(|tables| tables.is_stop_word(word))
    }

    pub fn canonical(&self, token: &str) -> Option<&str> {
        self.synonyms.get(token).map(String::as_str)
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn build_tables(
    keywords: &[&str],
    sections: &[(Section, &[&str])],
    stop_words: &[&str],
) -> LanguageTables {
    LanguageTables {
        generic_keywords: keywords.iter().map(|s| s.to_string()).collect(),
        sections: sections
            .iter()
            .map(|(section, triggers)| {
                (*section, triggers.iter().map(|s| s.to_string()).collect())
            })
            .collect(),
        stop_words: stop_words.iter().map(|s| s.to_string()).collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in data
// ────────────────────────────────────────────────────────────────────────────

const SYNONYMS: &[(&str, &str)] = &[
    ("github", "git"),
    ("gitlab", "git"),
    ("reactjs", "react"),
    ("node.js", "node"),
    ("nodejs", "node"),
    ("agiles", "agile"),
    ("scrums", "scrum"),
    ("equipe", "équipe"),
    ("teams", "team"),
];

const EN_GENERIC_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "sql",
    "html",
    "css",
    "react",
    "node",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "linux",
    "git",
    "agile",
    "scrum",
    "communication",
    "leadership",
];

const FR_GENERIC_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "c++",
    "c#",
    "javascript",
    "sql",
    "html",
    "css",
    "react",
    "node",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "linux",
    "git",
    "agile",
    "scrum",
    "communication",
    "gestion",
    "équipe",
    "anglais",
];

const EN_SECTIONS: &[(Section, &[&str])] = &[
    (
        Section::Experience,
        &["experience", "work history", "employment", "job history"],
    ),
    (
        Section::Education,
        &["education", "academic", "university", "degree"],
    ),
    (
        Section::Skills,
        &["skills", "competencies", "technologies", "stack"],
    ),
    (
        Section::Projects,
        &["projects", "portfolio", "personal projects"],
    ),
    (Section::Languages, &["languages", "linguistic"]),
];

const FR_SECTIONS: &[(Section, &[&str])] = &[
    (
        Section::Experience,
        &[
            "expérience",
            "parcours professionnel",
            "emploi",
            "postes",
            "stages",
        ],
    ),
    (
        Section::Education,
        &["formation", "éducation", "diplômes", "cursus", "académique"],
    ),
    (
        Section::Skills,
        &[
            "compétences",
            "technologies",
            "outils",
            "technique",
            "programmation",
        ],
    ),
    (
        Section::Projects,
        &["projets", "réalisations", "travaux", "portfolio"],
    ),
    (Section::Languages, &["langues", "linguistique"]),
];

const EN_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "your", "will", "have", "are", "was",
    "were", "has", "had", "been", "our", "you", "they", "their", "them", "who", "which", "what",
    "when", "where", "into", "about", "over", "than", "then", "also", "such", "can", "not", "but",
    "all", "any", "its", "his", "her", "an", "as", "at", "be", "by", "in", "is", "it", "of", "on",
    "or", "to", "we", "my", "me", "us", "so", "if", "do", "up",
];

const FR_STOP_WORDS: &[&str] = &[
    "les", "des", "pour", "avec", "une", "dans", "sur", "par", "le", "la", "de", "du", "et", "un",
    "au", "aux", "est", "sont", "qui", "que", "nous", "vous", "ce", "cette", "ces", "son", "sa",
    "ses", "leur", "leurs", "plus", "pas", "ne", "il", "elle", "ou", "mais", "été", "être",
    "avoir", "chez", "entre", "vos", "votre", "notre", "nos", "je", "mes", "mon", "ma", "tout",
    "sans", "sous", "dont", "afin", "ainsi",
];
