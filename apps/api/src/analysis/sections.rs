//! Which canonical sections a CV appears to contain.
//!
//! Matching is plain substring containment on lowercased text (no word
//! boundaries), so "experienced" also triggers Experience.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::dictionary::{Dictionary, Language, Section};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub found: Vec<Section>,
    pub missing: Vec<Section>,
    /// found / 5 × 100, unrounded
    pub score: f64,
}

impl SectionReport {
    pub fn is_missing(&self, section: Section) -> bool {
        self.missing.contains(&section)
    }
}

pub fn detect_sections(raw_text: &str, language: Language, dictionary: &Dictionary) -> SectionReport {
    let text = raw_text.to_lowercase();
    let tables = dictionary.tables(language);

    let (found, missing): (Vec<Section>, Vec<Section>) = Section::ALL
        .into_iter()
        .partition(|section| {
            tables
                .triggers(*section)
                .iter()
                .any(|trigger| text.contains(trigger.as_str()))
        });

    let score = found.len() as f64 / Section::ALL.len() as f64 * 100.0;
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(Section::as_str).collect();
        debug!(language = language.as_str(), "Missing sections: {}", names.join(", "));
    }

    SectionReport {
        found,
        missing,
        score,
    }
}
