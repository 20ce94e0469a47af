//! Turns raw text into a `TokenSet`.
//!
//! Two strategies, kept separate because they disagree on symbols and short words:
//! - `SynonymExpanding`: punctuation-splitting, keeps `c++`/`c#`, adds synonym aliases.
//! - `StrictLetters`: runs of ≥ 2 letters only, no synonyms. Used for stop-word-aware matching.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::dictionary::Dictionary;

/// Characters turned into spaces before splitting.
const SPLIT_CHARS: &[char] = &['/', ',', ':', '(', ')', '-'];

/// Characters trimmed from both ends of every raw token.
const EDGE_PUNCTUATION: &[char] = &['.', '?', '!', ';', '*'];

static KEEP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w+#]+$").unwrap());
static LETTER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Alphabetic}{2,}").unwrap());

/// A deduplicated, lexicographically ordered set of normalized tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    #[cfg(test)]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tokens present in both sets, in order.
    pub fn intersection<'a>(&'a self, other: &'a TokenSet) -> impl Iterator<Item = &'a str> {
        self.0.intersection(&other.0).map(String::as_str)
    }

    /// Tokens of `self` absent from `other`, in order.
    pub fn difference<'a>(&'a self, other: &'a TokenSet) -> impl Iterator<Item = &'a str> {
        self.0.difference(&other.0).map(String::as_str)
    }

    /// Re-joins the tokens as space-separated text.
    #[cfg(test)]
    pub fn to_text(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Tokenization strategy. Chosen once per engine, see `Config::token_strategy`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStrategy {
    #[default]
    SynonymExpanding,
    StrictLetters,
}

impl TokenStrategy {
    pub fn from_name(name: &str) -> Option<TokenStrategy> {
        match name.trim().to_ascii_lowercase().as_str() {
            "synonym_expanding" | "synonyms" => Some(TokenStrategy::SynonymExpanding),
            "strict_letters" | "strict" => Some(TokenStrategy::StrictLetters),
            _ => None,
        }
    }

    pub fn normalize(&self, text: &str, dictionary: &Dictionary) -> TokenSet {
        match self {
            TokenStrategy::SynonymExpanding => normalize_with_synonyms(text, dictionary),
            TokenStrategy::StrictLetters => normalize_strict(text),
        }
    }

    /// Whether stop words should be dropped from reported missing keywords.
    pub fn filters_stop_words(&self) -> bool {
        matches!(self, TokenStrategy::StrictLetters)
    }
}

/// Punctuation-splitting tokenizer with synonym expansion.
///
/// Synonym lookup runs on the stripped token *before* the keep-pattern filter,
/// so `node.js` contributes `node` even though `node.js` itself is rejected.
pub fn normalize_with_synonyms(text: &str, dictionary: &Dictionary) -> TokenSet {
    let lowered = text.to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|c| if SPLIT_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    let mut tokens = TokenSet::new();
    for raw in spaced.split_whitespace() {
        let token = raw.trim_matches(EDGE_PUNCTUATION);
        if token.is_empty() {
            continue;
        }
        if let Some(canonical) = dictionary.canonical(token) {
            tokens.insert(canonical);
        }
        if KEEP_PATTERN.is_match(token) {
            tokens.insert(token);
        }
    }
    tokens
}

/// Maximal runs of at least two Unicode letters, lowercased.
pub fn normalize_strict(text: &str) -> TokenSet {
    let lowered = text.to_lowercase();
    LETTER_RUN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .collect()
}
