//! Regex detection of email, phone and profile links.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap());

/// Optional `+NNN`/`00NNN` prefix or a leading `0`, then `[1-9]` and four digit pairs
/// (European layout, pairs optionally separated by space, dot or hyphen).
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:\+|00)\d{1,3}|0)\s*[1-9](?:[\s.-]*\d{2}){4}").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w-]+").unwrap());

static CODE_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:github\.com|gitlab\.com)/[\w-]+").unwrap());

const EMAIL_POINTS: u32 = 40;
const PHONE_POINTS: u32 = 40;
const PROFILE_POINTS: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: bool,
    /// GitHub or GitLab profile link.
    pub github: bool,
    /// 0 – 100
    pub score: u32,
}

pub fn extract_contacts(raw_text: &str) -> ContactInfo {
    let email = EMAIL_RE.find(raw_text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(raw_text).map(|m| m.as_str().to_string());
    let linkedin = LINKEDIN_RE.is_match(raw_text);
    let github = CODE_HOST_RE.is_match(raw_text);

    let mut score = 0;
    if email.is_some() {
        score += EMAIL_POINTS;
    }
    if phone.is_some() {
        score += PHONE_POINTS;
    }
    if linkedin || github {
        score += PROFILE_POINTS;
    }

    ContactInfo {
        email,
        phone,
        linkedin,
        github,
        score: score.min(100),
    }
}
