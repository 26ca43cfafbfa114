//! Name matching against weekly unavailability sets.
//!
//! Weekly contexts name people the way part assignments spell them, which
//! rarely matches roster display names exactly. Eligibility checks go
//! through a [`NameMatcher`] so the matching heuristic can be swapped
//! without touching eligibility logic.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Person;

/// Decides whether a person is named in a set of names.
pub trait NameMatcher: Send + Sync + Debug {
    /// Whether `person` appears in `names`.
    fn matches(&self, person: &Person, names: &BTreeSet<String>) -> bool;
}

/// Exact membership on the person's id or display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl NameMatcher for ExactMatcher {
    fn matches(&self, person: &Person, names: &BTreeSet<String>) -> bool {
        names.contains(&person.id) || names.contains(&person.name)
    }
}

const HONORIFICS: [&str; 9] = [
    "brother", "sister", "bro", "sis", "br", "mr", "mrs", "ms", "dr",
];

/// Normalizing matcher.
///
/// Both sides are normalized before comparison: diacritics folded,
/// lowercased, punctuation dropped, leading honorifics stripped,
/// whitespace collapsed, and the first name mapped through a nickname
/// table to its canonical form.
#[derive(Debug, Clone, Default)]
pub struct NormalizedMatcher {
    nicknames: HashMap<String, String>,
}

impl NormalizedMatcher {
    /// Creates a matcher with an empty nickname table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `nickname` to `canonical` (e.g. "bill" → "william").
    pub fn with_nickname(mut self, nickname: &str, canonical: &str) -> Self {
        self.nicknames.insert(fold(nickname), fold(canonical));
        self
    }

    /// Normalizes a free-text name.
    pub fn normalize(&self, raw: &str) -> String {
        let folded = fold(raw);
        let mut words: Vec<&str> = folded.split_whitespace().collect();
        while words.len() > 1 && HONORIFICS.contains(&words[0]) {
            words.remove(0);
        }
        let mut out: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        if let Some(first) = out.first_mut() {
            if let Some(canonical) = self.nicknames.get(first.as_str()) {
                *first = canonical.clone();
            }
        }
        out.join(" ")
    }
}

impl NameMatcher for NormalizedMatcher {
    fn matches(&self, person: &Person, names: &BTreeSet<String>) -> bool {
        if names.is_empty() {
            return false;
        }
        let id = self.normalize(&person.id);
        let name = self.normalize(&person.name);
        names.iter().any(|raw| {
            let candidate = self.normalize(raw);
            !candidate.is_empty() && (candidate == name || candidate == id)
        })
    }
}

/// Folds diacritics, lowercases, and replaces punctuation with spaces.
fn fold(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
