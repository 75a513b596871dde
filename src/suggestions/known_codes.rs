//! Rule-based corrector backed by a catalogue of MoMo short codes.
//!
//! Two kinds of hints are produced:
//! - structural repairs (missing `#`, missing leading `*`, doubled `*`) that
//!   are only offered when the repaired string actually validates
//! - "did you mean" hints from fuzzy matching against [`KNOWN_CODES`]

use super::{SuggestionEngine, CHECK_FORMAT_HINT};
use crate::domain::UssdCode;
use crate::ussd::{UssdValidator, ValidationResult};

/// A catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCode {
    pub code: &'static str,
    pub description: &'static str,
}

/// MoMo menu entry points users commonly type by hand.
pub const KNOWN_CODES: &[KnownCode] = &[
    KnownCode {
        code: "*182*1*1#",
        description: "Send money to a mobile number",
    },
    KnownCode {
        code: "*182*8*1#",
        description: "Pay a merchant",
    },
    KnownCode {
        code: "*182*6*1#",
        description: "Check balance",
    },
    KnownCode {
        code: "*182*2*1#",
        description: "Buy airtime",
    },
    KnownCode {
        code: "*182*7*1#",
        description: "Mini statement",
    },
];

/// Minimum fuzzy score (0-95) for a catalogue hint.
const MIN_FUZZY_SCORE: u8 = 60;

/// At most this many catalogue hints are returned.
const MAX_CATALOGUE_HINTS: usize = 2;

/// Suggestion engine combining structural repairs and catalogue lookup.
#[derive(Debug, Clone)]
pub struct KnownCodeSuggestionEngine {
    catalogue: &'static [KnownCode],
}

impl KnownCodeSuggestionEngine {
    /// Create an engine over the built-in catalogue.
    pub fn new() -> Self {
        Self {
            catalogue: KNOWN_CODES,
        }
    }

    /// Create an engine over a custom catalogue.
    pub fn with_catalogue(catalogue: &'static [KnownCode]) -> Self {
        Self { catalogue }
    }

    fn structural_repairs(normalized: &str) -> Vec<String> {
        let mut repairs = Vec::new();

        if !normalized.ends_with('#') {
            let candidate = format!("{}#", normalized);
            if UssdCode::is_valid(&candidate) {
                repairs.push(format!("Add a closing #: {}", candidate));
            }
        }

        if !normalized.starts_with('*') {
            let candidate = format!("*{}", normalized);
            if UssdCode::is_valid(&candidate) {
                repairs.push(format!("Add a leading *: {}", candidate));
            }
        }

        if !normalized.starts_with('*') && !normalized.ends_with('#') {
            let candidate = format!("*{}#", normalized);
            if UssdCode::is_valid(&candidate) {
                repairs.push(format!("Add a leading * and a closing #: {}", candidate));
            }
        }

        if normalized.contains("**") {
            let mut candidate = normalized.to_string();
            while candidate.contains("**") {
                candidate = candidate.replace("**", "*");
            }
            if UssdCode::is_valid(&candidate) {
                repairs.push(format!("Remove the repeated *: {}", candidate));
            }
        }

        repairs
    }

    fn catalogue_hints(&self, normalized: &str) -> Vec<String> {
        let mut scored: Vec<(u8, &KnownCode)> = self
            .catalogue
            .iter()
            .map(|known| (Self::calculate_fuzzy_score(normalized, known.code), known))
            .filter(|(score, _)| *score >= MIN_FUZZY_SCORE)
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(MAX_CATALOGUE_HINTS)
            .map(|(_, known)| format!("Did you mean {} ({})?", known.code, known.description))
            .collect()
    }

    /// Fuzzy score from 0-95 using substring and Levenshtein similarity.
    fn calculate_fuzzy_score(query: &str, target: &str) -> u8 {
        if query.is_empty() || target.is_empty() {
            return 0;
        }

        if query == target {
            return 95;
        }

        if target.contains(query) {
            let ratio = query.len() as f64 / target.len() as f64;
            return (85.0 * ratio + 10.0) as u8;
        }

        let distance = Self::levenshtein_distance(query, target);
        let max_len = query.len().max(target.len());

        if distance as f64 / max_len as f64 > 0.5 {
            return 0;
        }

        let similarity = 1.0 - (distance as f64 / max_len as f64);
        (similarity * 85.0) as u8
    }

    fn levenshtein_distance(s1: &str, s2: &str) -> usize {
        let s1_chars: Vec<char> = s1.chars().collect();
        let s2_chars: Vec<char> = s2.chars().collect();

        if s1_chars.is_empty() {
            return s2_chars.len();
        }
        if s2_chars.is_empty() {
            return s1_chars.len();
        }

        // Two rolling rows are enough for the distance alone.
        let mut prev: Vec<usize> = (0..=s2_chars.len()).collect();
        let mut curr = vec![0; s2_chars.len() + 1];

        for (i, c1) in s1_chars.iter().enumerate() {
            curr[0] = i + 1;
            for (j, c2) in s2_chars.iter().enumerate() {
                let cost = if c1 == c2 { 0 } else { 1 };
                curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        prev[s2_chars.len()]
    }
}

impl Default for KnownCodeSuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine for KnownCodeSuggestionEngine {
    fn name(&self) -> &str {
        "known-codes"
    }

    fn suggest(&self, input: &str, result: &ValidationResult) -> Vec<String> {
        if result.is_valid {
            return Vec::new();
        }

        let normalized = UssdValidator::normalize(input);
        let mut suggestions = Self::structural_repairs(&normalized);

        for hint in self.catalogue_hints(&normalized) {
            if !suggestions.contains(&hint) {
                suggestions.push(hint);
            }
        }

        suggestions.push(CHECK_FORMAT_HINT.to_string());
        suggestions
    }
}
