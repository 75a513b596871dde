//! USSD syntax validation with confidence scoring.
//!
//! The validator checks *syntax only*: whether the input, once reduced to
//! digits, `*` and `#`, is a well-formed dial string. It never fails; every
//! outcome is a [`ValidationResult`] the caller can render.

use crate::domain::{Provider, UssdCode, UssdType};
use serde::Serialize;

/// Confidence reported for a syntactically valid code.
pub const VALID_CONFIDENCE: f64 = 0.95;

/// Confidence for invalid input that still looks like a dial string.
pub const PARTIAL_CONFIDENCE: f64 = 0.3;

/// Confidence for invalid input with some digits but no USSD shape.
pub const LOW_CONFIDENCE: f64 = 0.1;

/// Error message attached to every grammar failure.
pub const INVALID_FORMAT_ERROR: &str = "Invalid USSD format";

/// Outcome of validating one candidate USSD string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the normalized input matches the grammar
    pub is_valid: bool,

    /// The normalized code, present only when valid
    pub normalized: Option<UssdCode>,

    /// Provider implied by the short code
    pub provider: Provider,

    /// Payment when the MoMo short code is present
    pub ussd_type: UssdType,

    /// Heuristic trust score in [0, 1]
    pub confidence: f64,

    /// Human readable problems, empty when valid
    pub errors: Vec<String>,

    /// Correction hints, filled in by the validation service
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// Build the result for a code known to be valid.
    pub fn valid(code: UssdCode) -> Self {
        Self {
            is_valid: true,
            provider: code.provider(),
            ussd_type: code.ussd_type(),
            normalized: Some(code),
            confidence: VALID_CONFIDENCE,
            errors: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Build the result for input that failed the grammar.
    pub fn invalid(confidence: f64, error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            normalized: None,
            provider: Provider::Unknown,
            ussd_type: UssdType::Other,
            confidence,
            errors: vec![error.into()],
            suggestions: Vec::new(),
        }
    }
}

/// Stateless USSD validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UssdValidator;

impl UssdValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a candidate USSD string.
    pub fn validate(&self, code: &str) -> ValidationResult {
        let normalized = Self::normalize(code);

        match UssdCode::new(normalized.clone()) {
            Ok(code) => ValidationResult::valid(code),
            Err(_) => {
                let confidence = Self::partial_confidence(&normalized);
                ValidationResult::invalid(confidence, INVALID_FORMAT_ERROR)
            }
        }
    }

    /// Keep only digits, `*` and `#`.
    pub fn normalize(code: &str) -> String {
        code.chars()
            .filter(|c| c.is_ascii_digit() || *c == '*' || *c == '#')
            .collect()
    }

    fn partial_confidence(normalized: &str) -> f64 {
        if normalized.is_empty() {
            0.0
        } else if normalized.starts_with('*') || normalized.ends_with('#') {
            PARTIAL_CONFIDENCE
        } else {
            LOW_CONFIDENCE
        }
    }
}

/// Validate a candidate USSD string with the default validator.
pub fn validate(code: &str) -> ValidationResult {
    UssdValidator.validate(code)
}
