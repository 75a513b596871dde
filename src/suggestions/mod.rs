//! Correction hints for invalid USSD input.
//!
//! The validation pipeline only depends on the [`SuggestionEngine`] trait, so a
//! smarter corrector can be dropped in without touching the pipeline.

mod known_codes;
mod static_engine;

pub use known_codes::{KnownCode, KnownCodeSuggestionEngine, KNOWN_CODES};
pub use static_engine::StaticSuggestionEngine;

use crate::ussd::ValidationResult;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Hint that closes every non-empty suggestion list.
pub const CHECK_FORMAT_HINT: &str = "Check USSD format";

/// Produces user-facing correction hints for a validation result.
pub trait SuggestionEngine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Suggest corrections for `input`. Valid results get no suggestions.
    fn suggest(&self, input: &str, result: &ValidationResult) -> Vec<String>;
}

/// Which suggestion engine to wire into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionEngineKind {
    Static,
    KnownCodes,
}

impl SuggestionEngineKind {
    /// Construct the engine this kind names.
    pub fn build(self) -> Arc<dyn SuggestionEngine> {
        match self {
            Self::Static => Arc::new(StaticSuggestionEngine::new()),
            Self::KnownCodes => Arc::new(KnownCodeSuggestionEngine::new()),
        }
    }
}

impl FromStr for SuggestionEngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "known-codes" | "known_codes" => Ok(Self::KnownCodes),
            other => Err(format!(
                "Unknown suggestion engine '{}', expected 'static' or 'known-codes'",
                other
            )),
        }
    }
}

impl fmt::Display for SuggestionEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::KnownCodes => f.write_str("known-codes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "static".parse::<SuggestionEngineKind>().unwrap(),
            SuggestionEngineKind::Static
        );
        assert_eq!(
            " Known-Codes ".parse::<SuggestionEngineKind>().unwrap(),
            SuggestionEngineKind::KnownCodes
        );
        assert!("ai".parse::<SuggestionEngineKind>().is_err());
    }

    #[test]
    fn test_kind_builds_named_engine() {
        assert_eq!(SuggestionEngineKind::Static.build().name(), "static");
        assert_eq!(
            SuggestionEngineKind::KnownCodes.build().name(),
            "known-codes"
        );
    }
}
