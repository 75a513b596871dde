//! Fixed-list suggestion engine.

use super::{SuggestionEngine, CHECK_FORMAT_HINT};
use crate::ussd::ValidationResult;

/// Returns the same generic hints for every invalid input.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestionEngine;

impl StaticSuggestionEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SuggestionEngine for StaticSuggestionEngine {
    fn name(&self) -> &str {
        "static"
    }

    fn suggest(&self, _input: &str, result: &ValidationResult) -> Vec<String> {
        if result.is_valid {
            return Vec::new();
        }

        vec![
            CHECK_FORMAT_HINT.to_string(),
            "USSD codes start with * and end with #".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ussd::validate;

    #[test]
    fn test_static_hints_for_invalid() {
        let engine = StaticSuggestionEngine::new();
        let suggestions = engine.suggest("abc", &validate("abc"));
        assert_eq!(suggestions[0], "Check USSD format");
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_static_silent_for_valid() {
        let engine = StaticSuggestionEngine::new();
        assert!(engine.suggest("*182#", &validate("*182#")).is_empty());
    }
}
