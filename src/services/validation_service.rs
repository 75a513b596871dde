//! Composite validation pipeline.
//!
//! extract (QR input only) → validate → enrich invalid results with
//! suggestions. A single synchronous pass; nothing is retained between calls
//! apart from metrics.

use crate::metrics::Metrics;
use crate::suggestions::SuggestionEngine;
use crate::ussd::{
    extract, ScanResult, UssdValidator, ValidationResult, INVALID_FORMAT_ERROR, LOW_CONFIDENCE,
};
use std::sync::Arc;

/// Error added when a scanned payload holds no recoverable code.
pub const NO_CODE_IN_SCAN_ERROR: &str = "No USSD code found in scanned data";

/// Validation service trait for payment-code input.
pub trait ValidationService: Send + Sync {
    /// Validate decoded QR text, extracting the embedded code first.
    fn process_qr(&self, qr_text: &str) -> ValidationResult;

    /// Validate a code typed in by the user.
    fn process_manual(&self, ussd: &str) -> ValidationResult;

    /// Validate a previously captured scan.
    fn process_scan(&self, scan: &ScanResult) -> ValidationResult;
}

/// Default implementation of ValidationService.
pub struct ValidationServiceImpl {
    validator: UssdValidator,
    suggestions: Arc<dyn SuggestionEngine>,
    metrics: Metrics,
}

impl ValidationServiceImpl {
    /// Create a new validation service.
    pub fn new(suggestions: Arc<dyn SuggestionEngine>, metrics: Metrics) -> Self {
        Self {
            validator: UssdValidator::new(),
            suggestions,
            metrics,
        }
    }

    fn validate_extracted(&self, raw: &str, extracted: Option<&str>) -> ValidationResult {
        self.metrics.record_extraction(extracted.is_some());

        match extracted {
            Some(code) => self.finish(code, self.validator.validate(code)),
            None => {
                // A miss is never validated: stripping the payload to [0-9*#]
                // could assemble a code the QR never contained.
                let mut result = ValidationResult::invalid(LOW_CONFIDENCE, INVALID_FORMAT_ERROR);
                result.errors.push(NO_CODE_IN_SCAN_ERROR.to_string());
                self.finish(raw, result)
            }
        }
    }

    fn finish(&self, input: &str, mut result: ValidationResult) -> ValidationResult {
        if !result.is_valid {
            result.suggestions = self.suggestions.suggest(input, &result);
        }

        self.metrics.record_validation(result.is_valid);
        tracing::debug!(
            is_valid = result.is_valid,
            provider = %result.provider,
            confidence = result.confidence,
            engine = self.suggestions.name(),
            "USSD validation completed"
        );
        result
    }
}

impl ValidationService for ValidationServiceImpl {
    fn process_qr(&self, qr_text: &str) -> ValidationResult {
        let extracted = extract(qr_text);
        self.validate_extracted(qr_text, extracted.as_ref().map(|c| c.as_str()))
    }

    fn process_manual(&self, ussd: &str) -> ValidationResult {
        self.finish(ussd, self.validator.validate(ussd))
    }

    fn process_scan(&self, scan: &ScanResult) -> ValidationResult {
        self.validate_extracted(
            &scan.raw_data,
            scan.extracted_ussd.as_ref().map(|c| c.as_str()),
        )
    }
}
