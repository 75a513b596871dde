//! Pull a USSD code out of decoded QR text.
//!
//! QR payloads often carry merchant metadata around the payment instruction,
//! so extraction searches for the first grammar match instead of requiring the
//! whole payload to be a code. Provider and amount checks are left to the
//! validator.

use crate::domain::{UssdCode, USSD_PATTERN};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static USSD_SEARCH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(USSD_PATTERN).expect("Failed to compile USSD search regex"));

/// Decoded QR payload together with whatever code was found in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// The decoded text exactly as scanned
    pub raw_data: String,

    /// First USSD code found in the text
    pub extracted_ussd: Option<UssdCode>,

    /// Scan time (RFC 3339, UTC)
    pub timestamp: String,
}

/// Return the first USSD code embedded in `qr_text`, if any.
pub fn extract(qr_text: &str) -> Option<UssdCode> {
    USSD_SEARCH_REGEX
        .find(qr_text)
        .and_then(|m| UssdCode::new(m.as_str()).ok())
}

/// Extract from `qr_text` and stamp the scan time.
pub fn scan(qr_text: &str) -> ScanResult {
    ScanResult {
        raw_data: qr_text.to_string(),
        extracted_ussd: extract(qr_text),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_surrounding_text() {
        let code = extract("merchant:ABC *182*1*1*0788123456*1000# end").unwrap();
        assert_eq!(code.as_str(), "*182*1*1*0788123456*1000#");
    }

    #[test]
    fn test_extract_returns_first_match() {
        let code = extract("pay *182*8*1# or *131#").unwrap();
        assert_eq!(code.as_str(), "*182*8*1#");
    }

    #[test]
    fn test_extract_miss() {
        assert!(extract("").is_none());
        assert!(extract("https://example.com/pay?id=42").is_none());
        assert!(extract("*182*1*1").is_none());
        assert!(extract("*#").is_none());
    }

    #[test]
    fn test_extract_skips_stray_star() {
        let code = extract("**182*1#").unwrap();
        assert_eq!(code.as_str(), "*182*1#");
    }

    #[test]
    fn test_extract_ignores_non_ascii_digits() {
        let code = extract("ref *\u{0661}# pay *182*8*1#").unwrap();
        assert_eq!(code.as_str(), "*182*8*1#");
        assert!(extract("*\u{0661}\u{0668}\u{0662}#").is_none());
    }

    #[test]
    fn test_scan_populates_fields() {
        let result = scan("code: *182*8*1#");
        assert_eq!(result.raw_data, "code: *182*8*1#");
        assert_eq!(result.extracted_ussd.unwrap().as_str(), "*182*8*1#");
        assert!(chrono::DateTime::parse_from_rfc3339(&result.timestamp).is_ok());
    }
}
