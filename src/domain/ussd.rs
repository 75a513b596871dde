//! UssdCode value object and provider classification.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Mobile-money short code used by every payment template.
pub const MOMO_SHORT_CODE: &str = "182";

/// USSD grammar: `*` digits, further `*` digit groups, closing `#`.
///
/// ASCII digits only; `\d` would also match other Unicode digit classes.
pub const USSD_PATTERN: &str = r"\*[0-9]+(?:\*[0-9]+)*#";

static USSD_FULL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}$", USSD_PATTERN)).expect("Failed to compile USSD grammar regex")
});

/// Mobile-money provider behind a code or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Mtn,
    Airtel,
    Unknown,
}

impl Provider {
    /// Get the wire label for this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mtn => "MTN",
            Self::Airtel => "AIRTEL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of what a USSD code does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UssdType {
    Payment,
    Other,
}

/// A syntactically valid USSD dial string such as `*182*1*1*0788123456*1000#`.
///
/// Only syntax is guaranteed; the menu path behind the code is not checked.
///
/// # Example
///
/// ```
/// use ikanisa_momo::domain::{Provider, UssdCode};
///
/// let code = UssdCode::new("*182*1*1*0788123456*1000#").unwrap();
/// assert_eq!(code.provider(), Provider::Mtn);
/// assert!(UssdCode::new("*182*1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UssdCode(String);

impl UssdCode {
    /// Create a new UssdCode, validating it against the grammar.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidUssd` if the string does not fully match.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();

        if !Self::is_valid(&code) {
            return Err(ValidationError::InvalidUssd(code));
        }

        Ok(Self(code))
    }

    /// Check a string against the full USSD grammar.
    pub fn is_valid(code: &str) -> bool {
        USSD_FULL_REGEX.is_match(code)
    }

    /// Provider implied by the short code.
    pub fn provider(&self) -> Provider {
        if self.is_momo() {
            Provider::Mtn
        } else {
            Provider::Unknown
        }
    }

    /// Classification implied by the short code.
    pub fn ussd_type(&self) -> UssdType {
        if self.is_momo() {
            UssdType::Payment
        } else {
            UssdType::Other
        }
    }

    /// Numeric segments between the separators.
    pub fn segments(&self) -> Vec<&str> {
        self.0
            .trim_start_matches('*')
            .trim_end_matches('#')
            .split('*')
            .collect()
    }

    /// Format this code as a `tel:` URI for a device dialer.
    pub fn to_tel_uri(&self) -> String {
        crate::ussd::encode_for_tel(&self.0)
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }

    fn is_momo(&self) -> bool {
        self.0[1..].starts_with(MOMO_SHORT_CODE)
    }
}

impl Serialize for UssdCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UssdCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UssdCode::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for UssdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
