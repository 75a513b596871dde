//! PhoneNumber value object.

use super::ussd::Provider;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Rwanda country calling code as it appears in digit-only input.
pub const COUNTRY_CODE: &str = "250";

static RWANDA_MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^07[2-9][0-9]{7}$").expect("Failed to compile mobile number regex"));

/// A phone number in local `0XXXXXXXXX` form.
///
/// Normalization never fails: any input is reduced to a best-effort local
/// number. Whether that number is actually dialable is a separate question
/// answered by [`PhoneNumber::is_valid_rwanda_mobile`].
///
/// # Example
///
/// ```
/// use ikanisa_momo::domain::PhoneNumber;
///
/// let phone = PhoneNumber::normalize("+250 788 123 456");
/// assert_eq!(phone.as_str(), "0788123456");
/// assert!(phone.is_valid_rwanda_mobile());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize raw input into local form.
    ///
    /// # Rules
    ///
    /// - All non-digit characters are removed
    /// - A leading `250` country code is replaced by `0`
    /// - Digits already starting with `0` are kept as they are
    /// - Anything else gets a `0` prepended
    pub fn normalize(input: &str) -> Self {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

        let normalized = if let Some(rest) = digits.strip_prefix(COUNTRY_CODE) {
            format!("0{}", rest)
        } else if digits.starts_with('0') {
            digits
        } else {
            format!("0{}", digits)
        };

        Self(normalized)
    }

    /// Check whether the normalized number is a Rwanda mobile number.
    pub fn is_valid_rwanda_mobile(&self) -> bool {
        is_valid_rwanda_mobile(&self.0)
    }

    /// Mobile-money carrier implied by the number prefix.
    pub fn carrier(&self) -> Provider {
        match self.0.get(..3) {
            Some("078") | Some("079") => Provider::Mtn,
            Some("072") | Some("073") => Provider::Airtel,
            _ => Provider::Unknown,
        }
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Check a phone string against the Rwanda mobile pattern `07[2-9]XXXXXXX`.
///
/// The string is matched as given; callers holding raw user input should
/// normalize it first.
pub fn is_valid_rwanda_mobile(phone: &str) -> bool {
    RWANDA_MOBILE_REGEX.is_match(phone)
}

// Serde support - serialize as string
impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string, normalizing
impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(PhoneNumber::normalize(&s))
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
