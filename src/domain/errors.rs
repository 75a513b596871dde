//! Domain validation errors.

use std::fmt;

/// Errors that can occur when constructing domain value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a well-formed USSD code.
    InvalidUssd(String),

    /// The amount is zero or outside the accepted range.
    InvalidAmount(u64),

    /// The phone number is not a usable mobile number.
    InvalidPhone(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUssd(code) => write!(f, "Invalid USSD code: {}", code),
            Self::InvalidAmount(amount) => write!(f, "Invalid amount: {}", amount),
            Self::InvalidPhone(phone) => write!(f, "Invalid phone number: {}", phone),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::InvalidUssd("abc".to_string()).to_string(),
            "Invalid USSD code: abc"
        );
        assert_eq!(
            ValidationError::InvalidAmount(0).to_string(),
            "Invalid amount: 0"
        );
        assert_eq!(
            ValidationError::InvalidPhone("0123".to_string()).to_string(),
            "Invalid phone number: 0123"
        );
    }
}
