//! Error types for the IKANISA MoMo core.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Validation and normalization never fail; only payment initiation, its
//! collaborators and configuration loading return these errors.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when talking to a payment gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Backend returned an error status code
    #[error("Gateway error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Payment reference not found
    #[error("Payment not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Generic gateway error with context
    #[error("Gateway error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether the failure means the backend could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::Timeout)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors that can occur in a key-value storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure (lock poisoned, I/O, ...)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while initiating a payment.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Phone number is not a Rwanda mobile number after normalization
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// Amount is out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(u64),

    /// Built code failed validation
    #[error("Invalid payment code: {0}")]
    InvalidCode(String),

    /// Gateway rejected the payment
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Session or offline queue storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            ValidationError::InvalidPhone(phone) => Self::InvalidPhone(phone),
            ValidationError::InvalidUssd(code) => Self::InvalidCode(code),
        }
    }
}

/// Convenience type alias for Results with GatewayError
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Convenience type alias for Results with PaymentError
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::NotFound("PAY-1".to_string());
        assert_eq!(err.to_string(), "Payment not found: PAY-1");

        let err = ConfigError::MissingVar("SUPABASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: SUPABASE_URL"
        );

        let err = StorageError::Backend("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Storage backend error: lock poisoned");

        let err = PaymentError::InvalidAmount(0);
        assert_eq!(err.to_string(), "Invalid amount: 0");
    }

    #[test]
    fn test_api_error_variants() {
        let err = GatewayError::ApiError {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_transport_classification() {
        assert!(GatewayError::Timeout.is_transport());
        assert!(GatewayError::HttpError("Connection failed".to_string()).is_transport());
        assert!(!GatewayError::Unauthorized.is_transport());
        assert!(!GatewayError::RateLimitExceeded.is_transport());
    }

    #[test]
    fn test_payment_error_from_validation() {
        let err: PaymentError = ValidationError::InvalidAmount(0).into();
        assert!(matches!(err, PaymentError::InvalidAmount(0)));

        let err: PaymentError = GatewayError::Timeout.into();
        assert_eq!(err.to_string(), "Request timeout");
    }
}
