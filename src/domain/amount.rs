//! Amount value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Smallest amount accepted for a payment, in RWF.
pub const MIN_AMOUNT: u64 = 1;

/// Largest amount accepted for a payment, in RWF.
pub const MAX_AMOUNT: u64 = 10_000_000;

/// A payment amount in Rwandan francs, within `MIN_AMOUNT..=MAX_AMOUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Create a new Amount, checking the accepted range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidAmount` outside `MIN_AMOUNT..=MAX_AMOUNT`.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&value) {
            return Err(ValidationError::InvalidAmount(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
