//! Domain value objects and types.
//!
//! Type-safe wrappers for phone numbers, USSD codes and payment amounts.
//! Each value object states its invariant once and the rest of the crate
//! relies on it.

pub mod amount;
pub mod errors;
pub mod phone;
pub mod ussd;

pub use amount::{Amount, MAX_AMOUNT, MIN_AMOUNT};
pub use errors::ValidationError;
pub use phone::{is_valid_rwanda_mobile, PhoneNumber};
pub use ussd::{Provider, UssdCode, UssdType, MOMO_SHORT_CODE, USSD_PATTERN};
