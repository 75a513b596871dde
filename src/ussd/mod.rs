//! USSD payment-code utilities.
//!
//! - **builder**: MoMo dial string from phone and amount
//! - **validator**: grammar check with provider and confidence
//! - **extractor**: first code embedded in scanned QR text
//! - **dialer**: `tel:` URI encoding

pub mod builder;
pub mod dialer;
pub mod extractor;
pub mod validator;

pub use builder::build;
pub use dialer::encode_for_tel;
pub use extractor::{extract, scan, ScanResult};
pub use validator::{
    validate, UssdValidator, ValidationResult, INVALID_FORMAT_ERROR, LOW_CONFIDENCE,
    VALID_CONFIDENCE,
};
