//! MoMo USSD dial string construction.

use crate::domain::{PhoneNumber, UssdCode, ValidationError, MOMO_SHORT_CODE};

/// Build the MoMo transfer code `*182*1*1*{phone}*{amount}#`.
///
/// Only positivity of `amount` is checked here; range limits are the caller's
/// concern (see [`crate::domain::Amount`]).
///
/// # Errors
///
/// Returns `ValidationError::InvalidAmount` when `amount` is zero.
pub fn build(phone: &PhoneNumber, amount: u64) -> Result<UssdCode, ValidationError> {
    if amount == 0 {
        return Err(ValidationError::InvalidAmount(amount));
    }

    UssdCode::new(format!(
        "*{}*1*1*{}*{}#",
        MOMO_SHORT_CODE,
        phone.as_str(),
        amount
    ))
}
