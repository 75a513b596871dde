//! `tel:` URI formatting for device dialer intents.

/// Percent-encode a USSD string into a `tel:` URI.
///
/// `*` becomes `%2A` and `#` becomes `%23`; a bare `#` would otherwise be read
/// as a URI fragment by the dialer.
pub fn encode_for_tel(code: &str) -> String {
    format!("tel:{}", urlencoding::encode(code))
}
