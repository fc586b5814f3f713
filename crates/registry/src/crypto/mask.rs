//! Display masking for identity numbers.

/// Shown whenever no trailing digits can be displayed.
pub const FULLY_REDACTED: &str = "XXXX-XXXX-XXXX";

const MASK_PREFIX: &str = "XXXX-XXXX-";
const VISIBLE_DIGITS: usize = 4;

/// Mask an identity number for display as `XXXX-XXXX-1234`.
///
/// Non-digit characters are ignored. An absent value, or one with fewer than
/// four digits, yields [`FULLY_REDACTED`].
pub fn mask_identity_number(plaintext: Option<&str>) -> String {
    let digits: Vec<char> = plaintext
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.len() < VISIBLE_DIGITS {
        return FULLY_REDACTED.to_owned();
    }

    let mut masked = String::with_capacity(FULLY_REDACTED.len());
    masked.push_str(MASK_PREFIX);
    masked.extend(&digits[digits.len() - VISIBLE_DIGITS..]);
    masked
}
