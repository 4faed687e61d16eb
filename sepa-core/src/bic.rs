//! BIC validation.

/// Validates ISO 9362 BIC shape: four letter institution code, two letter
/// country code, two alphanumeric location characters, and an optional three
/// character branch code. Only the 8 and 11 character forms exist.
pub fn validate_bic(bic: &str) -> bool {
    let b = bic.as_bytes();
    if b.len() != 8 && b.len() != 11 {
        return false;
    }
    b[..6].iter().all(|c| c.is_ascii_uppercase())
        && b[6..]
            .iter()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
