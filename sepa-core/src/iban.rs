//! IBAN validation.
//!
//! Accepts the electronic format only: two uppercase country letters, two
//! check digits, then the BBAN. Spaces, lowercase letters, and separators are
//! the caller's job to strip before validating.

/// Validates IBAN structure and checksum.
///
/// Structure: `[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}`, total length 15 to 34.
/// Checksum: rearranged mod-97 remainder must equal 1 per ISO 7064.
pub fn validate_iban(iban: &str) -> bool {
    let len = iban.len();
    if !(15..=34).contains(&len) {
        return false;
    }
    let b = iban.as_bytes();
    let shape_ok = b[0].is_ascii_uppercase()
        && b[1].is_ascii_uppercase()
        && b[2].is_ascii_digit()
        && b[3].is_ascii_digit()
        && b[4..]
            .iter()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    shape_ok && mod97(iban) == 1
}

/// Streaming mod-97 over the rearranged IBAN (BBAN first, then country code
/// and check digits), with each letter expanded to its two-digit value
/// (A=10 .. Z=35). Streaming keeps the intermediate value bounded instead of
/// building a 30+ digit number.
fn mod97(iban: &str) -> u32 {
    let (head, bban) = iban.split_at(4);
    let mut rem: u32 = 0;
    for c in bban.chars().chain(head.chars()) {
        if c.is_ascii_digit() {
            rem = (rem * 10 + (c as u32 - '0' as u32)) % 97;
        } else {
            rem = (rem * 100 + (c as u32 - 'A' as u32 + 10)) % 97;
        }
    }
    rem
}
