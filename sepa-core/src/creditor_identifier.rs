//! SEPA creditor identifier validation.

/// Validates the creditor identifier shape used in direct-debit scheme
/// blocks: two letter country code, two check digits, three character
/// creditor business code, then 1 to 28 national identifier characters.
///
/// The business code and national part are case-insensitive alphanumerics;
/// the check digits are not recomputed here (banks accept the identifier as
/// issued).
pub fn validate_creditor_identifier(identifier: &str) -> bool {
    let b = identifier.as_bytes();
    if !(8..=35).contains(&b.len()) {
        return false;
    }
    b[0].is_ascii_alphabetic()
        && b[1].is_ascii_alphabetic()
        && b[2].is_ascii_digit()
        && b[3].is_ascii_digit()
        && b[4..].iter().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_identifiers() {
        assert!(validate_creditor_identifier("DE98ZZZ09999999999"));
        assert!(validate_creditor_identifier("CH13ZZZ00000012345"));
        assert!(validate_creditor_identifier("FR72ZZZ123456"));
        // Shortest legal form: one national identifier character.
        assert!(validate_creditor_identifier("DE98ZZZ1"));
    }

    #[test]
    fn rejects_invalid_identifiers() {
        assert!(!validate_creditor_identifier(""));
        assert!(!validate_creditor_identifier("DE98ZZZ"));
        assert!(!validate_creditor_identifier("9898ZZZ09999999999"));
        assert!(!validate_creditor_identifier("DEXXZZZ09999999999"));
        assert!(!validate_creditor_identifier("DE98ZZZ0999999-999"));
        assert!(!validate_creditor_identifier("DE98ZZZ099999999999999999999999999999"));
    }
}
