//! SEPA character set checks and transliteration.
//!
//! The banking systems downstream accept a restricted Latin character set.
//! `sanitize` maps the common Western European diacritics onto it and drops
//! anything that has no representation; `is_sepa_text` is the corresponding
//! pass/fail oracle.

/// True if every character belongs to the restricted SEPA set:
/// `a-z A-Z 0-9 / - ? : ( ) . , ' + space`.
pub fn is_sepa_text(text: &str) -> bool {
    text.chars().all(is_sepa_char)
}

fn is_sepa_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '/' | '-' | '?' | ':' | '(' | ')' | '.' | ',' | '\'' | '+' | ' '
        )
}

/// Maps free text onto the SEPA character set.
///
/// German umlauts expand to their two-letter forms, accented vowels lose
/// their accents, `&` becomes `+`, and characters with no sensible mapping
/// are dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("Ae"),
            'à' | 'á' | 'â' | 'ã' | 'å' => out.push('a'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ø' => out.push('o'),
            'ù' | 'ú' | 'û' => out.push('u'),
            'ç' => out.push('c'),
            'ñ' => out.push('n'),
            'À' | 'Á' | 'Â' | 'Ã' | 'Å' => out.push('A'),
            'È' | 'É' | 'Ê' | 'Ë' => out.push('E'),
            'Ì' | 'Í' | 'Î' | 'Ï' => out.push('I'),
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ø' => out.push('O'),
            'Ù' | 'Ú' | 'Û' => out.push('U'),
            'Ç' => out.push('C'),
            'Ñ' => out.push('N'),
            '&' => out.push('+'),
            c if is_sepa_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_diacritics() {
        assert_eq!(sanitize("Müller & Söhne"), "Mueller + Soehne");
        assert_eq!(sanitize("Crédit Agricole"), "Credit Agricole");
        assert_eq!(sanitize("Straße 7"), "Strasse 7");
    }

    #[test]
    fn keeps_allowed_punctuation() {
        assert_eq!(sanitize("XYZ-1234/123"), "XYZ-1234/123");
        assert_eq!(sanitize("Rechnung Nr. 5, Pos: 2 (Teil 1)"), "Rechnung Nr. 5, Pos: 2 (Teil 1)");
    }

    #[test]
    fn drops_unmappable_characters() {
        assert_eq!(sanitize("a\u{263a}b"), "ab");
        assert_eq!(sanitize("Invoice #12"), "Invoice 12");
    }

    #[test]
    fn charset_oracle() {
        assert!(is_sepa_text("Telekomiker AG"));
        assert!(is_sepa_text("XYZ-1234/123"));
        assert!(!is_sepa_text("Müller"));
        assert!(!is_sepa_text("a&b"));
    }
}
