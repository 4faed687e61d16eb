//! SEPA Field Primitives
//!
//! Pass/fail oracles for the field formats payment initiation messages are
//! built from: IBAN (structure plus ISO 7064 mod-97 checksum), BIC,
//! SEPA creditor identifiers, and the restricted SEPA character set with a
//! transliteration helper for free-text fields.
//!
//! The crate is deliberately stateless: every function is a pure check or a
//! pure transformation on `&str`. Message assembly lives in `sepa-pain`; this
//! crate only answers "is this field well-formed".
//!
//! # Example
//!
//! ```
//! assert!(sepa_core::validate_iban("DE89370400440532013000"));
//! assert!(sepa_core::validate_bic("SPUEDE2UXXX"));
//! assert_eq!(sepa_core::sanitize("Müller & Söhne"), "Mueller + Soehne");
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod bic;
pub mod creditor_identifier;
pub mod iban;
pub mod text;

// Re-exports
pub use bic::validate_bic;
pub use creditor_identifier::validate_creditor_identifier;
pub use iban::validate_iban;
pub use text::{is_sepa_text, sanitize};
