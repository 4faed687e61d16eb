//! Dialect identifiers and schema metadata
//!
//! The dialect set is a closed enumeration: four credit-transfer schemas
//! (three international ISO 20022 variants plus the Swiss national variant)
//! and four direct-debit schemas with the same split. Each dialect knows its
//! dotted schema code, XML namespace, schema location, root content tag, and
//! message kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message kind a dialect encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Customer credit transfer initiation (pain.001 family).
    CreditTransfer,
    /// Customer direct debit initiation (pain.008 family).
    DirectDebit,
}

impl MessageKind {
    /// Default supported dialects for this kind, most specific first.
    /// Messages take this list at construction unless the caller injects
    /// their own.
    pub fn default_dialects(self) -> Vec<Dialect> {
        match self {
            MessageKind::CreditTransfer => vec![
                Dialect::Pain00100303,
                Dialect::Pain00100203,
                Dialect::Pain00100103,
                Dialect::Pain00100103Ch02,
            ],
            MessageKind::DirectDebit => vec![
                Dialect::Pain00800302,
                Dialect::Pain00800202,
                Dialect::Pain00800102,
                Dialect::Pain00800102Ch03,
            ],
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::CreditTransfer => write!(f, "credit transfer"),
            MessageKind::DirectDebit => write!(f, "direct debit"),
        }
    }
}

/// One emittable XML schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// pain.001.001.03, the original ISO credit-transfer schema. Most
    /// permissive: any currency, BIC optional.
    Pain00100103,
    /// pain.001.002.03, the restricted credit-transfer variant: BIC
    /// mandatory, EUR only.
    Pain00100203,
    /// pain.001.003.03, the relaxed credit-transfer variant: EUR only,
    /// urgent service level allowed.
    Pain00100303,
    /// pain.001.001.03.ch.02, the Swiss credit-transfer schema.
    Pain00100103Ch02,
    /// pain.008.001.02, the original ISO direct-debit schema.
    Pain00800102,
    /// pain.008.002.02, the restricted direct-debit variant: BIC mandatory,
    /// EUR only, COR1 excluded.
    Pain00800202,
    /// pain.008.003.02, the relaxed direct-debit variant: EUR only.
    Pain00800302,
    /// pain.008.001.02.ch.03, the Swiss direct-debit schema.
    Pain00800102Ch03,
}

impl Dialect {
    /// Dotted schema code, e.g. `pain.001.001.03.ch.02`.
    pub fn code(&self) -> &'static str {
        match self {
            Dialect::Pain00100103 => "pain.001.001.03",
            Dialect::Pain00100203 => "pain.001.002.03",
            Dialect::Pain00100303 => "pain.001.003.03",
            Dialect::Pain00100103Ch02 => "pain.001.001.03.ch.02",
            Dialect::Pain00800102 => "pain.008.001.02",
            Dialect::Pain00800202 => "pain.008.002.02",
            Dialect::Pain00800302 => "pain.008.003.02",
            Dialect::Pain00800102Ch03 => "pain.008.001.02.ch.03",
        }
    }

    /// XML namespace of the `Document` root element.
    pub fn namespace(&self) -> &'static str {
        match self {
            Dialect::Pain00100103 => "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03",
            Dialect::Pain00100203 => "urn:iso:std:iso:20022:tech:xsd:pain.001.002.03",
            Dialect::Pain00100303 => "urn:iso:std:iso:20022:tech:xsd:pain.001.003.03",
            Dialect::Pain00100103Ch02 => {
                "http://www.six-interbank-clearing.com/de/pain.001.001.03.ch.02.xsd"
            }
            Dialect::Pain00800102 => "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02",
            Dialect::Pain00800202 => "urn:iso:std:iso:20022:tech:xsd:pain.008.002.02",
            Dialect::Pain00800302 => "urn:iso:std:iso:20022:tech:xsd:pain.008.003.02",
            Dialect::Pain00800102Ch03 => {
                "http://www.six-interbank-clearing.com/de/pain.008.001.02.ch.03.xsd"
            }
        }
    }

    /// Value of the `xsi:schemaLocation` attribute.
    pub fn schema_location(&self) -> String {
        format!("{} {}.xsd", self.namespace(), self.code())
    }

    /// Content tag directly under `Document`.
    pub fn root_tag(&self) -> &'static str {
        match self.kind() {
            MessageKind::CreditTransfer => "CstmrCdtTrfInitn",
            MessageKind::DirectDebit => "CstmrDrctDbtInitn",
        }
    }

    /// Message kind this dialect encodes.
    pub fn kind(&self) -> MessageKind {
        match self {
            Dialect::Pain00100103
            | Dialect::Pain00100203
            | Dialect::Pain00100303
            | Dialect::Pain00100103Ch02 => MessageKind::CreditTransfer,
            Dialect::Pain00800102
            | Dialect::Pain00800202
            | Dialect::Pain00800302
            | Dialect::Pain00800102Ch03 => MessageKind::DirectDebit,
        }
    }

    /// True for the Swiss national schemas.
    pub fn is_swiss(&self) -> bool {
        matches!(self, Dialect::Pain00100103Ch02 | Dialect::Pain00800102Ch03)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
