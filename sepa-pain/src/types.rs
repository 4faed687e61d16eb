//! Core vocabulary for payment instructions
//!
//! The enums here replace loose optional-field combinations with tagged
//! variants: a payment type carries exactly the fields that are legal for
//! it, a creditor agent is exactly one of the three accepted key-sets, a
//! remittance is either free text or a structured reference, and a mandate
//! amendment is one of its two shapes. Illegal combinations cannot be
//! constructed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direct-debit authorization metadata, required on every direct-debit
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mandate {
    /// Mandate identification agreed with the debtor.
    pub id: String,
    /// Date the debtor signed the mandate.
    pub date_of_signature: NaiveDate,
}

impl Mandate {
    /// New mandate; the id is transliterated to the SEPA character set.
    pub fn new(id: impl Into<String>, date_of_signature: NaiveDate) -> Self {
        Self {
            id: sepa_core::sanitize(&id.into()),
            date_of_signature,
        }
    }
}

/// Service level of a SEPA credit transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    /// Standard SEPA service level (`SEPA`).
    #[default]
    Sepa,
    /// Urgent payment service level (`URGP`), accepted by pain.001.003.03
    /// only.
    Urgent,
}

impl ServiceLevel {
    /// Wire code emitted in `SvcLvl/Cd`.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceLevel::Sepa => "SEPA",
            ServiceLevel::Urgent => "URGP",
        }
    }
}

/// National payment method of a Swiss credit transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Plain transfer (`TRF`).
    #[default]
    Transfer,
    /// Transfer with payment advice (`TRA`).
    TransferWithAdvice,
}

impl PaymentMethod {
    /// Wire code emitted in `PmtMtd`.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Transfer => "TRF",
            PaymentMethod::TransferWithAdvice => "TRA",
        }
    }
}

/// How the creditor's bank is identified in a Swiss bank payment (local
/// instrument CH03). Exactly three key-sets are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditorAgent {
    /// Institution identified by its clearing number alone.
    Iid {
        /// Swiss institution identification (bank clearing number).
        iid: String,
    },
    /// Bank postal account plus clearing number.
    PostalAccountWithIid {
        /// Postal account of the creditor's bank.
        postal_account: String,
        /// Swiss institution identification.
        iid: String,
    },
    /// Bank postal account plus display name, for banks without a known
    /// clearing number.
    PostalAccountWithName {
        /// Postal account of the creditor's bank.
        postal_account: String,
        /// Display name of the creditor's bank.
        bank_name: String,
    },
}

impl CreditorAgent {
    /// Clearing number, when this key-set carries one.
    pub fn iid(&self) -> Option<&str> {
        match self {
            CreditorAgent::Iid { iid } | CreditorAgent::PostalAccountWithIid { iid, .. } => {
                Some(iid)
            }
            CreditorAgent::PostalAccountWithName { .. } => None,
        }
    }

    /// Bank display name, when this key-set carries one.
    pub fn bank_name(&self) -> Option<&str> {
        match self {
            CreditorAgent::PostalAccountWithName { bank_name, .. } => Some(bank_name),
            _ => None,
        }
    }
}

/// Payment type of a credit transfer.
///
/// The international SEPA scheme and the Swiss national payment types are
/// variants of one enum; each variant carries the fields its rules require
/// and nothing else. The compatibility engine matches over this exhaustively,
/// so adding a variant without a rule is a compile error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// International SEPA scheme with its service level.
    Sepa {
        /// Service level, `SEPA` unless explicitly urgent.
        service_level: ServiceLevel,
    },
    /// Swiss ISR payment (local instrument CH01): an ISR participation
    /// reference is mandatory.
    SwissIsr {
        /// ISR reference number, digits only.
        reference_number: String,
    },
    /// Swiss postal payment without reference (local instrument CH02).
    SwissPostal,
    /// Swiss bank payment (local instrument CH03): the creditor's bank must
    /// be identified by one of the accepted key-sets.
    SwissBank {
        /// Creditor bank identification.
        agent: CreditorAgent,
    },
    /// Reserved Swiss domestic payment types. Constructible, but no dialect
    /// implements them; serialization reports them as unsupported.
    SwissDomestic,
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Sepa {
            service_level: ServiceLevel::Sepa,
        }
    }
}

impl PaymentType {
    /// Service level, present only for the SEPA scheme.
    pub fn service_level(&self) -> Option<ServiceLevel> {
        match self {
            PaymentType::Sepa { service_level } => Some(*service_level),
            _ => None,
        }
    }

    /// Swiss local instrument code for this payment type, if any.
    pub fn local_instrument(&self) -> Option<&'static str> {
        match self {
            PaymentType::SwissIsr { .. } => Some("CH01"),
            PaymentType::SwissPostal => Some("CH02"),
            PaymentType::SwissBank { .. } => Some("CH03"),
            PaymentType::Sepa { .. } | PaymentType::SwissDomestic => None,
        }
    }

    /// ISR reference number, present only for ISR payments.
    pub fn reference_number(&self) -> Option<&str> {
        match self {
            PaymentType::SwissIsr { reference_number } => Some(reference_number),
            _ => None,
        }
    }

    /// Creditor bank key-set, present only for Swiss bank payments.
    pub fn creditor_agent(&self) -> Option<&CreditorAgent> {
        match self {
            PaymentType::SwissBank { agent } => Some(agent),
            _ => None,
        }
    }

    /// True for every national (non-SEPA) payment type.
    pub fn is_swiss(&self) -> bool {
        !matches!(self, PaymentType::Sepa { .. })
    }
}

/// Remittance information of one transaction: free text or a structured
/// creditor reference, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remittance {
    /// Free-text remittance, emitted as `RmtInf/Ustrd`.
    Unstructured(String),
    /// Structured creditor reference, emitted as
    /// `RmtInf/Strd/CdtrRefInf/Ref` by the Swiss credit-transfer dialect.
    Structured(String),
}

impl Remittance {
    /// Free text, if this is the unstructured form.
    pub fn unstructured(&self) -> Option<&str> {
        match self {
            Remittance::Unstructured(text) => Some(text),
            Remittance::Structured(_) => None,
        }
    }

    /// Structured reference, if this is the structured form.
    pub fn structured(&self) -> Option<&str> {
        match self {
            Remittance::Structured(reference) => Some(reference),
            Remittance::Unstructured(_) => None,
        }
    }
}

/// Direct-debit local instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalInstrument {
    /// SEPA core scheme (`CORE`).
    #[default]
    Core,
    /// SEPA core with shortened presentation period (`COR1`).
    Cor1,
    /// SEPA business-to-business scheme (`B2B`).
    B2b,
    /// Swiss CH-DD core scheme (`DDCOR1`).
    DdCor1,
    /// Swiss CH-DD business-to-business scheme (`DDB2B`).
    DdB2b,
}

impl LocalInstrument {
    /// Wire code emitted in `LclInstrm`.
    pub fn code(&self) -> &'static str {
        match self {
            LocalInstrument::Core => "CORE",
            LocalInstrument::Cor1 => "COR1",
            LocalInstrument::B2b => "B2B",
            LocalInstrument::DdCor1 => "DDCOR1",
            LocalInstrument::DdB2b => "DDB2B",
        }
    }

    /// True for the Swiss CH-DD codes.
    pub fn is_swiss(&self) -> bool {
        matches!(self, LocalInstrument::DdCor1 | LocalInstrument::DdB2b)
    }
}

/// Direct-debit sequence type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    /// First collection under a mandate (`FRST`).
    First,
    /// Recurring collection (`RCUR`).
    Recurring,
    /// One-off collection (`OOFF`).
    #[default]
    OneOff,
    /// Final collection (`FNAL`).
    Final,
}

impl SequenceType {
    /// Wire code emitted in `SeqTp`.
    pub fn code(&self) -> &'static str {
        match self {
            SequenceType::First => "FRST",
            SequenceType::Recurring => "RCUR",
            SequenceType::OneOff => "OOFF",
            SequenceType::Final => "FNAL",
        }
    }
}

/// Mandate amendment of a direct-debit transaction. The two shapes are
/// mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MandateAmendment {
    /// The debtor pays from a different account under the same mandate;
    /// carries the original IBAN.
    OriginalDebtorAccount(String),
    /// Same mandate, new debtor agent: the debtor changed banks. Emitted as
    /// the `SMNDA` marker.
    DebtorAgentChanged,
}
