//! Dialect compatibility engine
//!
//! Decides, per transaction and target dialect, whether the transaction's
//! field combination is legally expressible in that dialect. The check is a
//! pure function: defaults were resolved when the transaction was built, and
//! evaluating compatibility never mutates anything, so the answer is the
//! same no matter how often or in which order dialects are queried.
//!
//! Three outcomes exist. `Incompatible` means the field combination breaks
//! the dialect's rules and the caller can fix it by editing fields.
//! `Unsupported` is reserved for the Swiss domestic payment types that are
//! legal to construct but not implemented by any schema here; no field edit
//! short of reclassifying the payment changes that.

use crate::dialect::Dialect;
use crate::transaction::{CreditTransferTransaction, DirectDebitTransaction};
use crate::types::{LocalInstrument, PaymentType, Remittance, ServiceLevel};

/// Outcome of one compatibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// The transaction is expressible in the dialect.
    Compatible,
    /// The transaction breaks the dialect's rules; the reason names the
    /// offending field combination.
    Incompatible(String),
    /// The transaction's payment classification is legal but not
    /// implemented for this dialect.
    Unsupported(String),
}

impl Compatibility {
    /// True only for [`Compatibility::Compatible`].
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Compatibility::Compatible => None,
            Compatibility::Incompatible(reason) | Compatibility::Unsupported(reason) => {
                Some(reason)
            }
        }
    }
}

fn incompatible(reason: impl Into<String>) -> Compatibility {
    Compatibility::Incompatible(reason.into())
}

impl CreditTransferTransaction {
    /// Checks this transaction against one dialect.
    pub fn compatibility(&self, dialect: Dialect) -> Compatibility {
        match dialect {
            Dialect::Pain00100103 => pain_001_001_03(self),
            Dialect::Pain00100203 => pain_001_002_03(self),
            Dialect::Pain00100303 => pain_001_003_03(self),
            Dialect::Pain00100103Ch02 => pain_001_001_03_ch_02(self),
            Dialect::Pain00800102
            | Dialect::Pain00800202
            | Dialect::Pain00800302
            | Dialect::Pain00800102Ch03 => {
                incompatible(format!("{dialect} encodes direct debits, not credit transfers"))
            }
        }
    }

    /// Boolean view of [`compatibility`](Self::compatibility).
    pub fn is_compatible_with(&self, dialect: Dialect) -> bool {
        self.compatibility(dialect).is_compatible()
    }
}

impl DirectDebitTransaction {
    /// Checks this transaction against one dialect.
    pub fn compatibility(&self, dialect: Dialect) -> Compatibility {
        match dialect {
            Dialect::Pain00800102 => pain_008_001_02(self),
            Dialect::Pain00800202 => pain_008_002_02(self),
            Dialect::Pain00800302 => pain_008_003_02(self),
            Dialect::Pain00800102Ch03 => pain_008_001_02_ch_03(self),
            Dialect::Pain00100103
            | Dialect::Pain00100203
            | Dialect::Pain00100303
            | Dialect::Pain00100103Ch02 => {
                incompatible(format!("{dialect} encodes credit transfers, not direct debits"))
            }
        }
    }

    /// Boolean view of [`compatibility`](Self::compatibility).
    pub fn is_compatible_with(&self, dialect: Dialect) -> bool {
        self.compatibility(dialect).is_compatible()
    }
}

/// Rejections shared by all international credit-transfer schemas.
fn international_rejection(transaction: &CreditTransferTransaction) -> Option<Compatibility> {
    if transaction.payment_type.is_swiss() {
        return Some(incompatible(
            "national payment types require pain.001.001.03.ch.02",
        ));
    }
    if matches!(transaction.remittance, Some(Remittance::Structured(_))) {
        return Some(incompatible(
            "structured remittance is only expressible in pain.001.001.03.ch.02",
        ));
    }
    None
}

fn pain_001_001_03(transaction: &CreditTransferTransaction) -> Compatibility {
    if let Some(rejection) = international_rejection(transaction) {
        return rejection;
    }
    match transaction.payment_type {
        PaymentType::Sepa {
            service_level: ServiceLevel::Sepa,
        } => Compatibility::Compatible,
        _ => incompatible("URGP service level requires pain.001.003.03"),
    }
}

fn pain_001_002_03(transaction: &CreditTransferTransaction) -> Compatibility {
    if let Some(rejection) = international_rejection(transaction) {
        return rejection;
    }
    if !matches!(
        transaction.payment_type,
        PaymentType::Sepa {
            service_level: ServiceLevel::Sepa
        }
    ) {
        return incompatible("URGP service level requires pain.001.003.03");
    }
    if transaction.bic.is_none() {
        return incompatible("BIC is mandatory in pain.001.002.03");
    }
    if transaction.currency != "EUR" {
        return incompatible("currency must be EUR");
    }
    Compatibility::Compatible
}

fn pain_001_003_03(transaction: &CreditTransferTransaction) -> Compatibility {
    if let Some(rejection) = international_rejection(transaction) {
        return rejection;
    }
    // Both SEPA and URGP service levels are accepted here.
    if transaction.currency != "EUR" {
        return incompatible("currency must be EUR");
    }
    Compatibility::Compatible
}

/// The Swiss credit-transfer state machine, one arm per payment type.
fn pain_001_001_03_ch_02(transaction: &CreditTransferTransaction) -> Compatibility {
    match &transaction.payment_type {
        PaymentType::Sepa {
            service_level: ServiceLevel::Sepa,
        } => {
            if transaction.payment_method.is_some() {
                incompatible("payment method must be unset for SEPA scheme payments")
            } else if transaction.currency != "EUR" {
                incompatible("SEPA scheme payments must be in EUR")
            } else {
                Compatibility::Compatible
            }
        }
        PaymentType::Sepa {
            service_level: ServiceLevel::Urgent,
        } => incompatible("URGP service level is not accepted by the Swiss schema"),
        PaymentType::SwissIsr { .. } => swiss_national(transaction, "ISR payments"),
        PaymentType::SwissPostal => swiss_national(transaction, "postal payments"),
        PaymentType::SwissBank { .. } => swiss_national(transaction, "bank payments"),
        PaymentType::SwissDomestic => {
            if swiss_currency(&transaction.currency) {
                Compatibility::Unsupported(
                    "reserved domestic payment types are not implemented".to_string(),
                )
            } else {
                incompatible("domestic payments must be in EUR or CHF")
            }
        }
    }
}

/// Constraints shared by the implemented Swiss national payment types. The
/// per-type field requirements (ISR reference, creditor agent key-set) are
/// carried by the payment type variant itself.
fn swiss_national(transaction: &CreditTransferTransaction, label: &str) -> Compatibility {
    if !swiss_currency(&transaction.currency) {
        return incompatible(format!("{label} must be in EUR or CHF"));
    }
    if transaction.payment_method.is_none() {
        return incompatible(format!("{label} require a payment method (TRF or TRA)"));
    }
    Compatibility::Compatible
}

fn swiss_currency(currency: &str) -> bool {
    currency == "EUR" || currency == "CHF"
}

fn pain_008_001_02(transaction: &DirectDebitTransaction) -> Compatibility {
    if transaction.local_instrument.is_swiss() {
        return incompatible("CH-DD scheme codes require pain.008.001.02.ch.03");
    }
    Compatibility::Compatible
}

fn pain_008_002_02(transaction: &DirectDebitTransaction) -> Compatibility {
    match transaction.local_instrument {
        LocalInstrument::Core | LocalInstrument::B2b => {}
        LocalInstrument::Cor1 => {
            return incompatible("COR1 requires pain.008.003.02");
        }
        LocalInstrument::DdCor1 | LocalInstrument::DdB2b => {
            return incompatible("CH-DD scheme codes require pain.008.001.02.ch.03");
        }
    }
    if transaction.bic.is_none() {
        return incompatible("BIC is mandatory in pain.008.002.02");
    }
    if transaction.currency != "EUR" {
        return incompatible("currency must be EUR");
    }
    Compatibility::Compatible
}

fn pain_008_003_02(transaction: &DirectDebitTransaction) -> Compatibility {
    if transaction.local_instrument.is_swiss() {
        return incompatible("CH-DD scheme codes require pain.008.001.02.ch.03");
    }
    if transaction.currency != "EUR" {
        return incompatible("currency must be EUR");
    }
    Compatibility::Compatible
}

fn pain_008_001_02_ch_03(transaction: &DirectDebitTransaction) -> Compatibility {
    if !transaction.local_instrument.is_swiss() {
        return incompatible("the Swiss schema accepts only the DDCOR1 and DDB2B scheme codes");
    }
    if !swiss_currency(&transaction.currency) {
        return incompatible("collections must be in EUR or CHF");
    }
    if transaction.bic.is_some() {
        return incompatible(
            "the Swiss schema identifies agents by clearing system member id, not BIC",
        );
    }
    if transaction.amendment.is_some() {
        return incompatible("mandate amendments are not expressible in the Swiss schema");
    }
    Compatibility::Compatible
}
