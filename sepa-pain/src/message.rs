//! Message assembly and serialization
//!
//! A message is one originating account plus an ordered list of transactions
//! of a single kind. Serialization is all-or-nothing: structural validation
//! runs first and collects every issue, then every transaction is checked
//! against the requested dialect, then the batches are formed and the
//! document is emitted. No partial document ever escapes.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::account::Account;
use crate::compat::Compatibility;
use crate::config::EmitConfig;
use crate::dialect::{Dialect, MessageKind};
use crate::emit;
use crate::error::{Error, Result, ValidationIssue, ValidationReport};
use crate::grouping;
use crate::transaction::{CreditTransferTransaction, DirectDebitTransaction};

fn default_message_id(created_at: DateTime<Utc>) -> String {
    format!("SEPA/{}", created_at.format("%Y%m%d%H%M%S"))
}

fn validate_message_id(message_id: &str, report: &mut ValidationReport) {
    let ok = !message_id.is_empty()
        && message_id.chars().count() <= 35
        && sepa_core::is_sepa_text(message_id);
    if !ok {
        report.push(ValidationIssue::message(
            "message_id",
            "must be 1 to 35 SEPA characters",
        ));
    }
}

/// A customer credit transfer initiation message.
#[derive(Debug, Clone)]
pub struct CreditTransfer {
    account: Account,
    transactions: Vec<CreditTransferTransaction>,
    message_id: String,
    created_at: DateTime<Utc>,
    supported_dialects: Vec<Dialect>,
}

impl CreditTransfer {
    /// New message debiting `account`. The creation timestamp is captured
    /// now and seeds the default message id.
    pub fn new(account: Account) -> Self {
        let created_at = Utc::now();
        Self {
            account,
            transactions: Vec::new(),
            message_id: default_message_id(created_at),
            created_at,
            supported_dialects: MessageKind::CreditTransfer.default_dialects(),
        }
    }

    /// Replaces the generated message id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Replaces the default supported-dialect list. Order is preserved and
    /// meaningful: [`compatible_dialects`](Self::compatible_dialects) filters
    /// this list without reordering it.
    pub fn with_supported_dialects(mut self, dialects: Vec<Dialect>) -> Self {
        self.supported_dialects = dialects;
        self
    }

    /// Appends one transaction. Input order is preserved within each batch.
    pub fn add_transaction(&mut self, transaction: CreditTransferTransaction) {
        self.transactions.push(transaction);
    }

    /// The originating (debtor) account.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// All transactions in insertion order.
    pub fn transactions(&self) -> &[CreditTransferTransaction] {
        &self.transactions
    }

    /// The message identification emitted as `MsgId`.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// The creation timestamp emitted as `CreDtTm`.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The dialects this message may be serialized to.
    pub fn supported_dialects(&self) -> &[Dialect] {
        &self.supported_dialects
    }

    /// Supported dialects every transaction is compatible with, in the
    /// supported-list order.
    pub fn compatible_dialects(&self) -> Vec<Dialect> {
        self.supported_dialects
            .iter()
            .copied()
            .filter(|dialect| {
                self.transactions
                    .iter()
                    .all(|transaction| transaction.is_compatible_with(*dialect))
            })
            .collect()
    }

    /// Runs structural and compatibility validation for `dialect` without
    /// emitting anything.
    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        self.validate_structure(dialect)?;
        validate_compatibility(&self.transactions, dialect, CreditTransferTransaction::compatibility)
    }

    fn validate_structure(&self, dialect: Dialect) -> Result<()> {
        let mut report = ValidationReport::new();
        if dialect.kind() != MessageKind::CreditTransfer {
            report.push(ValidationIssue::message(
                "dialect",
                format!("{dialect} encodes direct debits, not credit transfers"),
            ));
        }
        if self.transactions.is_empty() {
            report.push(ValidationIssue::message(
                "transactions",
                "at least one transaction is required",
            ));
        }
        validate_message_id(&self.message_id, &mut report);
        self.account.validate_into(false, &mut report);
        for (index, transaction) in self.transactions.iter().enumerate() {
            transaction.validate_into(index, &mut report);
        }
        report.into_result()
    }

    /// Serializes the message in `dialect` with default output options.
    pub fn to_xml(&self, dialect: Dialect) -> Result<String> {
        self.to_xml_with(dialect, &EmitConfig::default())
    }

    /// Serializes the message in `dialect`.
    pub fn to_xml_with(&self, dialect: Dialect, config: &EmitConfig) -> Result<String> {
        debug!(
            "Serializing credit transfer message {} as {}",
            self.message_id, dialect
        );
        self.validate(dialect)?;
        let batches =
            grouping::partition(&self.transactions, CreditTransferTransaction::group_key);
        let document = emit::credit_transfer::document(self, &batches, dialect, config)?;
        info!(
            "Serialized {} transactions in {} batches as {}",
            self.transactions.len(),
            batches.len(),
            dialect
        );
        Ok(document)
    }
}

/// A customer direct debit initiation message.
#[derive(Debug, Clone)]
pub struct DirectDebit {
    account: Account,
    transactions: Vec<DirectDebitTransaction>,
    message_id: String,
    created_at: DateTime<Utc>,
    supported_dialects: Vec<Dialect>,
}

impl DirectDebit {
    /// New message collecting into `account`. The account needs a creditor
    /// identifier; its absence is reported at validation time.
    pub fn new(account: Account) -> Self {
        let created_at = Utc::now();
        Self {
            account,
            transactions: Vec::new(),
            message_id: default_message_id(created_at),
            created_at,
            supported_dialects: MessageKind::DirectDebit.default_dialects(),
        }
    }

    /// Replaces the generated message id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Replaces the default supported-dialect list.
    pub fn with_supported_dialects(mut self, dialects: Vec<Dialect>) -> Self {
        self.supported_dialects = dialects;
        self
    }

    /// Appends one transaction.
    pub fn add_transaction(&mut self, transaction: DirectDebitTransaction) {
        self.transactions.push(transaction);
    }

    /// The creditor account collections flow into, unless a transaction
    /// overrides it.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// All transactions in insertion order.
    pub fn transactions(&self) -> &[DirectDebitTransaction] {
        &self.transactions
    }

    /// The message identification emitted as `MsgId`.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// The creation timestamp emitted as `CreDtTm`.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The dialects this message may be serialized to.
    pub fn supported_dialects(&self) -> &[Dialect] {
        &self.supported_dialects
    }

    /// Supported dialects every transaction is compatible with, in the
    /// supported-list order.
    pub fn compatible_dialects(&self) -> Vec<Dialect> {
        self.supported_dialects
            .iter()
            .copied()
            .filter(|dialect| {
                self.transactions
                    .iter()
                    .all(|transaction| transaction.is_compatible_with(*dialect))
            })
            .collect()
    }

    /// Runs structural and compatibility validation for `dialect` without
    /// emitting anything.
    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        self.validate_structure(dialect)?;
        validate_compatibility(&self.transactions, dialect, DirectDebitTransaction::compatibility)
    }

    fn validate_structure(&self, dialect: Dialect) -> Result<()> {
        let mut report = ValidationReport::new();
        if dialect.kind() != MessageKind::DirectDebit {
            report.push(ValidationIssue::message(
                "dialect",
                format!("{dialect} encodes credit transfers, not direct debits"),
            ));
        }
        if self.transactions.is_empty() {
            report.push(ValidationIssue::message(
                "transactions",
                "at least one transaction is required",
            ));
        }
        let mixed = self
            .transactions
            .windows(2)
            .any(|pair| pair[0].local_instrument != pair[1].local_instrument);
        if mixed {
            report.push(ValidationIssue::message(
                "local_instrument",
                "must not be mixed in one message",
            ));
        }
        validate_message_id(&self.message_id, &mut report);
        self.account.validate_into(true, &mut report);
        for (index, transaction) in self.transactions.iter().enumerate() {
            transaction.validate_into(index, &mut report);
        }
        report.into_result()
    }

    /// Serializes the message in `dialect` with default output options.
    pub fn to_xml(&self, dialect: Dialect) -> Result<String> {
        self.to_xml_with(dialect, &EmitConfig::default())
    }

    /// Serializes the message in `dialect`.
    pub fn to_xml_with(&self, dialect: Dialect, config: &EmitConfig) -> Result<String> {
        debug!(
            "Serializing direct debit message {} as {}",
            self.message_id, dialect
        );
        self.validate(dialect)?;
        let batches = grouping::partition(&self.transactions, |transaction| {
            transaction.group_key(&self.account)
        });
        let document = emit::direct_debit::document(self, &batches, dialect, config)?;
        info!(
            "Serialized {} transactions in {} batches as {}",
            self.transactions.len(),
            batches.len(),
            dialect
        );
        Ok(document)
    }
}

/// Checks every transaction against `dialect`. Unsupported payment types
/// take precedence over plain incompatibilities: they cannot be fixed by
/// editing fields, so reporting them first keeps the caller from chasing the
/// wrong problem.
fn validate_compatibility<T>(
    transactions: &[T],
    dialect: Dialect,
    check: impl Fn(&T, Dialect) -> Compatibility,
) -> Result<()> {
    let mut unsupported = Vec::new();
    let mut rejected = Vec::new();
    for (index, transaction) in transactions.iter().enumerate() {
        match check(transaction, dialect) {
            Compatibility::Compatible => {}
            Compatibility::Incompatible(reason) => rejected.push((index, reason)),
            Compatibility::Unsupported(_) => unsupported.push(index),
        }
    }
    if !unsupported.is_empty() {
        return Err(Error::UnsupportedPaymentType {
            dialect,
            transactions: unsupported,
        });
    }
    if !rejected.is_empty() {
        return Err(Error::Incompatible { dialect, rejected });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use rust_decimal::Decimal;

    use super::*;
    use crate::transaction::tests::{valid_credit_transfer, valid_direct_debit};
    use crate::types::{LocalInstrument, PaymentType};

    fn debtor() -> Account {
        Account::new("Initiator GmbH", "DE87200500001234567890").with_bic("BANKDEFFXXX")
    }

    fn creditor() -> Account {
        Account::new("Gläubiger GmbH", "DE87200500001234567890")
            .with_creditor_identifier("DE98ZZZ09999999999")
    }

    #[test]
    fn message_id_defaults_to_timestamp_form() {
        let message = CreditTransfer::new(debtor());
        assert!(message.message_id().starts_with("SEPA/2"));
        assert_eq!(message.message_id().len(), "SEPA/".len() + 14);
    }

    #[test]
    fn supported_dialects_default_most_specific_first() {
        let message = CreditTransfer::new(debtor());
        assert_eq!(
            message.supported_dialects(),
            &[
                Dialect::Pain00100303,
                Dialect::Pain00100203,
                Dialect::Pain00100103,
                Dialect::Pain00100103Ch02,
            ]
        );
    }

    #[test]
    fn compatible_dialects_keeps_supported_order() {
        let mut message = CreditTransfer::new(debtor());
        message.add_transaction(valid_credit_transfer());
        let compatible = message.compatible_dialects();
        assert_eq!(
            compatible,
            vec![
                Dialect::Pain00100303,
                Dialect::Pain00100203,
                Dialect::Pain00100103,
                Dialect::Pain00100103Ch02,
            ]
        );

        let mut transaction = valid_credit_transfer();
        transaction.bic = None;
        message.add_transaction(transaction);
        // The BIC-mandatory dialect drops out, order otherwise unchanged.
        assert_eq!(
            message.compatible_dialects(),
            vec![
                Dialect::Pain00100303,
                Dialect::Pain00100103,
                Dialect::Pain00100103Ch02,
            ]
        );
    }

    #[test]
    fn injected_dialect_list_replaces_the_default() {
        let message = CreditTransfer::new(debtor())
            .with_supported_dialects(vec![Dialect::Pain00100103]);
        assert_eq!(message.supported_dialects(), &[Dialect::Pain00100103]);
        assert_eq!(message.compatible_dialects(), vec![Dialect::Pain00100103]);
    }

    #[test]
    fn empty_message_fails_validation() {
        let message = CreditTransfer::new(debtor());
        let err = message.validate(Dialect::Pain00100103).unwrap_err();
        assert!(err.to_string().contains("at least one transaction"));
    }

    #[test]
    fn overlong_message_id_is_rejected() {
        let mut message = CreditTransfer::new(debtor()).with_message_id("X".repeat(36));
        message.add_transaction(valid_credit_transfer());
        let err = message.validate(Dialect::Pain00100103).unwrap_err();
        assert!(err.to_string().contains("message_id"));
    }

    #[test]
    fn kind_mismatch_is_a_structural_error() {
        let mut message = CreditTransfer::new(debtor());
        message.add_transaction(valid_credit_transfer());
        let err = message.validate(Dialect::Pain00800102).unwrap_err();
        match err {
            Error::Validation(report) => {
                assert!(report.issues().iter().any(|issue| issue.field == "dialect"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn every_incompatible_transaction_is_listed() {
        let mut message = CreditTransfer::new(debtor());
        let mut first = valid_credit_transfer();
        first.bic = None;
        let second = valid_credit_transfer();
        let mut third = valid_credit_transfer();
        third.currency = "CHF".to_string();
        message.add_transaction(first);
        message.add_transaction(second);
        message.add_transaction(third);

        match message.validate(Dialect::Pain00100203).unwrap_err() {
            Error::Incompatible { dialect, rejected } => {
                assert_eq!(dialect, Dialect::Pain00100203);
                let indices: Vec<usize> = rejected.iter().map(|(index, _)| *index).collect();
                assert_eq!(indices, vec![0, 2]);
            }
            other => panic!("expected incompatibility, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_takes_precedence_over_incompatible() {
        let mut message = CreditTransfer::new(debtor());
        let mut domestic = valid_credit_transfer();
        domestic.currency = "CHF".to_string();
        domestic.payment_type = PaymentType::SwissDomestic;
        let mut urgent = valid_credit_transfer();
        urgent.payment_type = PaymentType::Sepa {
            service_level: crate::types::ServiceLevel::Urgent,
        };
        message.add_transaction(domestic);
        message.add_transaction(urgent);

        match message.validate(Dialect::Pain00100103Ch02).unwrap_err() {
            Error::UnsupportedPaymentType {
                dialect,
                transactions,
            } => {
                assert_eq!(dialect, Dialect::Pain00100103Ch02);
                assert_eq!(transactions, vec![0]);
            }
            other => panic!("expected unsupported payment type, got {other:?}"),
        }
    }

    #[test]
    fn mixed_local_instruments_never_validate() {
        let mut message = DirectDebit::new(creditor());
        message.add_transaction(valid_direct_debit());
        let mut other = valid_direct_debit();
        other.local_instrument = LocalInstrument::B2b;
        message.add_transaction(other);

        for dialect in MessageKind::DirectDebit.default_dialects() {
            let err = message.validate(dialect).unwrap_err();
            match err {
                Error::Validation(report) => {
                    assert!(report
                        .issues()
                        .iter()
                        .any(|issue| issue.field == "local_instrument"));
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn direct_debit_account_needs_a_creditor_identifier() {
        let mut message = DirectDebit::new(Account::new(
            "Gläubiger GmbH",
            "DE87200500001234567890",
        ));
        message.add_transaction(valid_direct_debit());
        let err = message.validate(Dialect::Pain00800102).unwrap_err();
        assert!(err.to_string().contains("account.creditor_identifier"));
    }

    #[test]
    fn validation_failure_blocks_serialization() {
        let mut message = CreditTransfer::new(debtor());
        let mut transaction = valid_credit_transfer();
        transaction.requested_date = Local::now().date_naive() - Duration::days(1);
        message.add_transaction(transaction);
        assert!(message.to_xml(Dialect::Pain00100103).is_err());
    }

    #[test]
    fn repeated_serialization_is_byte_identical() {
        let mut message = CreditTransfer::new(debtor());
        let mut transaction = valid_credit_transfer();
        transaction.amount = Decimal::new(15000, 2);
        message.add_transaction(transaction);
        let first = message.to_xml(Dialect::Pain00100103).unwrap();
        let second = message.to_xml(Dialect::Pain00100103).unwrap();
        assert_eq!(first, second);
    }
}
