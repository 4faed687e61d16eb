//! Batch grouping
//!
//! Partitions an instruction list into payment batches. Every transaction
//! whose grouping key equals an earlier one joins that batch; batches appear
//! in the order their keys were first seen, and members keep their input
//! order. The scan works on a plain vector so no hash-map iteration order
//! ever leaks into the document.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::account::Account;
use crate::transaction::{CreditTransferTransaction, DirectDebitTransaction};
use crate::types::{LocalInstrument, SequenceType, ServiceLevel};

/// Exposes the instructed amount so batches can total their members.
pub trait InstructedAmount {
    /// The instructed amount.
    fn amount(&self) -> Decimal;
}

impl InstructedAmount for CreditTransferTransaction {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl InstructedAmount for DirectDebitTransaction {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// One payment batch: the shared key plus its members in input order.
///
/// Batches are always derived from a transaction list; the aggregates are
/// computed from the member list on every call and never stored.
#[derive(Debug)]
pub struct Batch<'a, T, K> {
    /// The grouping key all members share.
    pub key: K,
    /// Members, in the order they appeared in the input.
    pub transactions: Vec<&'a T>,
}

impl<T, K> Batch<'_, T, K> {
    /// Number of transactions in this batch.
    pub fn count(&self) -> usize {
        self.transactions.len()
    }
}

impl<T: InstructedAmount, K> Batch<'_, T, K> {
    /// Exact decimal sum of the member amounts.
    pub fn control_sum(&self) -> Decimal {
        self.transactions
            .iter()
            .map(|transaction| transaction.amount())
            .sum()
    }
}

/// Splits `transactions` into batches keyed by `key_fn`.
pub fn partition<T, K, F>(transactions: &[T], key_fn: F) -> Vec<Batch<'_, T, K>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut batches: Vec<Batch<'_, T, K>> = Vec::new();
    for transaction in transactions {
        let key = key_fn(transaction);
        match batches.iter_mut().find(|batch| batch.key == key) {
            Some(batch) => batch.transactions.push(transaction),
            None => batches.push(Batch {
                key,
                transactions: vec![transaction],
            }),
        }
    }
    batches
}

/// Fields a credit-transfer batch shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferGroupKey {
    /// Requested execution date.
    pub requested_date: NaiveDate,
    /// Batch booking flag.
    pub batch_booking: bool,
    /// Service level of the SEPA classification, `None` for the Swiss ones.
    pub service_level: Option<ServiceLevel>,
}

impl CreditTransferTransaction {
    /// The grouping key of this transaction.
    pub fn group_key(&self) -> TransferGroupKey {
        TransferGroupKey {
            requested_date: self.requested_date,
            batch_booking: self.batch_booking,
            service_level: self.payment_type.service_level(),
        }
    }
}

/// Fields a direct-debit batch shares. The creditor account is the
/// per-transaction override when present, otherwise the message account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebitGroupKey {
    /// Requested collection date.
    pub requested_date: NaiveDate,
    /// Collection scheme code.
    pub local_instrument: LocalInstrument,
    /// Mandate sequence type.
    pub sequence_type: SequenceType,
    /// Batch booking flag.
    pub batch_booking: bool,
    /// Effective creditor account, compared by value.
    pub creditor_account: Account,
}

impl DirectDebitTransaction {
    /// The grouping key of this transaction, given the message account.
    pub fn group_key(&self, message_account: &Account) -> DebitGroupKey {
        DebitGroupKey {
            requested_date: self.requested_date,
            local_instrument: self.local_instrument,
            sequence_type: self.sequence_type,
            batch_booking: self.batch_booking,
            creditor_account: self
                .creditor_account
                .clone()
                .unwrap_or_else(|| message_account.clone()),
        }
    }
}
