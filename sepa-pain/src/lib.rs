//! SEPA Payment Initiation Messages
//!
//! Builds ISO 20022 customer payment initiation documents: credit transfers
//! (pain.001) and direct debits (pain.008), in the international schema
//! variants and the Swiss national ones. The caller assembles a message from
//! an originating account and a list of transactions; the crate decides
//! which schema dialects that set is legally expressible in, partitions the
//! transactions into payment batches, and emits the XML document with exact
//! numeric and date formatting.
//!
//! Serialization always targets one explicit [`Dialect`]; the library never
//! picks one behind the caller's back. [`CreditTransfer::compatible_dialects`]
//! and [`DirectDebit::compatible_dialects`] answer which targets would work.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use sepa_pain::{Account, CreditTransfer, CreditTransferTransaction, Dialect};
//!
//! fn main() -> sepa_pain::Result<()> {
//!     let mut message =
//!         CreditTransfer::new(Account::new("Initiator GmbH", "DE87200500001234567890"));
//!     let transaction = CreditTransferTransaction::builder(
//!         "Telekomiker AG",
//!         "DE37112589611964645802",
//!         Decimal::new(10250, 2),
//!     )
//!     .bic("PBNKDEFF370")
//!     .reference("XYZ-1234/123")
//!     .build();
//!     message.add_transaction(transaction);
//!
//!     let xml = message.to_xml(Dialect::Pain00100103)?;
//!     assert!(xml.contains("<CtrlSum>102.50</CtrlSum>"));
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod account;
pub mod address;
pub mod compat;
pub mod config;
pub mod dialect;
pub mod error;
pub mod grouping;
pub mod message;
pub mod transaction;
pub mod types;

mod emit;
mod xml;

// Re-exports
pub use account::Account;
pub use address::PostalAddress;
pub use compat::Compatibility;
pub use config::EmitConfig;
pub use dialect::{Dialect, MessageKind};
pub use error::{Error, Result, ValidationIssue, ValidationReport};
pub use grouping::{partition, Batch, DebitGroupKey, InstructedAmount, TransferGroupKey};
pub use message::{CreditTransfer, DirectDebit};
pub use transaction::{
    CreditTransferBuilder, CreditTransferTransaction, DirectDebitBuilder, DirectDebitTransaction,
};
pub use types::{
    CreditorAgent, LocalInstrument, Mandate, MandateAmendment, PaymentMethod, PaymentType,
    Remittance, SequenceType, ServiceLevel,
};
