//! Payment transactions
//!
//! The two concrete instruction kinds share a base shape (counterparty,
//! amount, dates, remittance) and differ in their extensions: credit
//! transfers carry a payment type classification, direct debits carry
//! mandate and collection data.
//!
//! Construction goes through builders that resolve every default once:
//! currency `EUR`, requested date tomorrow, batch booking on, amounts
//! rounded half-up to two fraction digits, free text transliterated to the
//! SEPA character set. Compatibility checks later never mutate a
//! transaction.

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::address::PostalAddress;
use crate::error::{ValidationIssue, ValidationReport};
use crate::types::{
    CreditorAgent, LocalInstrument, Mandate, MandateAmendment, PaymentMethod, PaymentType,
    Remittance, SequenceType,
};

/// One credit-transfer leg: money moves from the message account to the
/// creditor named here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransferTransaction {
    /// Creditor display name.
    pub name: String,
    /// Creditor IBAN.
    pub iban: String,
    /// Creditor BIC, optional.
    pub bic: Option<String>,
    /// Instructed amount, two fraction digits.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// End-to-end identification.
    pub reference: String,
    /// Instruction identification, optional.
    pub instruction_id: Option<String>,
    /// Requested execution date.
    pub requested_date: NaiveDate,
    /// Whether this leg may be batch booked.
    pub batch_booking: bool,
    /// Remittance information, free text or structured reference.
    pub remittance: Option<Remittance>,
    /// Creditor postal address, optional.
    pub postal_address: Option<PostalAddress>,
    /// Payment type classification (SEPA scheme or a Swiss national type).
    pub payment_type: PaymentType,
    /// Swiss national payment method; must stay unset for SEPA-scheme legs
    /// under the Swiss dialect.
    pub payment_method: Option<PaymentMethod>,
    /// Creditor bank display name, drives the transaction agent block.
    pub creditor_bank_name: Option<String>,
    /// Creditor bank postal address, drives the transaction agent block.
    pub creditor_bank_postal_address: Option<PostalAddress>,
}

impl CreditTransferTransaction {
    /// Builder with the required fields.
    pub fn builder(
        name: impl Into<String>,
        iban: impl Into<String>,
        amount: Decimal,
    ) -> CreditTransferBuilder {
        CreditTransferBuilder::new(name, iban, amount)
    }

    pub(crate) fn validate_into(&self, index: usize, report: &mut ValidationReport) {
        validate_base(
            index,
            &self.name,
            &self.iban,
            self.bic.as_deref(),
            self.amount,
            &self.currency,
            &self.reference,
            self.instruction_id.as_deref(),
            self.requested_date,
            report,
        );
        match &self.remittance {
            Some(Remittance::Unstructured(text)) => {
                if text.is_empty() || text.chars().count() > 140 {
                    report.push(ValidationIssue::transaction(
                        index,
                        "remittance_information",
                        "must be 1 to 140 characters",
                    ));
                }
            }
            Some(Remittance::Structured(reference)) => {
                if reference.is_empty() || reference.chars().count() > 35 {
                    report.push(ValidationIssue::transaction(
                        index,
                        "remittance_reference",
                        "must be 1 to 35 characters",
                    ));
                }
            }
            None => {}
        }
        match &self.payment_type {
            PaymentType::SwissIsr { reference_number } => {
                let digits_ok = !reference_number.is_empty()
                    && reference_number.len() <= 27
                    && reference_number.bytes().all(|b| b.is_ascii_digit());
                if !digits_ok {
                    report.push(ValidationIssue::transaction(
                        index,
                        "reference_number",
                        "must be 1 to 27 digits",
                    ));
                }
            }
            PaymentType::SwissBank { agent } => validate_agent(index, agent, report),
            PaymentType::Sepa { .. } | PaymentType::SwissPostal | PaymentType::SwissDomestic => {}
        }
        if let Some(bank_name) = &self.creditor_bank_name {
            if bank_name.is_empty() || bank_name.chars().count() > 70 {
                report.push(ValidationIssue::transaction(
                    index,
                    "creditor_bank_name",
                    "must be 1 to 70 characters",
                ));
            }
        }
    }
}

fn validate_agent(index: usize, agent: &CreditorAgent, report: &mut ValidationReport) {
    let iid_ok = |iid: &str| {
        !iid.is_empty() && iid.len() <= 5 && iid.bytes().all(|b| b.is_ascii_digit())
    };
    match agent {
        CreditorAgent::Iid { iid } => {
            if !iid_ok(iid) {
                report.push(ValidationIssue::transaction(
                    index,
                    "creditor_agent.iid",
                    "must be 1 to 5 digits",
                ));
            }
        }
        CreditorAgent::PostalAccountWithIid {
            postal_account,
            iid,
        } => {
            if !iid_ok(iid) {
                report.push(ValidationIssue::transaction(
                    index,
                    "creditor_agent.iid",
                    "must be 1 to 5 digits",
                ));
            }
            if postal_account.is_empty() || postal_account.chars().count() > 35 {
                report.push(ValidationIssue::transaction(
                    index,
                    "creditor_agent.postal_account",
                    "must be 1 to 35 characters",
                ));
            }
        }
        CreditorAgent::PostalAccountWithName {
            postal_account,
            bank_name,
        } => {
            if postal_account.is_empty() || postal_account.chars().count() > 35 {
                report.push(ValidationIssue::transaction(
                    index,
                    "creditor_agent.postal_account",
                    "must be 1 to 35 characters",
                ));
            }
            if bank_name.is_empty() || bank_name.chars().count() > 70 {
                report.push(ValidationIssue::transaction(
                    index,
                    "creditor_agent.bank_name",
                    "must be 1 to 70 characters",
                ));
            }
        }
    }
}

/// Builder for [`CreditTransferTransaction`].
#[derive(Debug)]
pub struct CreditTransferBuilder {
    transaction: CreditTransferTransaction,
}

impl CreditTransferBuilder {
    fn new(name: impl Into<String>, iban: impl Into<String>, amount: Decimal) -> Self {
        Self {
            transaction: CreditTransferTransaction {
                name: sepa_core::sanitize(&name.into()),
                iban: iban.into(),
                bic: None,
                amount: round_amount(amount),
                currency: "EUR".to_string(),
                reference: String::new(),
                instruction_id: None,
                requested_date: default_requested_date(),
                batch_booking: true,
                remittance: None,
                postal_address: None,
                payment_type: PaymentType::default(),
                payment_method: None,
                creditor_bank_name: None,
                creditor_bank_postal_address: None,
            },
        }
    }

    /// Creditor BIC.
    pub fn bic(mut self, bic: impl Into<String>) -> Self {
        self.transaction.bic = Some(bic.into());
        self
    }

    /// Currency, `EUR` unless set.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.transaction.currency = currency.into();
        self
    }

    /// End-to-end identification.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction.reference = sepa_core::sanitize(&reference.into());
        self
    }

    /// Instruction identification.
    pub fn instruction_id(mut self, instruction_id: impl Into<String>) -> Self {
        self.transaction.instruction_id = Some(sepa_core::sanitize(&instruction_id.into()));
        self
    }

    /// Requested execution date, tomorrow unless set.
    pub fn requested_date(mut self, date: NaiveDate) -> Self {
        self.transaction.requested_date = date;
        self
    }

    /// Batch booking flag, `true` unless set.
    pub fn batch_booking(mut self, batch_booking: bool) -> Self {
        self.transaction.batch_booking = batch_booking;
        self
    }

    /// Free-text remittance information. Replaces a structured reference.
    pub fn remittance_information(mut self, text: impl Into<String>) -> Self {
        self.transaction.remittance =
            Some(Remittance::Unstructured(sepa_core::sanitize(&text.into())));
        self
    }

    /// Structured remittance reference. Replaces free text.
    pub fn remittance_reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction.remittance =
            Some(Remittance::Structured(sepa_core::sanitize(&reference.into())));
        self
    }

    /// Creditor postal address.
    pub fn postal_address(mut self, address: PostalAddress) -> Self {
        self.transaction.postal_address = Some(address);
        self
    }

    /// Payment type classification, SEPA scheme unless set.
    pub fn payment_type(mut self, payment_type: PaymentType) -> Self {
        self.transaction.payment_type = payment_type;
        self
    }

    /// Swiss national payment method.
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.transaction.payment_method = Some(payment_method);
        self
    }

    /// Creditor bank display name.
    pub fn creditor_bank_name(mut self, bank_name: impl Into<String>) -> Self {
        self.transaction.creditor_bank_name = Some(sepa_core::sanitize(&bank_name.into()));
        self
    }

    /// Creditor bank postal address.
    pub fn creditor_bank_postal_address(mut self, address: PostalAddress) -> Self {
        self.transaction.creditor_bank_postal_address = Some(address);
        self
    }

    /// Finishes the transaction.
    pub fn build(self) -> CreditTransferTransaction {
        self.transaction
    }
}

/// One direct-debit leg: money is collected from the debtor named here into
/// the creditor account of the message (or this leg's override).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDebitTransaction {
    /// Debtor display name.
    pub name: String,
    /// Debtor IBAN.
    pub iban: String,
    /// Debtor BIC, optional.
    pub bic: Option<String>,
    /// Instructed amount, two fraction digits.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// End-to-end identification.
    pub reference: String,
    /// Instruction identification, optional.
    pub instruction_id: Option<String>,
    /// Requested collection date.
    pub requested_date: NaiveDate,
    /// Whether this leg may be batch booked.
    pub batch_booking: bool,
    /// Free-text remittance information.
    pub remittance_information: Option<String>,
    /// Debtor postal address, optional.
    pub postal_address: Option<PostalAddress>,
    /// Collection scheme code; must be uniform across a message.
    pub local_instrument: LocalInstrument,
    /// Position of this collection in the mandate lifecycle.
    pub sequence_type: SequenceType,
    /// Mandate this collection draws on.
    pub mandate: Mandate,
    /// Mandate amendment, at most one of the two shapes.
    pub amendment: Option<MandateAmendment>,
    /// Creditor account override for this leg only.
    pub creditor_account: Option<Account>,
}

impl DirectDebitTransaction {
    /// Builder with the required fields.
    pub fn builder(
        name: impl Into<String>,
        iban: impl Into<String>,
        amount: Decimal,
        mandate: Mandate,
    ) -> DirectDebitBuilder {
        DirectDebitBuilder::new(name, iban, amount, mandate)
    }

    pub(crate) fn validate_into(&self, index: usize, report: &mut ValidationReport) {
        validate_base(
            index,
            &self.name,
            &self.iban,
            self.bic.as_deref(),
            self.amount,
            &self.currency,
            &self.reference,
            self.instruction_id.as_deref(),
            self.requested_date,
            report,
        );
        if let Some(text) = &self.remittance_information {
            if text.is_empty() || text.chars().count() > 140 {
                report.push(ValidationIssue::transaction(
                    index,
                    "remittance_information",
                    "must be 1 to 140 characters",
                ));
            }
        }
        if self.mandate.id.is_empty() || self.mandate.id.chars().count() > 35 {
            report.push(ValidationIssue::transaction(
                index,
                "mandate.id",
                "must be 1 to 35 characters",
            ));
        }
        if self.mandate.date_of_signature > Local::now().date_naive() {
            report.push(ValidationIssue::transaction(
                index,
                "mandate.date_of_signature",
                "must not be in the future",
            ));
        }
        if let Some(MandateAmendment::OriginalDebtorAccount(original_iban)) = &self.amendment {
            if !sepa_core::validate_iban(original_iban) {
                report.push(ValidationIssue::transaction(
                    index,
                    "amendment.original_debtor_account",
                    "invalid IBAN",
                ));
            }
        }
        if let Some(account) = &self.creditor_account {
            // Override accounts need a creditor identifier of their own.
            let mut account_report = ValidationReport::new();
            account.validate_into(true, &mut account_report);
            for issue in account_report.issues() {
                report.push(ValidationIssue::transaction(
                    index,
                    issue.field,
                    format!("creditor account override: {}", issue.message),
                ));
            }
        }
    }
}

/// Builder for [`DirectDebitTransaction`].
#[derive(Debug)]
pub struct DirectDebitBuilder {
    transaction: DirectDebitTransaction,
}

impl DirectDebitBuilder {
    fn new(
        name: impl Into<String>,
        iban: impl Into<String>,
        amount: Decimal,
        mandate: Mandate,
    ) -> Self {
        Self {
            transaction: DirectDebitTransaction {
                name: sepa_core::sanitize(&name.into()),
                iban: iban.into(),
                bic: None,
                amount: round_amount(amount),
                currency: "EUR".to_string(),
                reference: String::new(),
                instruction_id: None,
                requested_date: default_requested_date(),
                batch_booking: true,
                remittance_information: None,
                postal_address: None,
                local_instrument: LocalInstrument::default(),
                sequence_type: SequenceType::default(),
                mandate,
                amendment: None,
                creditor_account: None,
            },
        }
    }

    /// Debtor BIC.
    pub fn bic(mut self, bic: impl Into<String>) -> Self {
        self.transaction.bic = Some(bic.into());
        self
    }

    /// Currency, `EUR` unless set.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.transaction.currency = currency.into();
        self
    }

    /// End-to-end identification.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction.reference = sepa_core::sanitize(&reference.into());
        self
    }

    /// Instruction identification.
    pub fn instruction_id(mut self, instruction_id: impl Into<String>) -> Self {
        self.transaction.instruction_id = Some(sepa_core::sanitize(&instruction_id.into()));
        self
    }

    /// Requested collection date, tomorrow unless set.
    pub fn requested_date(mut self, date: NaiveDate) -> Self {
        self.transaction.requested_date = date;
        self
    }

    /// Batch booking flag, `true` unless set.
    pub fn batch_booking(mut self, batch_booking: bool) -> Self {
        self.transaction.batch_booking = batch_booking;
        self
    }

    /// Free-text remittance information.
    pub fn remittance_information(mut self, text: impl Into<String>) -> Self {
        self.transaction.remittance_information = Some(sepa_core::sanitize(&text.into()));
        self
    }

    /// Debtor postal address.
    pub fn postal_address(mut self, address: PostalAddress) -> Self {
        self.transaction.postal_address = Some(address);
        self
    }

    /// Collection scheme code, `CORE` unless set.
    pub fn local_instrument(mut self, local_instrument: LocalInstrument) -> Self {
        self.transaction.local_instrument = local_instrument;
        self
    }

    /// Sequence type, `OOFF` unless set.
    pub fn sequence_type(mut self, sequence_type: SequenceType) -> Self {
        self.transaction.sequence_type = sequence_type;
        self
    }

    /// Mandate amendment.
    pub fn amendment(mut self, amendment: MandateAmendment) -> Self {
        self.transaction.amendment = Some(amendment);
        self
    }

    /// Creditor account override for this leg.
    pub fn creditor_account(mut self, account: Account) -> Self {
        self.transaction.creditor_account = Some(account);
        self
    }

    /// Finishes the transaction.
    pub fn build(self) -> DirectDebitTransaction {
        self.transaction
    }
}

/// Rounds an instructed amount to the two fraction digits every dialect
/// emits, half away from zero.
fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Tomorrow, the earliest date banks commonly accept for execution.
fn default_requested_date() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}

#[allow(clippy::too_many_arguments)]
fn validate_base(
    index: usize,
    name: &str,
    iban: &str,
    bic: Option<&str>,
    amount: Decimal,
    currency: &str,
    reference: &str,
    instruction_id: Option<&str>,
    requested_date: NaiveDate,
    report: &mut ValidationReport,
) {
    if name.is_empty() || name.chars().count() > 70 {
        report.push(ValidationIssue::transaction(
            index,
            "name",
            "must be 1 to 70 characters",
        ));
    }
    if !sepa_core::validate_iban(iban) {
        report.push(ValidationIssue::transaction(index, "iban", "invalid IBAN"));
    }
    if let Some(bic) = bic {
        if !sepa_core::validate_bic(bic) {
            report.push(ValidationIssue::transaction(index, "bic", "invalid BIC"));
        }
    }
    if amount <= Decimal::ZERO {
        report.push(ValidationIssue::transaction(
            index,
            "amount",
            "must be positive",
        ));
    }
    let currency_ok = currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase());
    if !currency_ok {
        report.push(ValidationIssue::transaction(
            index,
            "currency",
            "must be a three letter ISO 4217 code",
        ));
    }
    if reference.is_empty() || reference.chars().count() > 35 {
        report.push(ValidationIssue::transaction(
            index,
            "reference",
            "must be 1 to 35 characters",
        ));
    }
    if let Some(instruction_id) = instruction_id {
        if instruction_id.is_empty() || instruction_id.chars().count() > 35 {
            report.push(ValidationIssue::transaction(
                index,
                "instruction_id",
                "must be 1 to 35 characters",
            ));
        }
    }
    if requested_date < Local::now().date_naive() {
        report.push(ValidationIssue::transaction(
            index,
            "requested_date",
            "must be today or later",
        ));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_credit_transfer() -> CreditTransferTransaction {
        CreditTransferTransaction::builder(
            "Telekomiker AG",
            "DE37112589611964645802",
            Decimal::new(10250, 2),
        )
        .bic("PBNKDEFF370")
        .reference("XYZ-1234/123")
        .remittance_information("Rechnung vom 22.08.2026")
        .build()
    }

    pub(crate) fn valid_direct_debit() -> DirectDebitTransaction {
        DirectDebitTransaction::builder(
            "Zahlemann & Söhne GbR",
            "DE21500500009876543210",
            Decimal::new(3950, 2),
            Mandate::new("K-02-2026-42123", date(2026, 1, 15)),
        )
        .bic("SPUEDE2UXXX")
        .reference("XYZ/2026-08/1234")
        .remittance_information("Vielen Dank für Ihren Einkauf")
        .build()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn issues_for_ct(transaction: &CreditTransferTransaction) -> ValidationReport {
        let mut report = ValidationReport::new();
        transaction.validate_into(0, &mut report);
        report
    }

    fn issues_for_dd(transaction: &DirectDebitTransaction) -> ValidationReport {
        let mut report = ValidationReport::new();
        transaction.validate_into(0, &mut report);
        report
    }

    #[test]
    fn builder_resolves_defaults() {
        let transaction = valid_credit_transfer();
        assert_eq!(transaction.currency, "EUR");
        assert!(transaction.batch_booking);
        assert_eq!(transaction.payment_type, PaymentType::default());
        assert_eq!(
            transaction.requested_date,
            Local::now().date_naive() + Duration::days(1)
        );
        assert!(issues_for_ct(&transaction).is_empty());
    }

    #[test]
    fn amounts_are_rounded_to_two_fraction_digits() {
        let transaction = CreditTransferTransaction::builder(
            "Telekomiker AG",
            "DE37112589611964645802",
            Decimal::new(102_505, 3), // 102.505
        )
        .reference("RF-1")
        .build();
        assert_eq!(transaction.amount, Decimal::new(10251, 2));
        assert_eq!(transaction.amount.to_string(), "102.51");
    }

    #[test]
    fn free_text_is_transliterated() {
        let transaction = valid_direct_debit();
        assert_eq!(transaction.name, "Zahlemann + Soehne GbR");
        assert_eq!(
            transaction.remittance_information.as_deref(),
            Some("Vielen Dank fuer Ihren Einkauf")
        );
    }

    #[test]
    fn yesterday_is_rejected() {
        let transaction = CreditTransferTransaction::builder(
            "Telekomiker AG",
            "DE37112589611964645802",
            Decimal::new(10250, 2),
        )
        .reference("RF-1")
        .requested_date(Local::now().date_naive() - Duration::days(1))
        .build();
        let report = issues_for_ct(&transaction);
        assert!(report
            .issues()
            .iter()
            .any(|issue| issue.field == "requested_date"));
    }

    #[test]
    fn today_is_accepted() {
        let transaction = CreditTransferTransaction::builder(
            "Telekomiker AG",
            "DE37112589611964645802",
            Decimal::new(10250, 2),
        )
        .reference("RF-1")
        .requested_date(Local::now().date_naive())
        .build();
        assert!(issues_for_ct(&transaction).is_empty());
    }

    #[test]
    fn missing_reference_is_reported() {
        let transaction = CreditTransferTransaction::builder(
            "Telekomiker AG",
            "DE37112589611964645802",
            Decimal::new(10250, 2),
        )
        .build();
        let report = issues_for_ct(&transaction);
        assert!(report.issues().iter().any(|issue| issue.field == "reference"));
    }

    #[test]
    fn all_issues_are_collected_in_one_pass() {
        let transaction = CreditTransferTransaction::builder(
            "",
            "DE00112589611964645802",
            Decimal::new(-5, 0),
        )
        .currency("eur")
        .build();
        let report = issues_for_ct(&transaction);
        let fields: Vec<&str> = report.issues().iter().map(|issue| issue.field).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"iban"));
        assert!(fields.contains(&"amount"));
        assert!(fields.contains(&"currency"));
        assert!(fields.contains(&"reference"));
    }

    #[test]
    fn isr_reference_must_be_digits() {
        let transaction = CreditTransferTransaction::builder(
            "Empfänger AG",
            "CH8904835098765432000",
            Decimal::new(10000, 2),
        )
        .reference("RF-1")
        .currency("CHF")
        .payment_type(PaymentType::SwissIsr {
            reference_number: "12-34".to_string(),
        })
        .payment_method(PaymentMethod::Transfer)
        .build();
        let report = issues_for_ct(&transaction);
        assert!(report
            .issues()
            .iter()
            .any(|issue| issue.field == "reference_number"));
    }

    #[test]
    fn mandate_signature_cannot_be_in_the_future() {
        let mut transaction = valid_direct_debit();
        transaction.mandate.date_of_signature = Local::now().date_naive() + Duration::days(3);
        let report = issues_for_dd(&transaction);
        assert!(report
            .issues()
            .iter()
            .any(|issue| issue.field == "mandate.date_of_signature"));
    }

    #[test]
    fn amendment_iban_is_checked() {
        let mut transaction = valid_direct_debit();
        transaction.amendment = Some(MandateAmendment::OriginalDebtorAccount(
            "DE99999999999999999999".to_string(),
        ));
        let report = issues_for_dd(&transaction);
        assert!(report
            .issues()
            .iter()
            .any(|issue| issue.field == "amendment.original_debtor_account"));
    }

    #[test]
    fn creditor_account_override_is_validated() {
        let mut transaction = valid_direct_debit();
        transaction.creditor_account =
            Some(Account::new("Gläubiger GmbH", "DE87200500001234567890"));
        let report = issues_for_dd(&transaction);
        assert!(report
            .issues()
            .iter()
            .any(|issue| issue.field == "account.creditor_identifier"
                && issue.transaction == Some(0)));
    }
}
