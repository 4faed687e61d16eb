//! Originating accounts

use serde::{Deserialize, Serialize};

use crate::address::PostalAddress;
use crate::error::{ValidationIssue, ValidationReport};

/// A debtor or creditor bank account heading a message, or overriding the
/// creditor side of a single direct-debit transaction.
///
/// Participates by value in the direct-debit grouping key, so two accounts
/// with identical fields land their transactions in the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Account holder display name.
    pub name: String,
    /// IBAN in electronic format.
    pub iban: String,
    /// BIC, optional. Some dialects require it, see the compatibility rules.
    pub bic: Option<String>,
    /// National clearing number (Swiss IID), used by the Swiss
    /// credit-transfer debtor agent block.
    pub clearing_number: Option<String>,
    /// SEPA creditor identifier; required when the account heads a
    /// direct-debit message.
    pub creditor_identifier: Option<String>,
    /// Postal address, optional.
    pub postal_address: Option<PostalAddress>,
}

impl Account {
    /// New account with the required fields. The name is transliterated to
    /// the SEPA character set.
    pub fn new(name: impl Into<String>, iban: impl Into<String>) -> Self {
        Self {
            name: sepa_core::sanitize(&name.into()),
            iban: iban.into(),
            bic: None,
            clearing_number: None,
            creditor_identifier: None,
            postal_address: None,
        }
    }

    /// Sets the BIC.
    pub fn with_bic(mut self, bic: impl Into<String>) -> Self {
        self.bic = Some(bic.into());
        self
    }

    /// Sets the national clearing number.
    pub fn with_clearing_number(mut self, clearing_number: impl Into<String>) -> Self {
        self.clearing_number = Some(clearing_number.into());
        self
    }

    /// Sets the SEPA creditor identifier.
    pub fn with_creditor_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.creditor_identifier = Some(identifier.into());
        self
    }

    /// Sets the postal address.
    pub fn with_postal_address(mut self, address: PostalAddress) -> Self {
        self.postal_address = Some(address);
        self
    }

    /// Collects structural issues into `report`. `require_creditor_identifier`
    /// is set for direct-debit message accounts.
    pub(crate) fn validate_into(
        &self,
        require_creditor_identifier: bool,
        report: &mut ValidationReport,
    ) {
        if self.name.is_empty() || self.name.chars().count() > 70 {
            report.push(ValidationIssue::message(
                "account.name",
                "must be 1 to 70 characters",
            ));
        }
        if !sepa_core::validate_iban(&self.iban) {
            report.push(ValidationIssue::message("account.iban", "invalid IBAN"));
        }
        if let Some(bic) = &self.bic {
            if !sepa_core::validate_bic(bic) {
                report.push(ValidationIssue::message("account.bic", "invalid BIC"));
            }
        }
        if let Some(clearing_number) = &self.clearing_number {
            let digits_ok = !clearing_number.is_empty()
                && clearing_number.len() <= 5
                && clearing_number.bytes().all(|b| b.is_ascii_digit());
            if !digits_ok {
                report.push(ValidationIssue::message(
                    "account.clearing_number",
                    "must be 1 to 5 digits",
                ));
            }
        }
        match &self.creditor_identifier {
            Some(identifier) => {
                if !sepa_core::validate_creditor_identifier(identifier) {
                    report.push(ValidationIssue::message(
                        "account.creditor_identifier",
                        "invalid creditor identifier",
                    ));
                }
            }
            None if require_creditor_identifier => {
                report.push(ValidationIssue::message(
                    "account.creditor_identifier",
                    "required for direct debit",
                ));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_for(account: &Account, require_ci: bool) -> ValidationReport {
        let mut report = ValidationReport::new();
        account.validate_into(require_ci, &mut report);
        report
    }

    #[test]
    fn valid_account_passes() {
        let account = Account::new("Schuldner GmbH", "DE21500500009876543210")
            .with_bic("SPUEDE2UXXX");
        assert!(report_for(&account, false).is_empty());
    }

    #[test]
    fn name_is_transliterated() {
        let account = Account::new("Glückler & Co", "DE21500500009876543210");
        assert_eq!(account.name, "Glueckler + Co");
    }

    #[test]
    fn bad_iban_is_reported() {
        let account = Account::new("Schuldner GmbH", "DE99500500009876543210");
        let report = report_for(&account, false);
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].field, "account.iban");
    }

    #[test]
    fn direct_debit_requires_creditor_identifier() {
        let account = Account::new("Gläubiger GmbH", "DE87200500001234567890");
        let report = report_for(&account, true);
        assert_eq!(report.issues()[0].field, "account.creditor_identifier");

        let account = account.with_creditor_identifier("DE98ZZZ09999999999");
        assert!(report_for(&account, true).is_empty());
    }

    #[test]
    fn clearing_number_must_be_digits() {
        let account = Account::new("Muster AG", "CH5800791123000889012")
            .with_clearing_number("ABC");
        let report = report_for(&account, false);
        assert_eq!(report.issues()[0].field, "account.clearing_number");
    }
}
