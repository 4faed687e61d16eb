//! Error types for message assembly

use std::fmt;

use thiserror::Error;

use crate::dialect::Dialect;

/// Result type for message assembly operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message assembly errors
#[derive(Error, Debug)]
pub enum Error {
    /// One or more fields failed structural validation. The report carries
    /// every issue found, each naming the offending transaction and field.
    #[error("structural validation failed: {0}")]
    Validation(ValidationReport),

    /// One or more transactions cannot be expressed in the requested
    /// dialect. Every offender is listed, not just the first.
    #[error("incompatible with {dialect}: {}", format_rejected(.rejected))]
    Incompatible {
        /// The dialect the message was checked against.
        dialect: Dialect,
        /// Index and reason for every incompatible transaction.
        rejected: Vec<(usize, String)>,
    },

    /// Transactions carrying a payment classification that is legal but not
    /// implemented for the requested dialect. Distinct from plain
    /// incompatibility: editing fields cannot fix these.
    #[error("payment type not supported by {dialect} (transaction {})", format_indices(.transactions))]
    UnsupportedPaymentType {
        /// The dialect the message was checked against.
        dialect: Dialect,
        /// Indices of every transaction with an unsupported classification.
        transactions: Vec<usize>,
    },

    /// Markup builder failure
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

fn format_rejected(rejected: &[(usize, String)]) -> String {
    rejected
        .iter()
        .map(|(index, reason)| format!("transaction {index}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single structural validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Index of the offending transaction, or `None` for account or
    /// message level issues.
    pub transaction: Option<usize>,
    /// The field the issue was found on (`account.iban`, `amount`, ...).
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationIssue {
    /// Issue on the message or its account.
    pub fn message(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            transaction: None,
            field,
            message: message.into(),
        }
    }

    /// Issue on the transaction at `index`.
    pub fn transaction(index: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            transaction: Some(index),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.transaction {
            Some(index) => write!(f, "transaction {index}: {}: {}", self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Every structural issue found in one validation pass.
///
/// Validation never stops at the first failure; callers get the complete
/// list so one fix cycle suffices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one issue.
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// True when no issue was recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of recorded issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// All recorded issues in discovery order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Consumes the report into an error if any issue was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(ValidationIssue::to_string).collect();
        write!(f, "{}", rendered.join("; "))
    }
}
