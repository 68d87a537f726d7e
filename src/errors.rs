use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error("Unknown frequency `{0}`")]
    UnknownFrequency(String),
    #[error("Unknown entry type `{0}`")]
    UnknownEntryKind(String),
    #[error("Invalid date `{0}`")]
    InvalidDate(String),
    #[error("Invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Confirmation word incorrect. Data not reset.")]
    ConfirmationMismatch,
    #[error("No active user session")]
    NoActiveUser,
    #[error("{}:{}: {}", .path.display(), .line, .source)]
    Row {
        path: PathBuf,
        line: u64,
        #[source]
        source: Box<LedgerError>,
    },
}

impl LedgerError {
    /// True for failures the presentation layer shows as a warning and recovers from.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_) | LedgerError::ConfirmationMismatch
        )
    }

    pub(crate) fn at_row(self, path: PathBuf, line: u64) -> Self {
        LedgerError::Row {
            path,
            line,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_mismatch_are_warnings() {
        assert!(LedgerError::Validation("Amount must be greater than 0.".into()).is_warning());
        assert!(LedgerError::ConfirmationMismatch.is_warning());
        assert!(!LedgerError::UnknownFrequency("Hourly".into()).is_warning());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!LedgerError::from(io).is_warning());
    }

    #[test]
    fn row_error_reports_location() {
        let err = LedgerError::UnknownFrequency("Fortnightly".into())
            .at_row(PathBuf::from("fixed_transactions.csv"), 3);
        let message = err.to_string();
        assert!(message.contains("fixed_transactions.csv:3"), "{message}");
        assert!(message.contains("Fortnightly"), "{message}");
    }
}
