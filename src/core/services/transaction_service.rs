//! Business logic helpers for manually entered transactions.

use chrono::NaiveDate;

use crate::core::session::Session;
use crate::ledger::{EntryKind, Transaction};
use crate::storage::RecordStore;

use super::{require_category, require_positive_amount, ServiceResult};

/// Field values of a manual entry as captured by the entry form.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<String>,
}

/// Provides validated append and read helpers for the ledger.
pub struct TransactionService;

impl TransactionService {
    /// Validates and appends a manual entry, returning the stored transaction.
    pub fn add_entry(session: &Session, draft: EntryDraft) -> ServiceResult<Transaction> {
        require_positive_amount(draft.amount)?;
        let category = require_category(draft.category.as_deref())?;
        let txn = Transaction::new(
            draft.kind,
            draft.amount,
            draft.date,
            draft.description,
            category,
        )?;
        session.stores().ledger.append(txn.clone())?;
        tracing::info!(user = %session.user(), date = %txn.date, kind = %txn.kind, "entry added");
        Ok(txn)
    }

    /// Returns a snapshot of the ledger's transactions.
    pub fn list(session: &Session) -> ServiceResult<Vec<Transaction>> {
        session.stores().ledger.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::UserId;
    use crate::errors::LedgerError;
    use crate::ledger::DedupPolicy;
    use tempfile::TempDir;

    fn session() -> (Session, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let session = Session::open(
            &Some(UserId::new("txn-tester")),
            temp.path(),
            DedupPolicy::SameDate,
        )
        .expect("session");
        (session, temp)
    }

    fn draft(amount: f64, category: Option<&str>) -> EntryDraft {
        EntryDraft {
            kind: EntryKind::Expense,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            description: "Groceries".into(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn zero_amount_is_a_warning_and_writes_nothing() {
        let (session, _guard) = session();
        let err = TransactionService::add_entry(&session, draft(0.0, Some("Food")))
            .expect_err("zero amount");
        assert!(
            matches!(err, LedgerError::Validation(ref message) if message.contains("greater than 0")),
            "unexpected error: {err:?}"
        );
        assert!(!session.stores().ledger.path().exists());
    }

    #[test]
    fn missing_category_is_rejected() {
        let (session, _guard) = session();
        for category in [None, Some(""), Some("  ")] {
            let err = TransactionService::add_entry(&session, draft(10.0, category)).unwrap_err();
            assert!(err.is_warning());
        }
        assert!(TransactionService::list(&session).unwrap().is_empty());
    }

    #[test]
    fn added_entry_is_manual() {
        let (session, _guard) = session();
        let stored = TransactionService::add_entry(&session, draft(10.0, Some("Food"))).unwrap();
        assert!(!stored.fixed);
        assert_eq!(TransactionService::list(&session).unwrap(), vec![stored]);
    }
}
