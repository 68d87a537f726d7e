pub mod category_service;
pub mod materialization_service;
pub mod recurring_service;
pub mod reset_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use materialization_service::{MaterializationReport, MaterializationService};
pub use recurring_service::{RecurringService, RuleDraft};
pub use reset_service::{ResetChallenge, ResetOutcome, ResetService};
pub use summary_service::{DashboardKpis, MonthlyTotals, SummaryService};
pub use transaction_service::{EntryDraft, TransactionService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;

/// Rejects an amount the user left at zero (or made negative).
fn require_positive_amount(amount: f64) -> ServiceResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(LedgerError::Validation(
            "Amount must be greater than 0.".into(),
        ))
    }
}

/// Returns the selected category, rejecting an empty selection.
fn require_category(category: Option<&str>) -> ServiceResult<String> {
    match category.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(LedgerError::Validation("Please select a category.".into())),
    }
}
