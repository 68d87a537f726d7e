use crate::core::session::Session;
use crate::errors::LedgerError;
use crate::ledger::{previous_month, EntryKind, Transaction};
use crate::storage::RecordStore;

use super::ServiceResult;

/// Income and expense sums over some set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotals {
    fn add(&mut self, txn: &Transaction) {
        match txn.kind {
            EntryKind::Income => self.income += txn.amount,
            EntryKind::Expense => self.expense += txn.amount,
        }
    }
}

/// Month-over-month figures for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardKpis {
    pub month: u32,
    pub year: i32,
    pub current: MonthlyTotals,
    pub previous: MonthlyTotals,
    pub income_change: f64,
    pub expense_change: f64,
    pub total_income: f64,
    pub total_expense: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Sums income and expense for transactions dated in `month`/`year`.
    pub fn aggregate(ledger: &[Transaction], month: u32, year: i32) -> MonthlyTotals {
        let mut totals = MonthlyTotals::default();
        for txn in ledger.iter().filter(|txn| txn.falls_in(month, year)) {
            totals.add(txn);
        }
        totals
    }

    /// All-time income and expense.
    pub fn lifetime_totals(ledger: &[Transaction]) -> MonthlyTotals {
        let mut totals = MonthlyTotals::default();
        for txn in ledger {
            totals.add(txn);
        }
        totals
    }

    /// Percent change from `previous` to `current`; `0` when `previous` is zero. The sign of
    /// a negative `previous` is not corrected for.
    pub fn month_over_month_change(current: f64, previous: f64) -> f64 {
        if previous == 0.0 {
            0.0
        } else {
            (current - previous) / previous * 100.0
        }
    }

    pub fn dashboard(ledger: &[Transaction], month: u32, year: i32) -> ServiceResult<DashboardKpis> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::Validation(format!("invalid month {month}")));
        }
        let (last_month, last_year) = previous_month(month, year);
        let current = Self::aggregate(ledger, month, year);
        let previous = Self::aggregate(ledger, last_month, last_year);
        let lifetime = Self::lifetime_totals(ledger);
        Ok(DashboardKpis {
            month,
            year,
            current,
            previous,
            income_change: Self::month_over_month_change(current.income, previous.income),
            expense_change: Self::month_over_month_change(current.expense, previous.expense),
            total_income: lifetime.income,
            total_expense: lifetime.expense,
        })
    }

    pub fn dashboard_for(session: &Session, month: u32, year: i32) -> ServiceResult<DashboardKpis> {
        let ledger = session.stores().ledger.load()?;
        Self::dashboard(&ledger, month, year)
    }
}
