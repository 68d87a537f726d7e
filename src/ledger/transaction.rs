use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Income" => Ok(EntryKind::Income),
            "Expense" => Ok(EntryKind::Expense),
            other => Err(LedgerError::UnknownEntryKind(other.to_string())),
        }
    }
}

/// One ledger entry, either typed in by the user or generated from a recurring rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub kind: EntryKind,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub fixed: bool,
}

impl Transaction {
    /// Builds a manually entered transaction.
    pub fn new(
        kind: EntryKind,
        amount: f64,
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            kind,
            amount: check_amount(amount)?,
            date,
            description: description.into(),
            category: category.into(),
            fixed: false,
        })
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn falls_in(&self, month: u32, year: i32) -> bool {
        use chrono::Datelike;
        self.date.month() == month && self.date.year() == year
    }
}

/// Rejects negative or non-finite amounts.
pub(crate) fn check_amount(amount: f64) -> Result<f64, LedgerError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount.to_string()))
    }
}
