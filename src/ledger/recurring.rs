use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    time_interval::Frequency,
    transaction::{check_amount, EntryKind, Transaction},
};
use crate::errors::LedgerError;

/// Template for a periodically repeating income or expense ("fixed transaction").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringRule {
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: Frequency,
}

impl RecurringRule {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        frequency: Frequency,
    ) -> Result<Self, LedgerError> {
        if let Some(end) = end_date {
            if end < start_date {
                return Err(LedgerError::InvalidDateRange {
                    start: start_date,
                    end,
                });
            }
        }
        Ok(Self {
            kind,
            amount: check_amount(amount)?,
            description: description.into(),
            category: category.into(),
            start_date,
            end_date,
            frequency,
        })
    }

    /// Scheduled dates from `start_date` through `min(today, end_date)`.
    pub fn occurrences(&self, today: NaiveDate) -> Occurrences {
        let limit = match self.end_date {
            Some(end) if end < today => end,
            _ => today,
        };
        Occurrences {
            cursor: Some(self.start_date),
            limit,
            frequency: self.frequency,
        }
    }

    fn instance(&self, date: NaiveDate) -> Transaction {
        Transaction {
            kind: self.kind,
            amount: self.amount,
            date,
            description: self.description.clone(),
            category: self.category.clone(),
            fixed: true,
        }
    }
}

/// Iterator over the scheduled dates of one rule.
#[derive(Debug, Clone)]
pub struct Occurrences {
    cursor: Option<NaiveDate>,
    limit: NaiveDate,
    frequency: Frequency,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.cursor.filter(|date| *date <= self.limit)?;
        let next = self.frequency.next_date(current);
        self.cursor = (next > current).then_some(next);
        Some(current)
    }
}

/// Decides when an existing ledger entry already covers an occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Any entry on the same calendar date suppresses the occurrence, whatever rule or
    /// manual entry produced it.
    #[default]
    SameDate,
    /// Only an entry with the same date, type, description, category and amount does.
    SameOccurrence,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Date(NaiveDate),
    Occurrence {
        date: NaiveDate,
        kind: EntryKind,
        description: String,
        category: String,
        amount_bits: u64,
    },
}

impl DedupPolicy {
    fn key(&self, txn: &Transaction) -> DedupKey {
        match self {
            DedupPolicy::SameDate => DedupKey::Date(txn.date),
            DedupPolicy::SameOccurrence => DedupKey::Occurrence {
                date: txn.date,
                kind: txn.kind,
                description: txn.description.clone(),
                category: txn.category.clone(),
                amount_bits: txn.amount.to_bits(),
            },
        }
    }
}

/// Builds the ledger entries for every occurrence scheduled on or before `today` that the
/// ledger does not already cover, using the default date-only dedup policy.
pub fn materialize(
    rules: &[RecurringRule],
    ledger: &[Transaction],
    today: NaiveDate,
) -> Vec<Transaction> {
    materialize_with(rules, ledger, today, DedupPolicy::default())
}

/// Same as [`materialize`] with an explicit dedup policy. Occurrences emitted earlier in the
/// same call count as present, so feeding the output back in yields nothing new.
pub fn materialize_with(
    rules: &[RecurringRule],
    ledger: &[Transaction],
    today: NaiveDate,
    policy: DedupPolicy,
) -> Vec<Transaction> {
    let mut seen: HashSet<DedupKey> = ledger.iter().map(|txn| policy.key(txn)).collect();
    let mut creations = Vec::new();

    for rule in rules {
        for date in rule.occurrences(today) {
            let candidate = rule.instance(date);
            if seen.insert(policy.key(&candidate)) {
                creations.push(candidate);
            }
        }
    }

    creations
}
