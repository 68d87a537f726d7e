//! Brings the ledger up to date with the recurring rules.

use chrono::NaiveDate;

use crate::core::{session::Session, time::Clock};
use crate::ledger::{materialize_with, Transaction};
use crate::storage::RecordStore;

use super::ServiceResult;

#[derive(Debug, Clone, PartialEq)]
pub struct MaterializationReport {
    pub reference: NaiveDate,
    pub rules: usize,
    pub created: Vec<Transaction>,
}

impl MaterializationReport {
    pub fn generated(&self) -> usize {
        self.created.len()
    }
}

pub struct MaterializationService;

impl MaterializationService {
    /// Loads rules and ledger, appends every missing occurrence up to `today` and persists
    /// the ledger before returning. Safe to call on every page load: a second call with the
    /// same `today` writes nothing.
    pub fn run(session: &Session, today: NaiveDate) -> ServiceResult<MaterializationReport> {
        let stores = session.stores();
        let rules = stores.rules.load()?;
        let mut ledger = stores.ledger.load()?;
        let created = materialize_with(&rules, &ledger, today, session.dedup_policy());

        if !created.is_empty() {
            ledger.extend(created.iter().cloned());
            stores.ledger.replace_all(&ledger)?;
            tracing::info!(
                user = %session.user(),
                reference = %today,
                generated = created.len(),
                "materialized fixed transactions"
            );
        } else {
            tracing::debug!(user = %session.user(), reference = %today, "ledger already up to date");
        }

        Ok(MaterializationReport {
            reference: today,
            rules: rules.len(),
            created,
        })
    }

    pub fn run_today(session: &Session, clock: &dyn Clock) -> ServiceResult<MaterializationReport> {
        Self::run(session, clock.today())
    }
}
