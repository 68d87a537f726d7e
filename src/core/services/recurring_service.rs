//! Services for defining and removing recurring ("fixed") transactions.

use chrono::NaiveDate;

use crate::core::session::Session;
use crate::ledger::{EntryKind, Frequency, RecurringRule};
use crate::storage::RecordStore;

use super::{require_category, require_positive_amount, ServiceResult};

/// Field values of a new recurring rule as captured by the rule form. `frequency` is the
/// label picked by the user and is checked here.
#[derive(Debug, Clone)]
pub struct RuleDraft {
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    pub category: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: String,
}

pub struct RecurringService;

impl RecurringService {
    /// Validates a draft and stores the resulting rule. Invalid frequencies and end dates
    /// before the start date are rejected here, before the rule can reach materialization.
    pub fn add_rule(session: &Session, draft: RuleDraft) -> ServiceResult<RecurringRule> {
        require_positive_amount(draft.amount)?;
        let category = require_category(draft.category.as_deref())?;
        let frequency: Frequency = draft.frequency.parse()?;
        let rule = RecurringRule::new(
            draft.kind,
            draft.amount,
            draft.description,
            category,
            draft.start_date,
            draft.end_date,
            frequency,
        )?;
        session.stores().rules.append(rule.clone())?;
        tracing::info!(
            user = %session.user(),
            description = %rule.description,
            frequency = %rule.frequency,
            start = %rule.start_date,
            "fixed transaction added"
        );
        Ok(rule)
    }

    /// Deletes every rule whose description is listed. Already materialized entries stay in
    /// the ledger.
    pub fn remove_by_description(session: &Session, descriptions: &[&str]) -> ServiceResult<usize> {
        let store = &session.stores().rules;
        let mut rules = store.load()?;
        let before = rules.len();
        rules.retain(|rule| !descriptions.contains(&rule.description.as_str()));
        let removed = before - rules.len();
        if removed > 0 {
            store.replace_all(&rules)?;
        }
        Ok(removed)
    }

    pub fn list(session: &Session) -> ServiceResult<Vec<RecurringRule>> {
        session.stores().rules.load()
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
            &Some(UserId::new("rule-tester")),
            temp.path(),
            DedupPolicy::SameDate,
        )
        .expect("session");
        (session, temp)
    }

    fn draft(description: &str, frequency: &str) -> RuleDraft {
        RuleDraft {
            kind: EntryKind::Expense,
            amount: 15.0,
            description: description.into(),
            category: Some("Subscriptions".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            end_date: None,
            frequency: frequency.into(),
        }
    }

    #[test]
    fn unknown_frequency_is_rejected_at_creation() {
        let (session, _guard) = session();
        let err = RecurringService::add_rule(&session, draft("Music", "Hourly")).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownFrequency(_)));
        assert!(RecurringService::list(&session).unwrap().is_empty());
    }

    #[test]
    fn inverted_range_is_rejected_at_creation() {
        let (session, _guard) = session();
        let mut bad = draft("Music", "Monthly");
        bad.end_date = NaiveDate::from_ymd_opt(2023, 12, 31);
        let err = RecurringService::add_rule(&session, bad).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDateRange { .. }));
    }

    #[test]
    fn remove_by_description_keeps_others() {
        let (session, _guard) = session();
        RecurringService::add_rule(&session, draft("Music", "Monthly")).unwrap();
        RecurringService::add_rule(&session, draft("Video", "Monthly")).unwrap();
        RecurringService::add_rule(&session, draft("Cloud", "Yearly")).unwrap();

        let removed =
            RecurringService::remove_by_description(&session, &["Music", "Cloud"]).unwrap();
        assert_eq!(removed, 2);
        let remaining = RecurringService::list(&session).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].description, "Video");
    }
}
