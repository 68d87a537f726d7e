use std::collections::HashSet;

use crate::core::session::Session;
use crate::errors::LedgerError;
use crate::ledger::{Category, EntryKind};
use crate::storage::RecordStore;

use super::ServiceResult;

pub struct CategoryService;

impl CategoryService {
    pub fn add(session: &Session, name: &str, kind: EntryKind) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "Category name must not be empty.".into(),
            ));
        }
        let store = &session.stores().categories;
        let mut categories = store.load()?;
        if categories.iter().any(|category| category.name == name) {
            return Err(LedgerError::Validation("Category already exists.".into()));
        }
        categories.push(Category::new(name, kind));
        store.replace_all(&categories)?;
        tracing::info!(user = %session.user(), category = name, kind = %kind, "category added");
        Ok(())
    }

    /// Deletes every category whose name is listed and returns how many were removed.
    /// Transactions and rules that reference a deleted name keep it; see
    /// [`CategoryService::category_warnings`].
    pub fn remove(session: &Session, names: &[&str]) -> ServiceResult<usize> {
        let store = &session.stores().categories;
        let mut categories = store.load()?;
        let before = categories.len();
        categories.retain(|category| !names.contains(&category.name.as_str()));
        let removed = before - categories.len();
        if removed > 0 {
            store.replace_all(&categories)?;
        }
        for warning in Self::category_warnings(session)? {
            tracing::warn!(user = %session.user(), "{warning}");
        }
        Ok(removed)
    }

    pub fn list(session: &Session) -> ServiceResult<Vec<Category>> {
        session.stores().categories.load()
    }

    /// Category names offered for an entry of the given type.
    pub fn list_by_kind(session: &Session, kind: EntryKind) -> ServiceResult<Vec<String>> {
        Ok(Self::list(session)?
            .into_iter()
            .filter(|category| category.kind == kind)
            .map(|category| category.name)
            .collect())
    }

    /// Reports transactions and rules whose category is no longer registered.
    pub fn category_warnings(session: &Session) -> ServiceResult<Vec<String>> {
        let stores = session.stores();
        let known: HashSet<String> = stores
            .categories
            .load()?
            .into_iter()
            .map(|category| category.name)
            .collect();
        let mut warnings = Vec::new();

        for txn in stores.ledger.load()? {
            if !known.contains(&txn.category) {
                warnings.push(format!(
                    "transaction on {} ({}) references missing category `{}`",
                    txn.date, txn.description, txn.category
                ));
            }
        }
        for rule in stores.rules.load()? {
            if !known.contains(&rule.category) {
                warnings.push(format!(
                    "fixed transaction `{}` references missing category `{}`",
                    rule.description, rule.category
                ));
            }
        }
        Ok(warnings)
    }
}
