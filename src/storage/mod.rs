pub mod csv_backend;

use std::path::{Path, PathBuf};

use crate::{
    core::utils::ensure_dir,
    errors::Result,
    ledger::{Category, RecurringRule, Transaction},
};

pub use csv_backend::{CsvRecord, CsvStore};

/// Durable collection of records for one user.
///
/// `load` never fails because nothing has been persisted yet; an absent backing file is an
/// empty collection. Writes replace the whole collection so a reader never observes a
/// partially written file.
pub trait RecordStore: Send + Sync {
    type Record: Clone;

    fn load(&self) -> Result<Vec<Self::Record>>;
    fn replace_all(&self, records: &[Self::Record]) -> Result<()>;

    fn append(&self, record: Self::Record) -> Result<()> {
        self.append_all(vec![record])
    }

    fn append_all(&self, records: Vec<Self::Record>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut existing = self.load()?;
        existing.extend(records);
        self.replace_all(&existing)
    }
}

/// The three stores owned by a single user, rooted in that user's directory.
#[derive(Debug, Clone)]
pub struct UserStores {
    root: PathBuf,
    pub ledger: CsvStore<Transaction>,
    pub categories: CsvStore<Category>,
    pub rules: CsvStore<RecurringRule>,
}

impl UserStores {
    pub fn open(root: &Path) -> Result<Self> {
        ensure_dir(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            ledger: CsvStore::in_dir(root),
            categories: CsvStore::in_dir(root),
            rules: CsvStore::in_dir(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
