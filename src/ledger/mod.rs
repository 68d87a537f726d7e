//! Ledger domain models and the recurring-transaction materialization engine.

pub mod category;
pub mod recurring;
pub mod time_interval;
pub mod transaction;

pub use category::Category;
pub use recurring::{materialize, materialize_with, DedupPolicy, Occurrences, RecurringRule};
pub use time_interval::{previous_month, Frequency};
pub use transaction::{EntryKind, Transaction};
