#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use finance_ledger::{
    core::session::{Session, UserId},
    ledger::DedupPolicy,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh data directory whose lifetime spans the whole test binary.
pub fn data_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens an isolated session for `user` in its own data directory.
pub fn setup_session(user: &str) -> Session {
    open_session(&data_dir(), user, DedupPolicy::SameDate)
}

pub fn open_session(base: &std::path::Path, user: &str, policy: DedupPolicy) -> Session {
    Session::open(&Some(UserId::new(user)), base, policy).expect("open session")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
