#![doc(test(attr(deny(warnings))))]

//! Finance Ledger keeps a per-user income/expense ledger and materializes recurring
//! ("fixed") transactions into it as calendar time passes.
//!
//! The presentation layer opens a [`crate::core::session::Session`] for the signed-in user and
//! calls the services in [`crate::core::services`]; the pure engine lives in [`ledger`].

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Ledger tracing initialized.");
    });
}

/// Initializes tracing with the log directive from `config`.
pub fn init_with_config(config: &config::Config) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing_with(&config.log_directive);
        tracing::info!("Finance Ledger tracing initialized.");
    });
}
