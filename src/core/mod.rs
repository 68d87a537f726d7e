//! Session context, services, and shared helpers built on top of the ledger model.

pub mod services;
pub mod session;
pub mod time;
pub mod utils;
