use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "finance_ledger=info";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_DIRECTIVE);
}

/// Initializes the global tracing subscriber, adding `directive` on top of `RUST_LOG`.
/// Later calls are no-ops.
pub fn init_tracing_with(directive: &str) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        match directive.parse() {
            Ok(parsed) => filter = filter.add_directive(parsed),
            Err(err) => eprintln!("ignoring invalid log directive `{directive}`: {err}"),
        }
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
