//! Tracing subscriber setup.
//!
//! Filter comes from `RUNLINK_LOG` (same syntax as `RUST_LOG`), defaulting to
//! `runlink=info`. Safe to call more than once; only the first call installs.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "RUNLINK_LOG";

const DEFAULT_DIRECTIVE: &str = "runlink=info";

pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        // Another subscriber may already be installed by the host process.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
