//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "CSVLITE_LOG";

/// Initialize the csvlite tracing/logging system.
///
/// Reads `CSVLITE_LOG` for per-crate log levels.
/// Format: `CSVLITE_LOG=csvlite_ingest=debug,csvlite_storage=info`
///
/// Falls back to `csvlite=info` if `CSVLITE_LOG` is not set or is invalid.
/// Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| default_filter());

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init();
    });
}

fn default_filter() -> EnvFilter {
    EnvFilter::new(
        "csvlite=info,csvlite_cli=info,csvlite_core=info,csvlite_storage=info,csvlite_ingest=info",
    )
}
