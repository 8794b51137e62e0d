//! Global initialization utilities for the application

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();
static TRACING: Once = Once::new();

/// Initialize the application environment
///
/// Loads variables from a `.env` file (current directory or any parent)
/// so configuration can pick them up. Safe to call multiple times.
pub fn initialize_environment() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
    });
}

/// Subscriber settings for [`initialize_tracing`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingOptions {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json: bool,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `options.level`. Only the first call has any effect;
/// later calls (and calls after another subscriber was installed) are no-ops.
pub fn initialize_tracing(options: &TracingOptions) {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(options.level.as_str()));

        let result = if options.json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).try_init()
        };

        if let Err(e) = result {
            tracing::debug!("Tracing subscriber already installed: {e}");
        }
    });
}

/// Initialize environment for tests
///
/// Prefers `.env.test` and falls back to `.env`
#[cfg(test)]
pub fn initialize_test_environment() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test")
            .or_else(|_| dotenvy::dotenv())
            .ok();
    });
}
