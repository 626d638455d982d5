//! Logging for the kc CLI
//!
//! Two separate concerns:
//! - [`Console`]: operator output mirrored to the execution log file, with
//!   START/ERROR/END markers per invocation
//! - tracing diagnostics on stderr, filtered by [`LogLevel`] or `KC_LOG`

pub mod level;
pub mod mirror;

pub use level::LogLevel;
pub use mirror::Console;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an explicit tracing filter
pub const LOG_ENV: &str = "KC_LOG";

/// Install the stderr tracing subscriber
///
/// `KC_LOG` wins over the verbosity flags. Safe to call more than once.
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level.filter_directive()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(level.is_trace())
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init();
}
