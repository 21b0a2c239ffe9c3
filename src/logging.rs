//! Logging - stderr subscriber for the `hdkey` binary.
//!
//! | Source | Effect |
//! |--------|--------|
//! | `RUST_LOG` | Filter directives (default `warn`) |
//! | `HDKEY_LOG_JSON=1` | One JSON object per event instead of pretty text |
//!
//! Output goes to stderr so that attribute values on stdout stay
//! machine-readable. The library only emits `tracing` events; it never
//! installs a subscriber itself.

use crate::config::Config;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Install the subscriber described by `config.log_json`.
///
/// A second call is a no-op: `try_init` leaves the first subscriber in place.
pub fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);

    let _ = if config.log_json { builder.json().try_init() } else { builder.pretty().try_init() };
}
