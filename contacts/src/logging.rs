//! Tracing setup shared by the contacts binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "contacts=info,contacts_server=info,tower_http=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to `default_directive`.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=contacts=debug,tower_http=debug contacts-server
/// ```
pub fn init(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
