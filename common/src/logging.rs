//! Structured logging initialization
//!
//! Provides consistent logging initialization for every binary in the workspace.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Guard that keeps the tracing subscriber active.
/// Drop this at the end of main to flush logs.
pub struct LogGuard;

/// Initialize logging for a component.
///
/// `RUST_LOG` wins when set; otherwise the level is INFO, or DEBUG when
/// `verbose` is requested.
///
/// # Example
/// ```ignore
/// let _guard = init_logging("pg-updatedb", false);
/// info!("Starting up...");
/// ```
pub fn init_logging(component: &str, verbose: bool) -> LogGuard {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let format = fmt::layer().with_target(false);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();

    tracing::debug!(component, "Logging initialized");

    LogGuard
}
