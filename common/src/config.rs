//! Environment variable parsing helpers
//!
//! Provides ergonomic helpers for reading configuration from environment variables.

use std::env;
use std::ffi::OsString;

/// Extension trait for reading environment variables.
///
/// Provides convenient methods for reading env vars with defaults and
/// optional values.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// The value is taken as-is, so paths that are not valid UTF-8 survive.
    ///
    /// # Example
    /// ```ignore
    /// let dump_file = OsString::env_os_or("DUMPFILE", "mybackup.dump");
    /// ```
    fn env_os_or(name: &str, default: &str) -> OsString {
        env::var_os(name).unwrap_or_else(|| default.into())
    }

    /// Get an environment variable, treating unset and empty alike.
    ///
    /// # Example
    /// ```ignore
    /// let pgpass = OsString::env_os_optional("PGPASS_BKP_PATH");
    /// ```
    fn env_os_optional(name: &str) -> Option<OsString> {
        env::var_os(name).filter(|v| !v.is_empty())
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}
