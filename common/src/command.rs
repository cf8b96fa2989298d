//! Command execution utilities
//!
//! Provides consistent command execution with proper error handling and logging.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Exit code as printed in failure messages.
    ///
    /// A child killed by a signal has no code and renders as `signal`.
    pub fn code_display(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}

/// Run a command with extra environment variables and wait for it.
///
/// Stdout is captured, stderr is inherited so the tool's own diagnostics
/// (and verbose progress) reach the terminal. The parent environment is
/// left untouched; `envs` only apply to the child.
///
/// Returns `Err` only when the process could not be started. A non-zero
/// exit is reported through [`CommandOutput::success`].
///
/// # Example
/// ```ignore
/// let out = run_with_env("pg_dump", &args, &[("PGPASSFILE", "/secrets/bkp.pgpass")]).await?;
/// ```
#[instrument(skip_all, fields(cmd = %cmd))]
pub async fn run_with_env<K, V>(
    cmd: &str,
    args: &[OsString],
    envs: &[(K, V)],
) -> Result<CommandOutput>
where
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    debug!(args = ?args, "Running command");

    let output = Command::new(cmd)
        .args(args)
        .envs(envs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .await
        .context(format!("Failed to execute {}", cmd))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        success: output.status.success(),
        code: output.status.code(),
    })
}
