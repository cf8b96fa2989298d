//! Seam between the orchestration logic and the external PostgreSQL tools

use anyhow::Result;
use common::{run_with_env, CommandOutput};
use std::ffi::OsString;
use std::path::PathBuf;

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<OsString>,
    /// Exported to the child as `PGPASSFILE`.
    pub pgpassfile: PathBuf,
}

/// Runs invocations to completion, one at a time.
///
/// `Err` means the program could not be started at all; a non-zero exit
/// comes back as an unsuccessful [`CommandOutput`].
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&mut self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Spawns real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&mut self, invocation: &Invocation) -> Result<CommandOutput> {
        run_with_env(
            invocation.program,
            &invocation.args,
            &[("PGPASSFILE", invocation.pgpassfile.as_os_str())],
        )
        .await
    }
}
