//! Leaf operations: one external PostgreSQL tool per phase
//!
//! Each operation builds its command line, runs it through a
//! [`CommandRunner`] and classifies the result. Operations never terminate
//! the process; the caller decides what a [`Outcome::Fatal`] means.

use crate::phase::Phase;
use crate::runner::{CommandRunner, Invocation};
use crate::spec::ConnectionSpec;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Parallel jobs used by `pg_restore`.
pub const RESTORE_JOBS: u32 = 4;

/// Why a phase did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The tool ran and exited non-zero (`None` when killed by a signal).
    Exit { code: Option<i32> },
    /// The tool could not be started.
    Spawn { reason: String },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit { code: Some(code) } => write!(f, "Command failed. Return code : {}", code),
            Self::Exit { code: None } => f.write_str("Command failed. Terminated by signal"),
            Self::Spawn { reason } => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// Failed, but the run continues.
    Tolerated(Failure),
    /// Failed and the run must stop.
    Fatal(Failure),
}

impl Outcome {
    fn failed(phase: Phase, failure: Failure) -> Self {
        if phase.is_fatal() {
            Self::Fatal(failure)
        } else {
            Self::Tolerated(failure)
        }
    }
}

/// Per-phase inputs chosen by the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct PhaseContext<'a> {
    pub dump_file: &'a Path,
    pub pgpassfile: &'a Path,
    pub verbose: bool,
}

fn connection_args(spec: &ConnectionSpec) -> [OsString; 3] {
    [
        format!("--host={}", spec.host).into(),
        format!("--username={}", spec.user).into(),
        format!("--port={}", spec.port).into(),
    ]
}

/// `-f<path>` without going through UTF-8, so any dump file name is kept as is.
fn output_file_arg(dump_file: &Path) -> OsString {
    let mut arg = OsString::from("-f");
    arg.push(dump_file);
    arg
}

/// `pg_dump` arguments: custom format, never prompt for a password.
pub fn backup_args(spec: &ConnectionSpec, dump_file: &Path, verbose: bool) -> Vec<OsString> {
    let [host, user, port] = connection_args(spec);
    let mut args = vec![
        host,
        user,
        format!("--dbname={}", spec.database).into(),
        port,
        "-Fc".into(),
        "-w".into(),
        output_file_arg(dump_file),
    ];
    if verbose {
        args.push("-v".into());
    }
    args
}

/// `dropdb` / `createdb` arguments; the database name goes last.
pub fn database_admin_args(spec: &ConnectionSpec, verbose: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = connection_args(spec).into();
    args.push("-w".into());
    if verbose {
        args.push("-e".into());
    }
    args.push(spec.database.clone().into());
    args
}

/// `pg_restore` arguments: custom format, parallel jobs, no ownership changes.
pub fn restore_args(spec: &ConnectionSpec, dump_file: &Path, verbose: bool) -> Vec<OsString> {
    let [host, user, port] = connection_args(spec);
    let mut args = vec![
        "--no-owner".into(),
        host,
        user,
        format!("--dbname={}", spec.database).into(),
        port,
        "-Fc".into(),
        "-w".into(),
        format!("--jobs={}", RESTORE_JOBS).into(),
    ];
    if verbose {
        args.push("-v".into());
    }
    args.push(dump_file.as_os_str().to_os_string());
    args
}

/// Resolve the full command line for `phase`.
pub fn invocation(phase: Phase, spec: &ConnectionSpec, ctx: &PhaseContext<'_>) -> Invocation {
    let args = match phase {
        Phase::Backup => backup_args(spec, ctx.dump_file, ctx.verbose),
        Phase::Drop | Phase::Create => database_admin_args(spec, ctx.verbose),
        Phase::Restore => restore_args(spec, ctx.dump_file, ctx.verbose),
    };

    Invocation {
        program: phase.program(),
        args,
        pgpassfile: ctx.pgpassfile.to_path_buf(),
    }
}

/// Run one phase and classify its result.
pub async fn run_phase<R: CommandRunner>(
    runner: &mut R,
    phase: Phase,
    spec: &ConnectionSpec,
    ctx: &PhaseContext<'_>,
) -> Outcome {
    let invocation = invocation(phase, spec, ctx);

    let output = match runner.run(&invocation).await {
        Ok(output) => output,
        Err(e) => {
            let failure = Failure::Spawn {
                reason: format!("{:#}", e),
            };
            if phase.is_fatal() {
                error!(%phase, error = %failure, "Issue with the {}", phase);
            } else {
                warn!(%phase, error = %failure, "Issue with the {}", phase);
            }
            return Outcome::failed(phase, failure);
        }
    };

    if !output.stdout.is_empty() {
        debug!(%phase, stdout = %output.stdout, "Command output");
    }

    if output.success {
        info!(%phase, "{}", phase.success_message());
        return Outcome::Succeeded;
    }

    let failure = Failure::Exit { code: output.code };
    if phase.is_fatal() {
        error!(%phase, code = %output.code_display(), "{}", failure);
    } else {
        warn!(%phase, code = %output.code_display(), "{}", failure);
    }
    Outcome::failed(phase, failure)
}

/// Dump the source database into the dump file.
pub async fn backup<R: CommandRunner>(
    runner: &mut R,
    spec: &ConnectionSpec,
    ctx: &PhaseContext<'_>,
) -> Outcome {
    run_phase(runner, Phase::Backup, spec, ctx).await
}

/// Drop the target database.
pub async fn dropdb<R: CommandRunner>(
    runner: &mut R,
    spec: &ConnectionSpec,
    ctx: &PhaseContext<'_>,
) -> Outcome {
    run_phase(runner, Phase::Drop, spec, ctx).await
}

/// Create the target database.
pub async fn createdb<R: CommandRunner>(
    runner: &mut R,
    spec: &ConnectionSpec,
    ctx: &PhaseContext<'_>,
) -> Outcome {
    run_phase(runner, Phase::Create, spec, ctx).await
}

/// Restore the dump file into the target database.
pub async fn restore<R: CommandRunner>(
    runner: &mut R,
    spec: &ConnectionSpec,
    ctx: &PhaseContext<'_>,
) -> Outcome {
    run_phase(runner, Phase::Restore, spec, ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;

    fn spec() -> ConnectionSpec {
        "db.internal:5433:sales:alice".parse().unwrap()
    }

    fn ctx(verbose: bool) -> PhaseContext<'static> {
        PhaseContext {
            dump_file: Path::new("/backups/sales.dump"),
            pgpassfile: Path::new("/secrets/phase.pgpass"),
            verbose,
        }
    }

    #[test]
    fn test_backup_command_line() {
        let inv = invocation(Phase::Backup, &spec(), &ctx(false));
        assert_eq!(inv.program, "pg_dump");
        assert_eq!(
            inv.args,
            vec![
                "--host=db.internal",
                "--username=alice",
                "--dbname=sales",
                "--port=5433",
                "-Fc",
                "-w",
                "-f/backups/sales.dump",
            ]
        );
        assert_eq!(inv.pgpassfile, Path::new("/secrets/phase.pgpass"));
    }

    #[test]
    fn test_verbose_flags() {
        assert_eq!(backup_args(&spec(), Path::new("x"), true).last().unwrap(), "-v");

        let drop = database_admin_args(&spec(), true);
        assert!(drop.iter().any(|a| a == "-e"));
        assert_eq!(drop.last().unwrap(), "sales");

        let restore = restore_args(&spec(), Path::new("x.dump"), true);
        assert!(restore.iter().any(|a| a == "-v"));
        assert_eq!(restore.last().unwrap(), "x.dump");
    }

    #[test]
    fn test_non_utf8_dump_file_passed_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dump_file = Path::new(OsStr::from_bytes(b"/backups/caf\xe9.dump"));

        let backup = backup_args(&spec(), dump_file, false);
        assert_eq!(
            backup.last().unwrap().as_bytes(),
            b"-f/backups/caf\xe9.dump"
        );

        let restore = restore_args(&spec(), dump_file, false);
        assert_eq!(restore.last().unwrap().as_bytes(), dump_file.as_os_str().as_bytes());
    }

    #[test]
    fn test_admin_command_line_puts_database_last() {
        let inv = invocation(Phase::Create, &spec(), &ctx(false));
        assert_eq!(inv.program, "createdb");
        assert_eq!(
            inv.args,
            vec!["--host=db.internal", "--username=alice", "--port=5433", "-w", "sales"]
        );
    }

    #[test]
    fn test_restore_command_line() {
        let inv = invocation(Phase::Restore, &spec(), &ctx(false));
        assert_eq!(inv.program, "pg_restore");
        assert_eq!(
            inv.args,
            vec![
                "--no-owner",
                "--host=db.internal",
                "--username=alice",
                "--dbname=sales",
                "--port=5433",
                "-Fc",
                "-w",
                "--jobs=4",
                "/backups/sales.dump",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_backup_is_fatal() {
        let mut runner = RecordingRunner::default().exit_with("pg_dump", 1);
        let outcome = backup(&mut runner, &spec(), &ctx(false)).await;
        assert_eq!(outcome, Outcome::Fatal(Failure::Exit { code: Some(1) }));
    }

    #[tokio::test]
    async fn test_failed_drop_is_tolerated() {
        let mut runner = RecordingRunner::default().exit_with("dropdb", 1);
        let outcome = dropdb(&mut runner, &spec(), &ctx(false)).await;
        assert_eq!(outcome, Outcome::Tolerated(Failure::Exit { code: Some(1) }));
    }

    #[tokio::test]
    async fn test_spawn_errors_follow_phase_policy() {
        let mut runner = RecordingRunner::default()
            .missing("createdb")
            .missing("pg_restore");

        match createdb(&mut runner, &spec(), &ctx(false)).await {
            Outcome::Tolerated(Failure::Spawn { reason }) => assert!(reason.contains("createdb")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(
            restore(&mut runner, &spec(), &ctx(false)).await,
            Outcome::Fatal(Failure::Spawn { .. })
        ));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            Failure::Exit { code: Some(3) }.to_string(),
            "Command failed. Return code : 3"
        );
        assert_eq!(
            Failure::Exit { code: None }.to_string(),
            "Command failed. Terminated by signal"
        );
    }
}
