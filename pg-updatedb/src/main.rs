//! pg-updatedb - back up, recreate and restore PostgreSQL databases
//!
//! Runs pg_dump, dropdb, createdb and pg_restore in order, each phase
//! authenticated by its own pgpass file.

use anyhow::{Context, Result};
use clap::Parser;
use common::init_logging;
use pg_updatedb::{process_flow, Cli, Settings, SystemRunner};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let plan = Cli::parse().into_plan();
    let _guard = init_logging("pg-updatedb", plan.verbose);

    if plan.drop && plan.restore.is_none() {
        warn!("-d has no effect without -r");
    }
    if plan.is_empty() {
        warn!("Nothing to do: pass -b <hostname>:<port>:<db>:<user> and/or -r <hostname>:<port>:<db>:<user>");
        return Ok(());
    }

    let settings = Settings::from_env();
    info!(dump_file = %settings.dump_file.display(), "Dump file");

    let report = process_flow(&mut SystemRunner, &plan, &settings)
        .await
        .context("Process aborted")?;

    info!(
        phases = report.steps.len(),
        tolerated_failures = report.tolerated_failures(),
        "Process completed"
    );

    Ok(())
}
