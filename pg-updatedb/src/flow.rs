//! Orchestration of a backup / drop / create / restore run
//!
//! Supported flows:
//! - Backup only
//! - Restore only
//! - Backup and restore
//! - Backup, drop/recreate and restore
//! - Drop/recreate and restore

use crate::operations::{self, Failure, Outcome, PhaseContext};
use crate::phase::Phase;
use crate::runner::CommandRunner;
use crate::settings::{CredentialScope, Settings};
use crate::spec::ConnectionSpec;
use thiserror::Error;
use tracing::info;

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub backup: Option<ConnectionSpec>,
    pub restore: Option<ConnectionSpec>,
    /// Drop and recreate the restore target first. Ignored without `restore`.
    pub drop: bool,
    pub verbose: bool,
}

impl Plan {
    /// Phases in execution order, each with the connection it targets.
    pub fn steps(&self) -> Vec<(Phase, &ConnectionSpec)> {
        let mut steps = Vec::with_capacity(4);
        if let Some(source) = &self.backup {
            steps.push((Phase::Backup, source));
        }
        if let Some(target) = &self.restore {
            if self.drop {
                steps.push((Phase::Drop, target));
                steps.push((Phase::Create, target));
            }
            steps.push((Phase::Restore, target));
        }
        steps
    }

    pub fn is_empty(&self) -> bool {
        self.backup.is_none() && self.restore.is_none()
    }

    /// Credential scopes this plan needs, in first-use order.
    pub fn required_scopes(&self) -> Vec<CredentialScope> {
        let mut scopes = Vec::new();
        for (phase, _) in self.steps() {
            if !scopes.contains(&phase.scope()) {
                scopes.push(phase.scope());
            }
        }
        scopes
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("credential file not configured, set {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("{phase} failed: {failure}")]
    PhaseFailed { phase: Phase, failure: Failure },
}

/// Outcome of every phase that ran, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub steps: Vec<(Phase, Outcome)>,
}

impl Report {
    pub fn phases(&self) -> Vec<Phase> {
        self.steps.iter().map(|(phase, _)| *phase).collect()
    }

    pub fn tolerated_failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Tolerated(_)))
            .count()
    }
}

/// Run every phase of `plan`, stopping at the first fatal failure.
///
/// Missing credential configuration is detected before anything runs.
/// Drop/create failures are recorded in the report and the restore is
/// still attempted.
pub async fn process_flow<R: CommandRunner>(
    runner: &mut R,
    plan: &Plan,
    settings: &Settings,
) -> Result<Report, FlowError> {
    let missing: Vec<&'static str> = plan
        .required_scopes()
        .into_iter()
        .filter(|scope| settings.credentials.get(*scope).is_none())
        .map(CredentialScope::env_var)
        .collect();
    if !missing.is_empty() {
        return Err(FlowError::MissingCredentials(missing));
    }

    info!("Initiating process. It may take some time. Activate verbose mode to follow outputs.");

    let mut report = Report::default();
    let mut active_scope = None;

    for (phase, spec) in plan.steps() {
        let scope = phase.scope();
        let pgpassfile = settings
            .credentials
            .get(scope)
            .ok_or_else(|| FlowError::MissingCredentials(vec![scope.env_var()]))?;

        if plan.verbose && active_scope != Some(scope) {
            info!(pgpassfile = %pgpassfile.display(), "PGPASS file used for {}", scope);
        }
        active_scope = Some(scope);

        let ctx = PhaseContext {
            dump_file: &settings.dump_file,
            pgpassfile,
            verbose: plan.verbose,
        };

        let outcome = match phase {
            Phase::Backup => operations::backup(runner, spec, &ctx).await,
            Phase::Drop => operations::dropdb(runner, spec, &ctx).await,
            Phase::Create => operations::createdb(runner, spec, &ctx).await,
            Phase::Restore => operations::restore(runner, spec, &ctx).await,
        };

        if let Outcome::Fatal(failure) = outcome {
            return Err(FlowError::PhaseFailed { phase, failure });
        }
        report.steps.push((phase, outcome));
    }

    Ok(report)
}
