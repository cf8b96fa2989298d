//! Backup / restore orchestration for PostgreSQL
//!
//! Wraps `pg_dump`, `dropdb`, `createdb` and `pg_restore`:
//! - `cli`: command-line flags into a [`Plan`]
//! - `spec`: `host:port:db:user` connection descriptors
//! - `settings`: dump file and per-phase credential files from the environment
//! - `operations`: one external command per phase, with a typed [`Outcome`]
//! - `flow`: sequencing of phases and fatal/tolerated failure handling

pub mod cli;
pub mod flow;
pub mod operations;
pub mod phase;
pub mod runner;
pub mod settings;
pub mod spec;

pub use cli::Cli;
pub use flow::{process_flow, FlowError, Plan, Report};
pub use operations::{Failure, Outcome};
pub use phase::Phase;
pub use runner::{CommandRunner, Invocation, SystemRunner};
pub use settings::{CredentialFiles, CredentialScope, Settings};
pub use spec::{ConnectionSpec, SpecError};
