//! Shared utilities for pg-updatedb
//!
//! This crate provides the ambient plumbing used by the orchestration binary:
//! - Structured logging initialization
//! - Environment variable parsing helpers
//! - Command execution utilities

pub mod command;
pub mod config;
pub mod logging;

pub use command::{run_with_env, CommandOutput};
pub use config::ConfigExt;
pub use logging::init_logging;
