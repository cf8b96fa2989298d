//! Run settings read from environment variables
//!
//! Everything here is read once at startup and passed down explicitly;
//! nothing writes back to the process environment.

use common::ConfigExt;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Dump file used when `DUMPFILE` is not set.
pub const DEFAULT_DUMP_FILE: &str = "mybackup.dump";

/// Database role a credential file authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScope {
    /// Source database, read by `pg_dump`.
    Backup,
    /// Superuser-level access on the target server for `dropdb`/`createdb`.
    Maintenance,
    /// Target database, written by `pg_restore`.
    Restore,
}

impl CredentialScope {
    /// Environment variable holding this scope's credential file path.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Backup => "PGPASS_BKP_PATH",
            Self::Maintenance => "PGPASS_POSTGRES_PATH",
            Self::Restore => "PGPASS_RST_PATH",
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let purpose = match self {
            Self::Backup => "backup",
            Self::Maintenance => "dropping and recreating the database to be restored",
            Self::Restore => "restore",
        };
        f.write_str(purpose)
    }
}

/// Credential (pgpass) file per scope. `None` means not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFiles {
    pub backup: Option<PathBuf>,
    pub maintenance: Option<PathBuf>,
    pub restore: Option<PathBuf>,
}

impl CredentialFiles {
    /// Load credential file paths from environment variables
    pub fn from_env() -> Self {
        let read =
            |scope: CredentialScope| OsString::env_os_optional(scope.env_var()).map(PathBuf::from);
        Self {
            backup: read(CredentialScope::Backup),
            maintenance: read(CredentialScope::Maintenance),
            restore: read(CredentialScope::Restore),
        }
    }

    pub fn get(&self, scope: CredentialScope) -> Option<&Path> {
        match scope {
            CredentialScope::Backup => self.backup.as_deref(),
            CredentialScope::Maintenance => self.maintenance.as_deref(),
            CredentialScope::Restore => self.restore.as_deref(),
        }
    }
}

/// Configuration threaded through one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dump_file: PathBuf,
    pub credentials: CredentialFiles,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Self {
        Self {
            dump_file: PathBuf::from(OsString::env_os_or("DUMPFILE", DEFAULT_DUMP_FILE)),
            credentials: CredentialFiles::from_env(),
        }
    }
}
