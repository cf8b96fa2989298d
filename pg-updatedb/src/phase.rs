//! The four phases of a run and their fixed properties

use crate::settings::CredentialScope;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Backup,
    Drop,
    Create,
    Restore,
}

impl Phase {
    /// External program invoked for this phase.
    pub fn program(self) -> &'static str {
        match self {
            Self::Backup => "pg_dump",
            Self::Drop => "dropdb",
            Self::Create => "createdb",
            Self::Restore => "pg_restore",
        }
    }

    /// Which credential file authenticates this phase.
    pub fn scope(self) -> CredentialScope {
        match self {
            Self::Backup => CredentialScope::Backup,
            Self::Drop | Self::Create => CredentialScope::Maintenance,
            Self::Restore => CredentialScope::Restore,
        }
    }

    /// A failed backup or restore stops the run; drop and create failures
    /// are reported and the run goes on (the database may not exist yet).
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Backup | Self::Restore)
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Backup => "Backup has completed.",
            Self::Drop => "Database was dropped.",
            Self::Create => "Database was recreated.",
            Self::Restore => "Restore has completed.",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Backup => "backup",
            Self::Drop => "dropdb",
            Self::Create => "createdb",
            Self::Restore => "restore",
        };
        f.write_str(name)
    }
}
