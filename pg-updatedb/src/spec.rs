//! Connection descriptors given on the command line
//!
//! Format: "host:port:database:user"

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One database connection as given by `-b` or `-r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("expected 4 colon-separated fields <hostname>:<port>:<db>:<user>, got {0}")]
    FieldCount(usize),
}

impl FromStr for ConnectionSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 {
            return Err(SpecError::FieldCount(parts.len()));
        }

        Ok(Self {
            host: parts[0].to_string(),
            port: parts[1].to_string(),
            database: parts[2].to_string(),
            user: parts[3].to_string(),
        })
    }
}

impl fmt::Display for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.host, self.port, self.database, self.user)
    }
}
