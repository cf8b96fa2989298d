//! Command-line interface

use crate::flow::Plan;
use crate::spec::ConnectionSpec;
use clap::Parser;

/// Back up a PostgreSQL database and/or restore it into another one.
///
/// Credential files are taken from PGPASS_BKP_PATH (backup),
/// PGPASS_POSTGRES_PATH (drop/create) and PGPASS_RST_PATH (restore).
/// The dump file is DUMPFILE, default mybackup.dump.
#[derive(Debug, Parser)]
#[command(name = "pg-updatedb", version)]
pub struct Cli {
    /// Database to back up
    #[arg(short = 'b', value_name = "HOSTNAME:PORT:DB:USER")]
    pub backup: Option<ConnectionSpec>,

    /// Database to restore into
    #[arg(short = 'r', value_name = "HOSTNAME:PORT:DB:USER")]
    pub restore: Option<ConnectionSpec>,

    /// Drop and recreate the database before restoring
    #[arg(short = 'd')]
    pub drop: bool,

    /// Verbose output from the PostgreSQL tools
    #[arg(short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn into_plan(self) -> Plan {
        Plan {
            backup: self.backup,
            restore: self.restore,
            drop: self.drop,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("pg-updatedb").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_in_any_order() {
        let plan = parse(&[
            "-d",
            "-r",
            "stage:5432:sales:writer",
            "-v",
            "-b",
            "prod:5432:sales:reader",
        ])
        .unwrap()
        .into_plan();

        assert_eq!(plan.backup.unwrap().host, "prod");
        assert_eq!(plan.restore.unwrap().user, "writer");
        assert!(plan.drop);
        assert!(plan.verbose);
    }

    #[test]
    fn test_attached_values() {
        let plan = parse(&["-bprod:5432:sales:reader"]).unwrap().into_plan();
        assert_eq!(plan.backup.unwrap().database, "sales");
        assert!(plan.restore.is_none());
    }

    #[test]
    fn test_malformed_spec_is_usage_error() {
        for flag in ["-b", "-r"] {
            let err = parse(&[flag, "prod:5432:sales"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{}", flag);
            assert_eq!(err.exit_code(), 2, "{}", flag);
        }
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = parse(&["-x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }
}
