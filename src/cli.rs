//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants;

/// Key-value store and query server over a SQLite file.
#[derive(Debug, Parser)]
#[command(name = "sqlkv", version, about)]
pub struct Cli {
    /// Set path of database
    #[arg(long, global = true, env = "SQLKV_PATH", default_value = constants::DEFAULT_KV_PATH)]
    pub path: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Kv(KvAction),

    /// Serve queries against a database file over HTTP
    Serve(ServeArgs),
}

/// Local key-value commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum KvAction {
    /// Show the value of a key
    Get { key: String },

    /// Set the value of a key (reads stdin when VALUE is omitted)
    Set { key: String, value: Option<String> },

    /// Delete a key
    Del { key: String },

    /// Rename a key, failing if the new name is taken
    Rename { from: String, to: String },

    /// List all keys
    Keys,

    /// Edit the value of a key with $EDITOR
    Edit { key: String },

    /// Import data from a directory (one file per key)
    Import { source: PathBuf },

    /// Export all data to a directory
    Export {
        /// Output directory
        #[arg(short, long, default_value = constants::DEFAULT_EXPORT_DIR)]
        outdir: PathBuf,
    },
}

/// Arguments for `sqlkv serve`.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct ServeArgs {
    /// Database file to serve
    pub file: Option<PathBuf>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Allow changes to the database
    #[arg(long)]
    pub no_readonly: bool,

    /// Read server settings from a TOML file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get_with_path() {
        let cli = Cli::try_parse_from(["sqlkv", "--path", "x.db", "get", "k"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("x.db"));
        assert_eq!(cli.command_kv(), Some(&KvAction::Get { key: "k".into() }));
    }

    #[test]
    fn test_parse_export_default_outdir() {
        let cli = Cli::try_parse_from(["sqlkv", "export"]).unwrap();
        assert_eq!(
            cli.command_kv(),
            Some(&KvAction::Export {
                outdir: PathBuf::from(constants::DEFAULT_EXPORT_DIR)
            })
        );
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["sqlkv", "serve", "data.db", "--port", "8080", "--no-readonly"])
            .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.file, Some(PathBuf::from("data.db")));
        assert_eq!(args.port, Some(8080));
        assert!(args.no_readonly);
    }

    #[test]
    fn test_missing_command_is_error() {
        assert!(Cli::try_parse_from(["sqlkv"]).is_err());
    }

    impl Cli {
        fn command_kv(&self) -> Option<&KvAction> {
            match &self.command {
                Command::Kv(action) => Some(action),
                Command::Serve(_) => None,
            }
        }
    }
}
