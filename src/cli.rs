use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "action-doctor")]
#[command(version)]
#[command(about = "Audit tooling for the Download Artifact composite action")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every contract check against a repository checkout
    Check(CheckArgs),
    /// Print the path of the located action manifest
    Locate(LocateArgs),
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Repository root to search (defaults to the configured or current directory)
    #[arg(long = "root")]
    pub root: Option<PathBuf>,
    /// Emit the report as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct LocateArgs {
    /// Repository root to search (defaults to the configured or current directory)
    #[arg(long = "root")]
    pub root: Option<PathBuf>,
    /// Emit the located path as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_root_and_json() {
        let cli = Cli::try_parse_from(["action-doctor", "check", "--root", "/repo", "--json"])
            .expect("check args should parse");
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.root, Some(PathBuf::from("/repo")));
                assert!(args.json);
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn locate_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["action-doctor", "locate"]).expect("locate should parse");
        match cli.command {
            Command::Locate(args) => {
                assert!(args.root.is_none());
                assert!(!args.json);
            }
            other => panic!("expected locate command, got {other:?}"),
        }
    }
}
