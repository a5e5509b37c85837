use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use action_doctor::checks;
use action_doctor::cli::{CheckArgs, Cli, Command, LocateArgs};
use action_doctor::config::{self, DoctorConfig};
use action_doctor::locate::locate_action;

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => run_check(&args),
        Command::Locate(args) => run_locate(&args),
    }
}

fn run_check(args: &CheckArgs) -> Result<()> {
    let config = config::load()?;
    let root = resolve_root(args.root.clone(), &config)?;
    let report = checks::run_all(&root);

    if args.json || config.report.json.unwrap_or(false) {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print!("{report}");
    }

    let summary = report.summary();
    anyhow::ensure!(summary.failed == 0, "{} contract check(s) failed", summary.failed);
    Ok(())
}

fn run_locate(args: &LocateArgs) -> Result<()> {
    let config = config::load()?;
    let root = resolve_root(args.root.clone(), &config)?;
    let Some(action) = locate_action(&root) else {
        anyhow::bail!(
            "no 'Download Artifact' composite action found under {}",
            root.display()
        );
    };

    if args.json {
        println!("{}", serde_json::json!({ "path": action.path }));
    } else {
        println!("{}", action.path.display());
    }
    Ok(())
}

fn resolve_root(cli_root: Option<PathBuf>, config: &DoctorConfig) -> Result<PathBuf> {
    if let Some(root) = cli_root {
        return Ok(root);
    }
    if let Some(root) = config.search.root.clone() {
        return Ok(root);
    }
    std::env::current_dir().context("failed to resolve current directory")
}
