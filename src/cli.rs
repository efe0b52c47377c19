use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};

#[derive(Debug, Parser)]
#[command(
    name = "retitle",
    version,
    about = "Rename note files with succinct titles derived from an LLM completion service"
)]
struct Cli {
    /// Emit the command report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Derive and print a title for one file without renaming it.
    Suggest {
        file: PathBuf,
        /// Fold the derived title to lower case.
        #[arg(long)]
        lowercase: bool,
        /// Keep colon subtitles, rewritten as " - ".
        #[arg(long)]
        subtitles: bool,
    },
    /// Derive titles for the given files and rename them, one at a time.
    Run {
        files: Vec<PathBuf>,
        /// Report composed target paths without renaming anything.
        #[arg(long)]
        dry_run: bool,
        /// Fold derived titles to lower case.
        #[arg(long)]
        lowercase: bool,
        /// Keep colon subtitles, rewritten as " - ".
        #[arg(long)]
        subtitles: bool,
    },
    /// Show resolved configuration, paths, and provider; no network calls.
    Status,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match &cli.command {
        Command::Suggest {
            file,
            lowercase,
            subtitles,
        } => commands::suggest::run(&commands::suggest::SuggestOptions {
            file: file.clone(),
            lower_case: *lowercase,
            accept_subtitles: *subtitles,
        })?,
        Command::Run {
            files,
            dry_run,
            lowercase,
            subtitles,
        } => commands::run::run(&commands::run::RunOptions {
            files: files.clone(),
            dry_run: *dry_run,
            lower_case: *lowercase,
            accept_subtitles: *subtitles,
        })?,
        Command::Status => commands::status::run()?,
    };
    emit(&report, cli.json)
}

fn emit(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for detail in &report.details {
            println!("- {detail}");
        }
        for issue in &report.issues {
            eprintln!("! {issue}");
        }
    }
    if report.ok {
        Ok(())
    } else {
        anyhow::bail!(
            "{} finished with {} issue(s)",
            report.command,
            report.issues.len()
        )
    }
}
