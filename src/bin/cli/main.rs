//! CLI tool for find-and-replace inside ZIP archives.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Find and replace text in the contents or names of ZIP archive members
#[derive(Parser)]
#[command(name = "zipfnr")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "A backup of the archive is written to <ARCHIVE>.bak before any change.")]
pub struct Cli {
    /// What to rewrite: member contents or member names
    #[arg(value_enum)]
    mode: CliMode,

    /// ZIP archive to rewrite in place
    archive: PathBuf,

    /// Only members whose name ends with this suffix are changed ("" selects all)
    extension: String,

    /// Literal string to search for
    #[arg(allow_hyphen_values = true)]
    find: String,

    /// Literal replacement string
    #[arg(allow_hyphen_values = true)]
    replace: String,

    /// Show what would change without touching the archive
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Copy members that are not valid UTF-8 unchanged instead of failing
    #[arg(long)]
    skip_undecodable: bool,

    /// Fail if a backup from an earlier run exists instead of replacing it
    #[arg(long)]
    keep_backup: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    /// Replace inside member contents
    Text,
    /// Replace inside member names
    Filename,
}

impl From<CliMode> for zipfnr::Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Text => zipfnr::Mode::Text,
            CliMode::Filename => zipfnr::Mode::Filename,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    // Set up Ctrl+C handler; a running rewrite cleans up before exiting
    ctrlc::set_handler(move || {
        if progress::request_interrupt() {
            eprintln!("\nInterrupted, discarding partial output");
        } else {
            eprintln!("\nInterrupted");
            std::process::exit(exit_codes::USER_INTERRUPT);
        }
    })
    .ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::BadArgs
            } else {
                ExitCode::Success
            };
            std::process::exit(code.code());
        }
    };

    let exit_code = commands::run(&commands::RunConfig {
        archive_path: &cli.archive,
        extension: &cli.extension,
        find: &cli.find,
        replace: &cli.replace,
        mode: cli.mode.into(),
        dry_run: cli.dry_run,
        skip_undecodable: cli.skip_undecodable,
        keep_backup: cli.keep_backup,
        format: cli.format,
        quiet: cli.quiet,
    });

    std::process::exit(exit_code.code());
}
