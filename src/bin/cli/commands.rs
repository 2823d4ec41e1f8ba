//! Command implementations for the CLI tool.

use std::path::Path;

use zipfnr::{ArchiveRewriter, DecodePolicy, Error, Mode, RewriteOptions};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::{OutputFormatter, create_formatter};
use crate::progress::{CliProgress, RewriteGuard};

/// Configuration for a rewrite run.
pub struct RunConfig<'a> {
    pub archive_path: &'a Path,
    pub extension: &'a str,
    pub find: &'a str,
    pub replace: &'a str,
    pub mode: Mode,
    pub dry_run: bool,
    pub skip_undecodable: bool,
    pub keep_backup: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Rewrite command implementation
pub fn run(config: &RunConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let decode_policy = if config.skip_undecodable {
        DecodePolicy::Skip
    } else {
        DecodePolicy::Abort
    };
    let options = RewriteOptions::new()
        .decode_policy(decode_policy)
        .keep_existing_backup(config.keep_backup);

    let rewriter = ArchiveRewriter::new(config.archive_path, config.extension, config.mode)
        .with_options(options);

    // The ZIP writer rejects duplicate names mid-pass; report them up front instead.
    if config.mode == Mode::Filename {
        match rewriter.collisions(config.find, config.replace) {
            Ok(collisions) if !collisions.is_empty() => {
                eprint!("{}", formatter.format_collisions(&collisions));
                return ExitCode::NameCollision;
            }
            Ok(_) => {}
            Err(e) => return report_error(formatter.as_ref(), &e),
        }
    }

    if config.dry_run {
        return match rewriter.preview(config.find, config.replace) {
            Ok(plan) => {
                print!("{}", formatter.format_plan(&plan));
                ExitCode::Success
            }
            Err(e) => report_error(formatter.as_ref(), &e),
        };
    }

    let progress = CliProgress::new(config.quiet);
    let mut rewriter = rewriter.with_progress(progress.clone());

    let _rewriting = RewriteGuard::new();
    match rewriter.process(config.find, config.replace) {
        Ok(result) => {
            progress.finish();
            print!("{}", formatter.format_result(&result));
            ExitCode::Success
        }
        Err(e) => {
            progress.abandon("Failed");
            report_error(formatter.as_ref(), &e)
        }
    }
}

fn report_error(formatter: &dyn OutputFormatter, error: &Error) -> ExitCode {
    eprint!("{}", formatter.format_error(error));
    error_to_exit_code(error)
}
