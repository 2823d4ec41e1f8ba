//! Progress bar implementation for CLI operations.
//!
//! Also holds the Ctrl+C state. While a rewrite is running an interrupt only
//! raises a flag that [`CliProgress::should_cancel`] reports to the library,
//! so the scratch archive is removed before the process exits.

use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use zipfnr::progress::ProgressReporter;

/// Longest member name shown next to the bar
const MAX_NAME_WIDTH: usize = 40;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static REWRITING: AtomicBool = AtomicBool::new(false);

/// Records a Ctrl+C press.
///
/// Returns true if a running rewrite will stop on its own; false if the
/// caller should exit right away (nothing to clean up, or a second press).
pub fn request_interrupt() -> bool {
    REWRITING.load(Ordering::SeqCst) && !INTERRUPTED.swap(true, Ordering::SeqCst)
}

/// Marks a rewrite as running until dropped
pub struct RewriteGuard;

impl RewriteGuard {
    pub fn new() -> Self {
        REWRITING.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for RewriteGuard {
    fn drop(&mut self) {
        REWRITING.store(false, Ordering::SeqCst);
    }
}

/// Progress display for a rewrite pass
///
/// Clones share the same bar, so one clone can be handed to the rewriter
/// while the caller keeps another to finish the display.
#[derive(Clone)]
pub struct CliProgress {
    overall: ProgressBar,
}

impl CliProgress {
    /// Creates a new progress display
    pub fn new(quiet: bool) -> Self {
        let overall = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} members {wide_msg}",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        };

        Self { overall }
    }

    /// Finishes and removes the progress display
    pub fn finish(&self) {
        self.overall.finish_and_clear();
    }

    /// Stops the progress display, leaving a message
    pub fn abandon(&self, msg: impl Into<String>) {
        self.overall.abandon_with_message(msg.into());
    }
}

impl ProgressReporter for CliProgress {
    fn on_total(&mut self, members: usize) {
        self.overall.set_length(members as u64);
    }

    fn on_entry_start(&mut self, entry_name: &str, _entry_size: u64) {
        self.overall.set_message(display_name(entry_name));
    }

    fn on_entry_complete(&mut self, _entry_name: &str, _changed: bool) {
        self.overall.inc(1);
    }

    fn on_warning(&mut self, message: &str) {
        self.overall.suspend(|| eprintln!("Warning: {}", message));
    }

    fn should_cancel(&self) -> bool {
        INTERRUPTED.load(Ordering::SeqCst)
    }
}

/// Truncates long names from the left, keeping the file name visible
fn display_name(name: &str) -> String {
    let count = name.chars().count();
    if count <= MAX_NAME_WIDTH {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (MAX_NAME_WIDTH - 3)).collect();
    format!("...{}", tail)
}
