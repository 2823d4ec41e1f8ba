//! Progress reporting for rewrite passes.
//!
//! The editor calls a [`ProgressReporter`] once with the member count and
//! then around every member it writes. All methods have no-op defaults, so
//! implementations only override what they display. Before each member the
//! editor polls [`ProgressReporter::should_cancel`] and stops with
//! [`Error::Cancelled`](crate::Error::Cancelled) when it returns true.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipfnr::ArchiveRewriter;
//! use zipfnr::progress::progress_fn;
//!
//! let mut rewriter = ArchiveRewriter::filename("bundle.zip", ".txt").with_progress(progress_fn(
//!     |name: &str, changed: bool| {
//!         if changed {
//!             println!("renamed {}", name);
//!         }
//!     },
//! ));
//! rewriter.process("draft_", "final_")?;
//! # Ok::<(), zipfnr::Error>(())
//! ```

/// IEC byte unit: 1 KiB = 1024 bytes.
pub const BYTES_KIB: u64 = 1024;
/// IEC byte unit: 1 MiB = 1024 KiB.
pub const BYTES_MIB: u64 = 1024 * BYTES_KIB;
/// IEC byte unit: 1 GiB = 1024 MiB.
pub const BYTES_GIB: u64 = 1024 * BYTES_MIB;

// Floating point versions for formatting calculations
const BYTES_KB: f64 = 1024.0;
const BYTES_MB: f64 = BYTES_KB * 1024.0;
const BYTES_GB: f64 = BYTES_MB * 1024.0;

/// Progress reporting trait for rewrite passes.
pub trait ProgressReporter: Send {
    /// Called once before the first member with the number of members.
    fn on_total(&mut self, total_members: usize) {
        let _ = total_members;
    }

    /// Called before a member is written.
    ///
    /// `size` is the uncompressed size recorded in the source archive.
    fn on_entry_start(&mut self, entry_name: &str, size: u64) {
        let _ = (entry_name, size);
    }

    /// Called after a member is written.
    ///
    /// `changed` is true when the member was renamed or its content updated.
    fn on_entry_complete(&mut self, entry_name: &str, changed: bool) {
        let _ = (entry_name, changed);
    }

    /// Called when a member is passed through instead of being transformed.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }

    /// Checks if cancellation has been requested.
    ///
    /// Called before each member is processed. Default implementation
    /// returns `false`.
    fn should_cancel(&self) -> bool {
        false
    }
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for Box<P> {
    fn on_total(&mut self, total_members: usize) {
        (**self).on_total(total_members);
    }

    fn on_entry_start(&mut self, entry_name: &str, size: u64) {
        (**self).on_entry_start(entry_name, size);
    }

    fn on_entry_complete(&mut self, entry_name: &str, changed: bool) {
        (**self).on_entry_complete(entry_name, changed);
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message);
    }

    fn should_cancel(&self) -> bool {
        (**self).should_cancel()
    }
}

/// A progress reporter that does nothing (null object pattern).
#[derive(Debug, Default, Clone)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// A progress reporter that calls a closure after every member.
pub struct ClosureProgress<F> {
    callback: F,
}

impl<F> ClosureProgress<F>
where
    F: FnMut(&str, bool) + Send,
{
    /// Creates a progress reporter from a closure.
    ///
    /// The closure receives (member_name, changed).
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgress<F>
where
    F: FnMut(&str, bool) + Send,
{
    fn on_entry_complete(&mut self, entry_name: &str, changed: bool) {
        (self.callback)(entry_name, changed)
    }
}

/// Creates a closure-based progress reporter.
pub fn progress_fn<F>(f: F) -> ClosureProgress<F>
where
    F: FnMut(&str, bool) + Send,
{
    ClosureProgress::new(f)
}

/// Formats bytes as a human-readable string using IEC units (KiB, MiB, GiB).
///
/// # Examples
///
/// ```rust
/// use zipfnr::progress::format_bytes_iec;
///
/// assert_eq!(format_bytes_iec(0), "0 B");
/// assert_eq!(format_bytes_iec(512), "512 B");
/// assert_eq!(format_bytes_iec(1024), "1.0 KiB");
/// assert_eq!(format_bytes_iec(1536), "1.5 KiB");
/// assert_eq!(format_bytes_iec(1048576), "1.0 MiB");
/// ```
pub fn format_bytes_iec(bytes: u64) -> String {
    let bytes_f64 = bytes as f64;
    if bytes_f64 < BYTES_KB {
        format!("{} B", bytes)
    } else if bytes_f64 < BYTES_MB {
        format!("{:.1} KiB", bytes_f64 / BYTES_KB)
    } else if bytes_f64 < BYTES_GB {
        format!("{:.1} MiB", bytes_f64 / BYTES_MB)
    } else {
        format!("{:.1} GiB", bytes_f64 / BYTES_GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fn() {
        let mut changed = Vec::new();
        {
            let mut progress = progress_fn(|name: &str, did_change: bool| {
                if did_change {
                    changed.push(name.to_string());
                }
            });
            progress.on_entry_complete("x.txt", true);
            progress.on_entry_complete("y.txt", false);
        }
        assert_eq!(changed, vec!["x.txt".to_string()]);
    }

    struct CancelAfter {
        remaining: usize,
    }

    impl ProgressReporter for CancelAfter {
        fn on_entry_complete(&mut self, _entry_name: &str, _changed: bool) {
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn should_cancel(&self) -> bool {
            self.remaining == 0
        }
    }

    #[test]
    fn test_default_never_cancels() {
        assert!(!NoProgress.should_cancel());
        assert!(!progress_fn(|_: &str, _: bool| {}).should_cancel());
    }

    #[test]
    fn test_boxed_reporter_forwards() {
        let mut progress: Box<dyn ProgressReporter> = Box::new(CancelAfter { remaining: 1 });
        progress.on_total(1);
        assert!(!progress.should_cancel());
        progress.on_entry_complete("a", false);
        assert!(progress.should_cancel());
    }

    #[test]
    fn test_format_bytes_iec() {
        assert_eq!(format_bytes_iec(BYTES_KIB * 3), "3.0 KiB");
        assert_eq!(format_bytes_iec(BYTES_MIB * 2), "2.0 MiB");
        assert_eq!(format_bytes_iec(BYTES_GIB), "1.0 GiB");
    }
}
