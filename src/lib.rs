//! # zipfnr
//!
//! Bulk find-and-replace inside ZIP archives.
//!
//! Given an archive, an extension, and a pair of literal strings, this crate
//! rewrites every member whose name ends with the extension, replacing the
//! search string either in the member's content (text mode) or in its name
//! (filename mode). All other members are carried over byte-for-byte.
//!
//! The archive is rewritten in place, but never partially: a backup is
//! written first, the new archive is built in a scratch file next to the
//! original, and the scratch file is renamed over the original only once it
//! is complete.
//!
//! ## Quick Start
//!
//! ### Replacing Text in Member Contents
//!
//! ```rust,no_run
//! use zipfnr::{ArchiveRewriter, Result};
//!
//! fn main() -> Result<()> {
//!     let result = ArchiveRewriter::text("docs.zip", ".md").process("colour", "color")?;
//!     println!(
//!         "{} substitutions in {} members",
//!         result.edit.substitutions,
//!         result.edit.members_updated
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Renaming Members
//!
//! ```rust,no_run
//! use zipfnr::{ArchiveRewriter, Result};
//!
//! fn main() -> Result<()> {
//!     let mut rewriter = ArchiveRewriter::filename("reports.zip", ".txt");
//!
//!     // Look before you leap: two members must not end up with one name.
//!     if !rewriter.collisions("draft_", "")?.is_empty() {
//!         return Ok(());
//!     }
//!
//!     for change in rewriter.preview("draft_", "")? {
//!         println!("{} -> {}", change.source_name(), change.target_name());
//!     }
//!     rewriter.process("draft_", "")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Handling Binary Members
//!
//! Text mode decodes selected members as UTF-8. By default a member that is
//! not valid UTF-8 aborts the rewrite and leaves the archive untouched; with
//! [`DecodePolicy::Skip`] it is copied unchanged instead:
//!
//! ```rust,no_run
//! use zipfnr::{ArchiveRewriter, DecodePolicy, RewriteOptions};
//!
//! let result = ArchiveRewriter::text("mixed.zip", "")
//!     .with_options(RewriteOptions::new().decode_policy(DecodePolicy::Skip))
//!     .process("foo", "bar")?;
//! println!("{} members skipped", result.edit.members_skipped);
//! # Ok::<(), zipfnr::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Logging
//!
//! The library never prints. It emits records through the [`log`] facade:
//! `debug` for each step and each changed member, `warn` when an existing
//! backup is replaced or an undecodable member is skipped.
//!
//! [`log`]: https://docs.rs/log

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for read operations (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod backup;
pub mod checksum;
pub mod edit;
pub mod error;
pub mod options;
pub mod progress;
pub mod rewrite;
pub mod select;

pub use error::{Error, Result};

// Re-export the rewrite workflow at crate root for convenience
pub use options::{DecodePolicy, RewriteOptions};
pub use rewrite::{ArchiveRewriter, RewriteResult};

// Re-export edit API
pub use edit::{
    ArchiveEditor, Collision, EditResult, Mode, Operation, Substitution, find_collisions,
};

// Re-export progress API
pub use progress::{NoProgress, ProgressReporter, progress_fn};

// Re-export selection API
pub use select::{EntrySelector, ExtensionFilter};
