//! Error types for archive rewrite operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes of a rewrite pass, along with a convenient [`Result<T>`]
//! type alias.
//!
//! # Error Handling
//!
//! Every rewrite step is fallible and returns `Result<T, Error>`. A failed
//! call never leaves a half-written archive under the original name: the
//! original is only replaced by an atomic rename once the new archive is
//! complete.
//!
//! ## Using the `?` Operator
//!
//! ```rust,no_run
//! use zipfnr::{ArchiveRewriter, Result};
//!
//! fn bump_version(path: &str) -> Result<()> {
//!     ArchiveRewriter::text(path, ".toml").process("0.1.0", "0.2.0")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Matching Specific Failures
//!
//! ```rust,no_run
//! use zipfnr::{ArchiveRewriter, Error};
//!
//! fn rewrite(path: &str) -> zipfnr::Result<()> {
//!     match ArchiveRewriter::text(path, ".txt").process("hello", "hi") {
//!         Ok(result) => {
//!             println!("{} substitutions", result.edit.substitutions);
//!             Ok(())
//!         }
//!         Err(Error::SourceNotFound { path }) => {
//!             eprintln!("No archive at {}", path.display());
//!             Ok(())
//!         }
//!         Err(Error::MemberDecode { name, .. }) => {
//!             eprintln!("{} is not UTF-8 text; nothing was changed", name);
//!             Ok(())
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

/// The main error type for archive rewrite operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Arguments | [`EmptyPattern`][Self::EmptyPattern] | Caller precondition |
/// | Source | [`SourceNotFound`][Self::SourceNotFound], [`InvalidArchive`][Self::InvalidArchive] | Missing or damaged input |
/// | Names | [`NameCollision`][Self::NameCollision] | A rename would duplicate a member name |
/// | Backup | [`BackupExists`][Self::BackupExists], [`BackupFailed`][Self::BackupFailed], [`BackupMismatch`][Self::BackupMismatch] | Backup could not be made safely |
/// | Content | [`MemberDecode`][Self::MemberDecode], [`Member`][Self::Member] | Selected member cannot be decoded or copied |
/// | Cancelled | [`Cancelled`][Self::Cancelled] | The progress reporter asked to stop |
/// | Finalize | [`Finalize`][Self::Finalize] | New archive could not be moved into place |
/// | I/O | [`Io`][Self::Io] | Any other file system failure |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred outside the backup and finalize steps.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source archive does not exist.
    ///
    /// Detected before anything is written; no backup is created.
    #[error("Archive not found: {}", path.display())]
    SourceNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The source is not a readable ZIP archive.
    ///
    /// Raised while reading the central directory and the member headers,
    /// before any backup is created.
    #[error("Invalid ZIP archive: {0}")]
    InvalidArchive(#[source] ZipError),

    /// A member could not be decompressed or copied into the new archive,
    /// for example because it uses a compression method this build lacks.
    #[error("Failed to process member '{name}': {source}")]
    Member {
        /// Name of the member in the source archive.
        name: String,
        /// The underlying ZIP error.
        #[source]
        source: ZipError,
    },

    /// A rename would give several members the same name.
    ///
    /// [`ArchiveRewriter::process`] checks this before the backup is made.
    ///
    /// [`ArchiveRewriter::process`]: crate::ArchiveRewriter::process
    #[error("Member name '{name}' would be shared by {}", sources.join(", "))]
    NameCollision {
        /// The duplicated output name.
        name: String,
        /// The source members mapping to it, in archive order.
        sources: Vec<String>,
    },

    /// Text substitution was requested with an empty search string.
    ///
    /// An empty pattern matches between every pair of characters, so the
    /// result would depend on the replacement strategy rather than on the
    /// content. The call is rejected before any file is touched.
    #[error("search string must not be empty in text mode")]
    EmptyPattern,

    /// A backup from a previous run exists and the options forbid replacing it.
    ///
    /// # Recovery
    ///
    /// Move or delete the old backup, or leave
    /// [`RewriteOptions::keep_existing_backup`] unset to replace it.
    ///
    /// [`RewriteOptions::keep_existing_backup`]: crate::RewriteOptions::keep_existing_backup
    #[error("Backup already exists: {}", path.display())]
    BackupExists {
        /// The backup path that is already occupied.
        path: PathBuf,
    },

    /// The backup copy could not be written or synced.
    #[error("Failed to create backup at {}: {source}", path.display())]
    BackupFailed {
        /// The backup path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backup was written but its checksum differs from the source.
    #[error("Backup verification failed: expected CRC {expected:#010x}, got {actual:#010x}")]
    BackupMismatch {
        /// CRC-32 of the source archive.
        expected: u32,
        /// CRC-32 of the backup file.
        actual: u32,
    },

    /// A member selected for text substitution is not valid UTF-8.
    ///
    /// The rewrite aborts; the original archive is unchanged and the scratch
    /// archive is discarded. Use [`DecodePolicy::Skip`] to pass such members
    /// through instead.
    ///
    /// [`DecodePolicy::Skip`]: crate::DecodePolicy::Skip
    #[error("Member '{name}' is not valid UTF-8: {source}")]
    MemberDecode {
        /// Name of the offending member.
        name: String,
        /// The decoding error, including the byte offset.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The rewritten archive could not be moved over the original path.
    ///
    /// The move is an atomic rename, so the original is still in its
    /// pre-call state. The backup remains the recovery point.
    #[error("Failed to replace {}: {source}", path.display())]
    Finalize {
        /// The original archive path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The progress reporter requested cancellation.
    ///
    /// The scratch archive is discarded and the original is unchanged.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<ZipError> for Error {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => Error::Io(e),
            other => Error::InvalidArchive(other),
        }
    }
}

impl Error {
    /// Returns true if [`ArchiveRewriter::process`] fails with this error
    /// before a complete backup exists.
    ///
    /// [`ArchiveRewriter::process`]: crate::ArchiveRewriter::process
    pub fn before_backup(&self) -> bool {
        matches!(
            self,
            Error::EmptyPattern
                | Error::SourceNotFound { .. }
                | Error::InvalidArchive(_)
                | Error::NameCollision { .. }
                | Error::BackupExists { .. }
                | Error::BackupFailed { .. }
        )
    }

    /// Returns the member name associated with this error, if any.
    pub fn member_name(&self) -> Option<&str> {
        match self {
            Error::MemberDecode { name, .. } | Error::Member { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Creates a [`MemberDecode`](Self::MemberDecode) error.
    pub fn member_decode(name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Error::MemberDecode {
            name: name.into(),
            source,
        }
    }
}

/// A specialized Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, Error>;
