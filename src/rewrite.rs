//! In-place find-and-replace over a ZIP archive on disk.
//!
//! [`ArchiveRewriter`] ties the pieces together: it backs up the source,
//! streams every member through an [`ArchiveEditor`] into a scratch file in
//! the same directory, and finally renames the scratch file over the source.
//! The original path therefore holds either the old archive or the complete
//! new one, never a partial write.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::backup::create_backup;
use crate::edit::{ArchiveEditor, Collision, EditResult, Mode, Operation, Substitution, find_collisions};
use crate::options::RewriteOptions;
use crate::progress::{NoProgress, ProgressReporter};
use crate::select::ExtensionFilter;
use crate::{Error, Result};

/// Result of a completed rewrite.
#[must_use = "rewrite result should be checked to verify operation completed as expected"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// Counters from the member pass.
    pub edit: EditResult,
    /// Location of the pre-rewrite copy.
    pub backup_path: PathBuf,
    /// CRC-32 of the pre-rewrite copy.
    pub backup_crc32: u32,
    /// True if a backup left by an earlier run was overwritten.
    pub backup_replaced: bool,
}

/// Rewrites a ZIP archive in place, replacing a literal string either in the
/// content or in the names of members with a given extension.
///
/// # Example
///
/// ```rust,no_run
/// use zipfnr::ArchiveRewriter;
///
/// let result = ArchiveRewriter::text("site.zip", ".html").process("2023", "2024")?;
/// println!(
///     "{} members updated, backup at {}",
///     result.edit.members_updated,
///     result.backup_path.display()
/// );
/// # Ok::<(), zipfnr::Error>(())
/// ```
pub struct ArchiveRewriter {
    path: PathBuf,
    filter: ExtensionFilter,
    mode: Mode,
    options: RewriteOptions,
    progress: Box<dyn ProgressReporter>,
}

impl ArchiveRewriter {
    /// Creates a rewriter for the archive at `path`.
    ///
    /// Nothing is read until [`process`](Self::process) or
    /// [`preview`](Self::preview) is called.
    pub fn new(path: impl AsRef<Path>, extension: impl Into<String>, mode: Mode) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            filter: ExtensionFilter::new(extension),
            mode,
            options: RewriteOptions::default(),
            progress: Box::new(NoProgress),
        }
    }

    /// Creates a rewriter that replaces text inside member contents.
    pub fn text(path: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self::new(path, extension, Mode::Text)
    }

    /// Creates a rewriter that replaces text inside member names.
    pub fn filename(path: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self::new(path, extension, Mode::Filename)
    }

    /// Sets the rewrite options.
    pub fn with_options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the progress reporter.
    pub fn with_progress(mut self, progress: impl ProgressReporter + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Returns the archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the extension filter.
    pub fn extension(&self) -> &str {
        self.filter.extension()
    }

    /// Returns the substitution mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the rewrite options.
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Replaces every occurrence of `find` with `replace` and swaps the
    /// rewritten archive into place.
    ///
    /// # Errors
    ///
    /// Fails without creating a backup when the arguments are invalid, the
    /// source is missing or not a ZIP archive, or a rename would duplicate a
    /// member name ([`Error::before_backup`]). Any later failure, including
    /// cancellation through the progress reporter, leaves the original
    /// untouched and the backup in place. See [`Error`] for details.
    pub fn process(&mut self, find: &str, replace: &str) -> Result<RewriteResult> {
        let substitution = Substitution::new(self.mode, find, replace)?;
        let mut editor = self.editor()?;
        let members = editor.member_names()?;

        if self.mode == Mode::Filename {
            let plan = editor.plan(&substitution)?;
            if let Some(collision) = find_collisions(&members, &plan).into_iter().next() {
                return Err(Error::NameCollision {
                    name: collision.name,
                    sources: collision.sources,
                });
            }
        }

        let backup = create_backup(&self.path, &self.options)?;

        let mut scratch = tempfile::Builder::new()
            .prefix(".zipfnr-")
            .suffix(".tmp")
            .tempfile_in(self.scratch_dir())?;
        log::debug!("writing scratch archive {}", scratch.path().display());

        let edit = editor.apply(
            BufWriter::new(scratch.as_file_mut()),
            &substitution,
            &mut *self.progress,
        )?;
        scratch.as_file().sync_all()?;

        let permissions = fs::metadata(&self.path)?.permissions();
        fs::set_permissions(scratch.path(), permissions)?;

        scratch.persist(&self.path).map_err(|e| Error::Finalize {
            path: self.path.clone(),
            source: e.error,
        })?;

        log::debug!(
            "rewrote {}: {} copied, {} renamed, {} updated, {} skipped, {} substitutions",
            self.path.display(),
            edit.members_copied,
            edit.members_renamed,
            edit.members_updated,
            edit.members_skipped,
            edit.substitutions
        );

        Ok(RewriteResult {
            edit,
            backup_path: backup.path,
            backup_crc32: backup.crc32,
            backup_replaced: backup.replaced,
        })
    }

    /// Returns the members [`process`](Self::process) would change, without
    /// writing anything.
    pub fn preview(&self, find: &str, replace: &str) -> Result<Vec<Operation>> {
        let substitution = Substitution::new(self.mode, find, replace)?;
        let mut editor = self.editor()?;
        editor.plan(&substitution)
    }

    /// Returns the target names that more than one member would end up with.
    ///
    /// Always empty in text mode, where names never change.
    pub fn collisions(&self, find: &str, replace: &str) -> Result<Vec<Collision>> {
        let substitution = Substitution::new(self.mode, find, replace)?;
        let mut editor = self.editor()?;
        let members = editor.member_names()?;
        let plan = editor.plan(&substitution)?;
        Ok(find_collisions(&members, &plan))
    }

    fn editor(&self) -> Result<ArchiveEditor<BufReader<File>>> {
        Ok(ArchiveEditor::new(self.open_source()?)
            .with_selector(self.filter.clone())
            .with_options(self.options.clone()))
    }

    fn open_source(&self) -> Result<ZipArchive<BufReader<File>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::SourceNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ZipArchive::new(BufReader::new(file))?)
    }

    fn scratch_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl std::fmt::Debug for ArchiveRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveRewriter")
            .field("path", &self.path)
            .field("extension", &self.filter.extension())
            .field("mode", &self.mode)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
