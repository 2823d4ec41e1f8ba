//! Archive editor for rewriting ZIP archives member by member.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::options::{DecodePolicy, RewriteOptions};
use crate::progress::{NoProgress, ProgressReporter};
use crate::select::{EntrySelector, SelectAll};
use crate::{Error, Result};

use super::operation::{Operation, Substitution};

/// Result of an edit pass.
#[must_use = "edit result should be checked to verify operation completed as expected"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// Number of members copied verbatim.
    pub members_copied: usize,
    /// Number of members written under a new name.
    pub members_renamed: usize,
    /// Number of members whose content was rewritten.
    pub members_updated: usize,
    /// Number of selected members passed through because they were not UTF-8.
    pub members_skipped: usize,
    /// Total number of replacements across names and contents.
    pub substitutions: usize,
    /// Uncompressed bytes written for updated members.
    pub bytes_rewritten: u64,
}

impl EditResult {
    /// Returns the total number of members in the resulting archive.
    pub fn total_members(&self) -> usize {
        self.members_copied + self.members_renamed + self.members_updated + self.members_skipped
    }

    /// Returns the number of members that differ from the source.
    pub fn members_changed(&self) -> usize {
        self.members_renamed + self.members_updated
    }

    /// Returns true if the output is member-for-member identical to the source.
    pub fn is_noop(&self) -> bool {
        self.members_changed() == 0
    }
}

/// Metadata carried over to a member whose content is rewritten.
struct MemberMeta {
    compression: CompressionMethod,
    unix_mode: Option<u32>,
    last_modified: Option<zip::DateTime>,
}

/// A decision for one member, plus whether it was skipped as undecodable.
struct Decision {
    operation: Operation,
    meta: Option<MemberMeta>,
    skipped: bool,
}

/// An editor that applies a [`Substitution`] to the selected members of a
/// ZIP archive and writes the result to a new archive.
///
/// Members are visited in stored order. Unselected members, and selected
/// members the substitution leaves unchanged, are copied raw (no
/// decompression). Renamed members are copied raw under the new name.
/// Only members whose content changes are recompressed.
///
/// # Example
///
/// ```rust,no_run
/// use std::fs::File;
/// use zipfnr::edit::{ArchiveEditor, Substitution};
/// use zipfnr::progress::NoProgress;
/// use zipfnr::select::ExtensionFilter;
///
/// let source = File::open("original.zip")?;
/// let editor = ArchiveEditor::open(source)?.with_selector(ExtensionFilter::new(".txt"));
///
/// let output = File::create("modified.zip")?;
/// let sub = Substitution::text("hello", "hi")?;
/// let result = editor.apply(output, &sub, &mut NoProgress)?;
/// println!("{} members updated", result.members_updated);
/// # Ok::<(), zipfnr::Error>(())
/// ```
pub struct ArchiveEditor<R: Read + Seek> {
    archive: ZipArchive<R>,
    selector: Box<dyn EntrySelector>,
    options: RewriteOptions,
}

impl<R: Read + Seek> ArchiveEditor<R> {
    /// Creates a new editor for the given archive. All members are selected.
    pub fn new(archive: ZipArchive<R>) -> Self {
        Self {
            archive,
            selector: Box::new(SelectAll),
            options: RewriteOptions::default(),
        }
    }

    /// Reads the central directory from `reader` and creates an editor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if `reader` is not a ZIP archive.
    pub fn open(reader: R) -> Result<Self> {
        Ok(Self::new(ZipArchive::new(reader)?))
    }

    /// Sets which members the substitution applies to.
    pub fn with_selector(mut self, selector: impl EntrySelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Sets the options for the edit pass.
    pub fn with_options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the number of members in the source archive.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns true if the source archive has no members.
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Returns the member names of the source archive in stored order.
    pub fn member_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            names.push(self.archive.by_index_raw(index)?.name().to_string());
        }
        Ok(names)
    }

    /// Computes the operations `apply` would perform, without writing.
    ///
    /// Only members that would change are returned, in archive order.
    pub fn plan(&mut self, substitution: &Substitution) -> Result<Vec<Operation>> {
        let mut changes = Vec::new();
        for index in 0..self.archive.len() {
            let decision = self.decide(index, substitution, &mut NoProgress)?;
            if decision.operation.is_change() {
                changes.push(decision.operation);
            }
        }
        Ok(changes)
    }

    /// Applies the substitution and writes the new archive to `output`.
    ///
    /// The output is finished and flushed before returning. On error the
    /// output holds an incomplete archive and must be discarded.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if `progress` requests cancellation
    /// - [`Error::NameCollision`] if a rename targets a name already written
    /// - [`Error::MemberDecode`] or [`Error::Member`] if a selected member
    ///   cannot be read
    pub fn apply<W: Write + Seek>(
        mut self,
        output: W,
        substitution: &Substitution,
        progress: &mut dyn ProgressReporter,
    ) -> Result<EditResult> {
        let mut result = EditResult::default();
        let mut writer = ZipWriter::new(output);
        // Output name -> source name, for members already written.
        let mut written: HashMap<String, String> = HashMap::with_capacity(self.archive.len());

        progress.on_total(self.archive.len());

        for index in 0..self.archive.len() {
            if progress.should_cancel() {
                log::debug!("cancelled before member {}", index);
                return Err(Error::Cancelled);
            }

            let decision = self.decide(index, substitution, progress)?;
            let operation = decision.operation;

            let target = operation.target_name();
            if let Some(first) = written.get(target) {
                return Err(Error::NameCollision {
                    name: target.to_string(),
                    sources: vec![first.clone(), operation.source_name().to_string()],
                });
            }
            written.insert(target.to_string(), operation.source_name().to_string());

            let member_error = |source: ZipError| match source {
                ZipError::Io(e) => Error::Io(e),
                source => Error::Member {
                    name: operation.source_name().to_string(),
                    source,
                },
            };

            match &operation {
                Operation::Copy { .. } => {
                    let file = self.archive.by_index_raw(index)?;
                    writer.raw_copy_file(file).map_err(member_error)?;
                    if decision.skipped {
                        result.members_skipped += 1;
                    } else {
                        result.members_copied += 1;
                    }
                }
                Operation::Rename { from, to, .. } => {
                    log::debug!("renaming member '{}' to '{}'", from, to);
                    let file = self.archive.by_index_raw(index)?;
                    writer
                        .raw_copy_file_rename(file, to.as_str())
                        .map_err(member_error)?;
                    result.members_renamed += 1;
                }
                Operation::Update {
                    name,
                    data,
                    substitutions,
                } => {
                    log::debug!(
                        "rewriting member '{}' ({} substitutions, {} bytes)",
                        name,
                        substitutions,
                        data.len()
                    );
                    let options = update_options(decision.meta.as_ref(), data.len());
                    writer
                        .start_file(name.as_str(), options)
                        .map_err(member_error)?;
                    writer.write_all(data)?;
                    result.members_updated += 1;
                    result.bytes_rewritten += data.len() as u64;
                }
            }

            result.substitutions += operation.substitutions();
            progress.on_entry_complete(operation.target_name(), operation.is_change());
        }

        let mut output = writer.finish()?;
        output.flush()?;

        Ok(result)
    }

    /// Decides the operation for the member at `index`.
    fn decide(
        &mut self,
        index: usize,
        substitution: &Substitution,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Decision> {
        let (name, size, is_dir) = {
            let file = self.archive.by_index_raw(index)?;
            (file.name().to_string(), file.size(), file.is_dir())
        };
        progress.on_entry_start(&name, size);

        if !self.selector.select(&name) {
            return Ok(Decision {
                operation: Operation::Copy { name },
                meta: None,
                skipped: false,
            });
        }

        if !substitution.mode().reads_content() || is_dir {
            return Ok(Decision {
                operation: substitution.operation(&name, None)?,
                meta: None,
                skipped: false,
            });
        }

        let (payload, meta) = self.read_member(index, &name)?;
        match substitution.operation(&name, Some(&payload)) {
            Ok(operation) => Ok(Decision {
                operation,
                meta: Some(meta),
                skipped: false,
            }),
            Err(Error::MemberDecode { name, source })
                if self.options.decode_policy == DecodePolicy::Skip =>
            {
                let message = format!("member '{}' is not valid UTF-8 ({}), copied unchanged", name, source);
                log::warn!("{}", message);
                progress.on_warning(&message);
                Ok(Decision {
                    operation: Operation::Copy { name },
                    meta: None,
                    skipped: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Decompresses the member at `index`.
    fn read_member(&mut self, index: usize, name: &str) -> Result<(Vec<u8>, MemberMeta)> {
        let mut file = self.archive.by_index(index).map_err(|source| match source {
            ZipError::Io(e) => Error::Io(e),
            source => Error::Member {
                name: name.to_string(),
                source,
            },
        })?;
        let meta = MemberMeta {
            compression: file.compression(),
            unix_mode: file.unix_mode(),
            last_modified: file.last_modified(),
        };
        let mut payload = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut payload)?;
        Ok((payload, meta))
    }
}

/// Builds write options for a rewritten member.
///
/// Stored members stay stored; everything else is written deflated.
fn update_options(meta: Option<&MemberMeta>, len: usize) -> SimpleFileOptions {
    let method = match meta.map(|m| m.compression) {
        Some(CompressionMethod::Stored) => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    };
    let mut options = SimpleFileOptions::default()
        .compression_method(method)
        .large_file(len as u64 >= u32::MAX as u64);
    if let Some(meta) = meta {
        if let Some(mode) = meta.unix_mode {
            options = options.unix_permissions(mode);
        }
        if let Some(time) = meta.last_modified {
            options = options.last_modified_time(time);
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::ExtensionFilter;
    use std::io::Cursor;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn read_zip(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn test_edit_result_defaults() {
        let result = EditResult::default();
        assert_eq!(result.total_members(), 0);
        assert!(result.is_noop());
    }

    #[test]
    fn test_edit_result_totals() {
        let result = EditResult {
            members_copied: 5,
            members_renamed: 2,
            members_updated: 1,
            members_skipped: 3,
            ..Default::default()
        };
        assert_eq!(result.total_members(), 11);
        assert_eq!(result.members_changed(), 3);
        assert!(!result.is_noop());
    }

    #[test]
    fn test_apply_text_substitution() {
        let source = build_zip(&[("a.txt", b"hello world hello"), ("b.bin", b"hello")]);
        let editor = ArchiveEditor::open(Cursor::new(source))
            .unwrap()
            .with_selector(ExtensionFilter::new(".txt"));

        let mut output = Cursor::new(Vec::new());
        let sub = Substitution::text("hello", "hi").unwrap();
        let result = editor.apply(&mut output, &sub, &mut NoProgress).unwrap();

        assert_eq!(result.members_updated, 1);
        assert_eq!(result.members_copied, 1);
        assert_eq!(result.substitutions, 2);

        let members = read_zip(output.into_inner());
        assert_eq!(members[0], ("a.txt".to_string(), b"hi world hi".to_vec()));
        assert_eq!(members[1], ("b.bin".to_string(), b"hello".to_vec()));
    }

    #[test]
    fn test_apply_skip_policy() {
        let source = build_zip(&[("bad.txt", &[0xFF, 0xFE, 0x00]), ("ok.txt", b"abc")]);
        let editor = ArchiveEditor::open(Cursor::new(source))
            .unwrap()
            .with_options(RewriteOptions::new().decode_policy(DecodePolicy::Skip));

        let mut output = Cursor::new(Vec::new());
        let sub = Substitution::text("b", "B").unwrap();
        let result = editor.apply(&mut output, &sub, &mut NoProgress).unwrap();

        assert_eq!(result.members_skipped, 1);
        assert_eq!(result.members_updated, 1);
        let members = read_zip(output.into_inner());
        assert_eq!(members[0].1, vec![0xFF, 0xFE, 0x00]);
        assert_eq!(members[1].1, b"aBc");
    }

    #[test]
    fn test_apply_abort_policy() {
        let source = build_zip(&[("bad.txt", &[0xFF])]);
        let editor = ArchiveEditor::open(Cursor::new(source)).unwrap();
        let sub = Substitution::text("x", "y").unwrap();
        let err = editor
            .apply(Cursor::new(Vec::new()), &sub, &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, Error::MemberDecode { .. }));
    }

    #[test]
    fn test_plan_lists_only_changes() {
        let source = build_zip(&[
            ("old_a.txt", b"1"),
            ("keep.txt", b"2"),
            ("old_b.md", b"3"),
        ]);
        let mut editor = ArchiveEditor::open(Cursor::new(source))
            .unwrap()
            .with_selector(ExtensionFilter::new(".txt"));
        let plan = editor.plan(&Substitution::filename("old", "new")).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].target_name(), "new_a.txt");
    }

    #[test]
    fn test_member_names_in_stored_order() {
        let source = build_zip(&[("z.txt", b""), ("a.txt", b""), ("m/x.txt", b"")]);
        let mut editor = ArchiveEditor::open(Cursor::new(source)).unwrap();
        assert_eq!(editor.len(), 3);
        assert_eq!(
            editor.member_names().unwrap(),
            vec!["z.txt", "a.txt", "m/x.txt"]
        );
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let result = ArchiveEditor::open(Cursor::new(b"definitely not a zip".to_vec()));
        assert!(matches!(result, Err(Error::InvalidArchive(_))));
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
    fn test_apply_stops_when_cancelled() {
        let source = build_zip(&[("a.txt", b"x"), ("b.txt", b"x"), ("c.txt", b"x")]);
        let editor = ArchiveEditor::open(Cursor::new(source)).unwrap();
        let sub = Substitution::text("x", "y").unwrap();

        let mut progress = CancelAfter { remaining: 2 };
        let err = editor
            .apply(Cursor::new(Vec::new()), &sub, &mut progress)
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_apply_rejects_duplicate_target_names() {
        let source = build_zip(&[("a_v1.txt", b"1"), ("a_v2.txt", b"2")]);
        let editor = ArchiveEditor::open(Cursor::new(source)).unwrap();

        let err = editor
            .apply(
                Cursor::new(Vec::new()),
                &Substitution::filename("_v1", "_v2"),
                &mut NoProgress,
            )
            .unwrap_err();

        match err {
            Error::NameCollision { name, sources } => {
                assert_eq!(name, "a_v2.txt");
                assert_eq!(sources, vec!["a_v1.txt", "a_v2.txt"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_update_keeps_stored_and_deflates_the_rest() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("stored.txt", stored).unwrap();
        writer.write_all(b"old stored").unwrap();
        writer
            .start_file("deflated.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"old deflated").unwrap();
        let source = writer.finish().unwrap().into_inner();

        let editor = ArchiveEditor::open(Cursor::new(source)).unwrap();
        let mut output = Cursor::new(Vec::new());
        let result = editor
            .apply(
                &mut output,
                &Substitution::text("old", "new").unwrap(),
                &mut NoProgress,
            )
            .unwrap();
        assert_eq!(result.members_updated, 2);

        let mut archive = ZipArchive::new(Cursor::new(output.into_inner())).unwrap();
        assert_eq!(
            archive.by_name("stored.txt").unwrap().compression(),
            CompressionMethod::Stored
        );
        assert_eq!(
            archive.by_name("deflated.txt").unwrap().compression(),
            CompressionMethod::Deflated
        );
        let mut text = String::new();
        archive
            .by_name("stored.txt")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "new stored");
    }
}
