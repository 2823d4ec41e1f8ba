//! Backup copies of the source archive.
//!
//! Before a rewrite touches anything, the source archive is copied
//! byte-for-byte to `<path>.bak` next to it. The copy is synced to disk,
//! optionally re-read and compared by CRC-32, and stamped with the source's
//! modification time.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::checksum::{Crc32Reader, crc32_file};
use crate::options::RewriteOptions;
use crate::{Error, Result};

/// Suffix appended to the archive file name to form the backup name.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Information about a written backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Where the backup was written.
    pub path: PathBuf,
    /// CRC-32 of the backup contents.
    pub crc32: u32,
    /// Size of the backup in bytes.
    pub size: u64,
    /// True if a backup from an earlier run was overwritten.
    pub replaced: bool,
}

/// Returns the backup path for an archive: the full file name plus `.bak`.
///
/// ```
/// use std::path::Path;
/// use zipfnr::backup::backup_path;
///
/// assert_eq!(backup_path(Path::new("dir/data.zip")), Path::new("dir/data.zip.bak"));
/// ```
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copies `source` to its backup path.
///
/// # Errors
///
/// - [`Error::BackupExists`] if a backup exists and `keep_existing_backup` is set
/// - [`Error::BackupFailed`] if the source cannot be read or the copy
///   cannot be written or synced
/// - [`Error::BackupMismatch`] if verification is enabled and the written
///   copy does not match the source
pub fn create_backup(source: &Path, options: &RewriteOptions) -> Result<BackupInfo> {
    let path = backup_path(source);
    let replaced = path.exists();

    if replaced {
        if options.keep_existing_backup {
            return Err(Error::BackupExists { path });
        }
        log::warn!("replacing existing backup {}", path.display());
    }

    let (crc32, size) = copy_with_crc(source, &path)?;
    log::debug!(
        "backup written to {} ({} bytes, crc {:08x})",
        path.display(),
        size,
        crc32
    );

    if options.verify_backup {
        let actual = crc32_file(&path).map_err(|source| Error::BackupFailed {
            path: path.clone(),
            source,
        })?;
        if actual != crc32 {
            return Err(Error::BackupMismatch {
                expected: crc32,
                actual,
            });
        }
    }

    if options.preserve_backup_mtime {
        if let Err(e) = copy_mtime(source, &path) {
            log::warn!("could not set backup modification time: {}", e);
        }
    }

    Ok(BackupInfo {
        path,
        crc32,
        size,
        replaced,
    })
}

/// Streams `source` into `dest`, returning the CRC-32 and length of the data.
fn copy_with_crc(source: &Path, dest: &Path) -> Result<(u32, u64)> {
    let backup_failed = |source: io::Error| Error::BackupFailed {
        path: dest.to_path_buf(),
        source,
    };

    let input = File::open(source).map_err(backup_failed)?;
    let mut reader = Crc32Reader::new(BufReader::new(input));

    let output = File::create(dest).map_err(backup_failed)?;
    let mut writer = BufWriter::new(output);
    io::copy(&mut reader, &mut writer).map_err(backup_failed)?;
    writer.flush().map_err(backup_failed)?;
    writer.get_ref().sync_all().map_err(backup_failed)?;

    Ok((reader.crc(), reader.bytes_read()))
}

fn copy_mtime(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(dest, mtime)
}
