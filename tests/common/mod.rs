//! Shared test utilities for integration tests.
//!
//! Archive creation and inspection helpers are consolidated here to avoid
//! duplication.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Writes a ZIP archive at `path` with the given (name, data) members.
///
/// Names ending in `/` are added as directories. Members are deflated.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    write_zip_with(path, entries, CompressionMethod::Deflated);
}

/// Writes a ZIP archive at `path` using one compression method for all members.
pub fn write_zip_with(path: &Path, entries: &[(&str, &[u8])], method: CompressionMethod) {
    let file = File::create(path).expect("create archive");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(0o644);

    for (name, data) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), options)
                .expect("add directory");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(data).expect("write member");
        }
    }
    writer.finish().expect("finish archive");
}

/// Creates a temp directory holding `archive.zip` with the given members.
pub fn archive_in_tempdir(entries: &[(&str, &[u8])]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("archive.zip");
    write_zip(&path, entries);
    (dir, path)
}

/// Reads all members of the archive at `path` in stored order.
pub fn read_members(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(File::open(path).expect("open archive")).expect("zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("member");
            let mut data = Vec::new();
            file.read_to_end(&mut data).expect("read member");
            (file.name().to_string(), data)
        })
        .collect()
}

/// Reads the member names of the archive at `path` in stored order.
pub fn member_names(path: &Path) -> Vec<String> {
    read_members(path).into_iter().map(|(name, _)| name).collect()
}

/// Reads one member's content by name.
pub fn member_content(path: &Path, name: &str) -> Option<Vec<u8>> {
    read_members(path)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, data)| data)
}

/// Returns the compression method of one member.
pub fn member_compression(path: &Path, name: &str) -> CompressionMethod {
    let mut archive = ZipArchive::new(File::open(path).expect("open archive")).expect("zip");
    archive.by_name(name).expect("member").compression()
}

/// Returns the unix mode of one member.
pub fn member_unix_mode(path: &Path, name: &str) -> Option<u32> {
    let mut archive = ZipArchive::new(File::open(path).expect("open archive")).expect("zip");
    archive.by_name(name).expect("member").unix_mode()
}
