//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A test fixture that provides source and destination directories.
pub struct TestFixture {
    pub src: TempDir,
    pub dst: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with fresh source and destination directories.
    pub fn new() -> Self {
        Self {
            src: TempDir::new().expect("Failed to create temp source dir"),
            dst: TempDir::new().expect("Failed to create temp dest dir"),
        }
    }

    /// Write a file under the source root, creating parent directories.
    pub fn src_file(&self, rel: &str, content: &str) {
        write_file(&self.src.path().join(rel), content);
    }

    /// Write a file under the destination root, creating parent directories.
    pub fn dst_file(&self, rel: &str, content: &str) {
        write_file(&self.dst.path().join(rel), content);
    }

    /// Check if a file exists and has the expected content.
    pub fn assert_file_content(&self, path: &Path, expected: &str) {
        assert!(path.exists(), "File does not exist: {:?}", path);
        let actual = fs::read_to_string(path).expect("Failed to read file");
        assert_eq!(actual, expected, "File content mismatch");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `content` to `path`, creating any missing parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Snapshot a tree as relative path -> file content (directories map to `None`).
pub fn snapshot(root: &Path) -> BTreeMap<String, Option<String>> {
    let mut out = BTreeMap::new();
    snapshot_into(root, root, &mut out);
    out
}

fn snapshot_into(root: &Path, dir: &Path, out: &mut BTreeMap<String, Option<String>>) {
    for entry in fs::read_dir(dir).expect("Failed to read directory") {
        let path = entry.expect("Failed to read entry").path();
        let rel = path
            .strip_prefix(root)
            .expect("Entry outside root")
            .to_string_lossy()
            .replace('\\', "/");
        if path.is_dir() {
            out.insert(rel, None);
            snapshot_into(root, &path, out);
        } else {
            let content = fs::read_to_string(&path).expect("Failed to read file");
            out.insert(rel, Some(content));
        }
    }
}
