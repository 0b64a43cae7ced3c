//! Utility functions for copy operations.
//!
//! This module contains helpers shared by the file, tree and mirror
//! operations: entry classification, removal of colliding destination
//! entries, symlink handling and metadata preservation.

use crate::error::{Error, Result};
use crate::mirror::EntryKind;
use crate::options::{MirrorOptions, SymlinkMode};
use filetime::{FileTime, set_file_times};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

// =============================================================================
// Entry classification
// =============================================================================

/// Classify a source path under the given symlink policy.
///
/// Returns `Ok(None)` for special files (sockets, FIFOs, devices), which are
/// not copied.
pub(crate) fn source_kind(path: &Path, symlinks: SymlinkMode) -> Result<Option<EntryKind>> {
    let meta = fs::symlink_metadata(path).map_err(|source| Error::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    if meta.file_type().is_symlink() {
        return match symlinks {
            SymlinkMode::Preserve => Ok(Some(EntryKind::Symlink)),
            SymlinkMode::Follow => {
                let target = fs::metadata(path).map_err(|source| Error::Metadata {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(kind_of(&target))
            }
        };
    }

    Ok(kind_of(&meta))
}

/// Stat an existing destination entry without following symlinks.
///
/// Returns `Ok(None)` when nothing exists at `path`.
pub(crate) fn existing_entry(path: &Path) -> Result<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Metadata {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Map metadata to an [`EntryKind`]; `None` for special files.
pub(crate) fn kind_of(meta: &Metadata) -> Option<EntryKind> {
    let ft = meta.file_type();
    if ft.is_symlink() {
        Some(EntryKind::Symlink)
    } else if ft.is_dir() {
        Some(EntryKind::Dir)
    } else if ft.is_file() {
        Some(EntryKind::File)
    } else {
        None
    }
}

/// List a directory's entries sorted by file name.
pub(crate) fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source: io::Error| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = fs::read_dir(dir)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(read_err)?;
    paths.sort();
    Ok(paths)
}

// =============================================================================
// Removal
// =============================================================================

/// Remove an existing file, symlink, or directory at the given path.
///
/// Symlinks are removed as links; their targets are never touched.
pub(crate) fn remove_existing(path: &Path, meta: &Metadata) -> Result<()> {
    let ft = meta.file_type();
    let result = if ft.is_dir() {
        fs::remove_dir_all(path)
    } else {
        remove_link_or_file(path, ft.is_symlink())
    };
    result.map_err(|source| Error::Remove {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(windows)]
fn remove_link_or_file(path: &Path, is_symlink: bool) -> io::Result<()> {
    // Directory symlinks and junctions on Windows must be removed with remove_dir
    if is_symlink && fs::metadata(path).is_ok_and(|m| m.is_dir()) {
        return fs::remove_dir(path);
    }
    fs::remove_file(path)
}

#[cfg(not(windows))]
fn remove_link_or_file(path: &Path, _is_symlink: bool) -> io::Result<()> {
    fs::remove_file(path)
}

// =============================================================================
// Symlink utilities
// =============================================================================

#[cfg(unix)]
pub(crate) use std::os::unix::fs::symlink;

#[cfg(not(unix))]
pub(crate) fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Symlinks not supported on this platform",
    ))
}

/// Recreate the symlink at `src` as a new link at `dst` with the same target.
pub(crate) fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link_err = |source: io::Error| Error::Symlink {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };
    let target = fs::read_link(src).map_err(link_err)?;
    symlink(&target, dst).map_err(link_err)
}

// =============================================================================
// Directory identity
// =============================================================================

/// Get a unique key for a directory based on device and inode.
///
/// Used for symlink loop detection. On non-Unix, falls back to a hash of the
/// canonical path.
#[cfg(unix)]
pub(crate) fn get_dir_key(path: &Path) -> io::Result<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    let meta = fs::metadata(path)?;
    Ok((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
pub(crate) fn get_dir_key(path: &Path) -> io::Result<(u64, u64)> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let canonical = path.canonicalize()?;
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Ok((0, hasher.finish()))
}

// =============================================================================
// Metadata preservation
// =============================================================================

/// Copy mtime and atime from `src_meta` onto `dst`.
pub(crate) fn preserve_timestamps(src_meta: &Metadata, dst: &Path) -> io::Result<()> {
    let mtime = FileTime::from_last_modification_time(src_meta);
    let atime = FileTime::from_last_access_time(src_meta);
    set_file_times(dst, atime, mtime)
}

/// Apply permissions and timestamps from `src_meta` to `dst` as configured.
///
/// Failures are reported through [`MirrorOptions::warn`] and never abort
/// the copy.
pub(crate) fn apply_metadata(src_meta: &Metadata, dst: &Path, options: &MirrorOptions) {
    if options.preserve_permissions {
        if let Err(e) = fs::set_permissions(dst, src_meta.permissions()) {
            options.warn(&format!(
                "Failed to set permissions on {}: {}",
                dst.display(),
                e
            ));
        }
    }

    if options.preserve_timestamps {
        if let Err(e) = preserve_timestamps(src_meta, dst) {
            options.warn(&format!(
                "Failed to set timestamps on {}: {}",
                dst.display(),
                e
            ));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
