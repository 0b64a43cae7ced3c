//! Recursive directory subtree copy.
//!
//! Copies a whole directory tree to a destination path that must not exist
//! yet. Entries are processed one at a time in file name order.

use crate::error::{Error, Result};
use crate::mirror::{EntryKind, MirrorStats};
use crate::options::MirrorOptions;
use std::fs;
use std::path::Path;

use super::file::copy_file_with_metadata;
use super::utils::{apply_metadata, copy_symlink, get_dir_key, read_dir_sorted, source_kind};

/// Copy the directory tree rooted at `src` to `dst`.
///
/// Directory keys of the tree's ancestors are tracked so that a followed
/// symlink pointing back up the tree is reported as [`Error::SymlinkLoop`]
/// instead of recursing forever. The lexical parent of `src` is seeded as
/// the first ancestor.
///
/// # Errors
///
/// - [`Error::SymlinkLoop`] if a followed link re-enters an ancestor
/// - [`Error::MaxDepthExceeded`] if `options.max_depth` is exceeded
/// - [`Error::CreateDir`], [`Error::ReadDir`], [`Error::Copy`],
///   [`Error::Symlink`] or [`Error::Metadata`] on IO failure
pub(crate) fn copy_tree(
    src: &Path,
    dst: &Path,
    options: &MirrorOptions,
    stats: &mut MirrorStats,
) -> Result<()> {
    let mut ancestors = Vec::new();
    if let Some(key) = src.parent().and_then(|parent| get_dir_key(parent).ok()) {
        ancestors.push(key);
    }
    copy_tree_at(src, dst, options, stats, 0, &mut ancestors)
}

fn copy_tree_at(
    src: &Path,
    dst: &Path,
    options: &MirrorOptions,
    stats: &mut MirrorStats,
    depth: usize,
    ancestors: &mut Vec<(u64, u64)>,
) -> Result<()> {
    if let Some(max_depth) = options.max_depth {
        if depth > max_depth {
            return Err(Error::MaxDepthExceeded {
                path: src.to_path_buf(),
                max_depth,
            });
        }
    }

    let key = get_dir_key(src).map_err(|source| Error::Metadata {
        path: src.to_path_buf(),
        source,
    })?;
    if ancestors.contains(&key) {
        return Err(Error::SymlinkLoop(src.to_path_buf()));
    }

    ancestors.push(key);
    let result = copy_dir_contents(src, dst, options, stats, depth, ancestors);
    ancestors.pop();
    result
}

fn copy_dir_contents(
    src: &Path,
    dst: &Path,
    options: &MirrorOptions,
    stats: &mut MirrorStats,
    depth: usize,
    ancestors: &mut Vec<(u64, u64)>,
) -> Result<()> {
    // List before creating dst: a followed link may point at the destination
    let entries = read_dir_sorted(src)?;

    fs::create_dir(dst).map_err(|source| Error::CreateDir {
        path: dst.to_path_buf(),
        source,
    })?;
    stats.dirs_created += 1;

    for src_path in entries {
        let Some(name) = src_path.file_name() else {
            continue;
        };
        let dst_path = dst.join(name);

        match source_kind(&src_path, options.symlinks)? {
            Some(EntryKind::Dir) => {
                copy_tree_at(&src_path, &dst_path, options, stats, depth + 1, ancestors)?;
            }
            Some(EntryKind::File) => {
                stats.bytes_copied += copy_file_with_metadata(&src_path, &dst_path, options)?;
                stats.files_copied += 1;
            }
            Some(EntryKind::Symlink) => {
                copy_symlink(&src_path, &dst_path)?;
                stats.symlinks_copied += 1;
            }
            None => {
                options.warn(&format!("Skipping special file: {}", src_path.display()));
            }
        }
    }

    // Applied last so read-only source directories can still be filled
    let src_meta = fs::metadata(src).map_err(|source| Error::Metadata {
        path: src.to_path_buf(),
        source,
    })?;
    apply_metadata(&src_meta, dst, options);

    Ok(())
}
