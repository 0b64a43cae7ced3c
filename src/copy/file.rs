//! Single file copy with metadata.
//!
//! Content is written to a temporary file next to the destination and then
//! renamed into place, so an interrupted copy never leaves a truncated file
//! under the destination name.

use crate::error::{Error, Result};
use crate::options::MirrorOptions;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use super::utils::apply_metadata;

/// Copy the file at `src` to `dst`, preserving metadata as configured.
///
/// `src` is opened through symlinks. `dst` must not exist; callers remove
/// colliding entries first.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// - [`Error::Metadata`] if `src` cannot be stat'ed
/// - [`Error::Copy`] if opening, writing or renaming fails
pub(crate) fn copy_file_with_metadata(
    src: &Path,
    dst: &Path,
    options: &MirrorOptions,
) -> Result<u64> {
    let src_meta = fs::metadata(src).map_err(|source| Error::Metadata {
        path: src.to_path_buf(),
        source,
    })?;

    let copy_err = |source: io::Error| Error::Copy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };

    let src_file = File::open(src).map_err(copy_err)?;

    let dst_parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp_file = new_temp_file(dst_parent, options).map_err(copy_err)?;

    let bytes = io::copy(&mut BufReader::new(src_file), &mut temp_file.as_file())
        .map_err(copy_err)?;

    temp_file.persist(dst).map_err(|e| copy_err(e.error))?;

    apply_metadata(&src_meta, dst, options);

    Ok(bytes)
}

/// Create the staging file in the destination directory.
///
/// Without permission preservation the file is created with `0o666` so the
/// process umask applies, the same as a plain file creation would.
fn new_temp_file(dir: &Path, options: &MirrorOptions) -> io::Result<tempfile::NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".overcopy-");

    #[cfg(unix)]
    if !options.preserve_permissions {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    #[cfg(not(unix))]
    let _ = options;

    builder.tempfile_in(dir)
}
