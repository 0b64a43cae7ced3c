//! Mirror-into/overwrite operation.
//!
//! Every direct entry of the source directory is force-copied into the
//! destination directory. A destination entry with the same name is removed
//! first, whatever its type. Destination entries whose names do not appear
//! in the source are left alone.
//!
//! A run has two steps, both available separately:
//!
//! 1. [`plan`] validates the inputs and lists the source entries. It never
//!    touches the filesystem beyond reads.
//! 2. [`MirrorPlan::execute`] ensures the destination exists and mirrors
//!    each entry in name order via [`mirror_entry`].
//!
//! The run is not transactional. The first failure aborts it and entries
//! already mirrored stay in place.

use crate::copy::utils::{
    copy_symlink, existing_entry, kind_of, read_dir_sorted, remove_existing, source_kind,
};
use crate::copy::{copy_file_with_metadata, copy_tree};
use crate::error::{Error, Result};
use crate::options::MirrorOptions;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

/// Type of a source entry as it will be copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntryKind {
    /// Regular file, or a followed link to one
    File,
    /// Directory, or a followed link to one
    Dir,
    /// Symbolic link recreated as a link
    Symlink,
}

impl EntryKind {
    /// Stable lowercase name, used in plan output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::Symlink => "symlink",
        }
    }
}

/// What mirroring an entry will do to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MirrorAction {
    /// No destination entry with this name exists
    Create,
    /// A destination entry of the same type will be replaced
    Replace,
    /// A destination entry of a different type will be replaced
    ReplaceKind,
}

impl MirrorAction {
    /// Stable lowercase name, used in plan output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Replace => "replace",
            Self::ReplaceKind => "replace_kind",
        }
    }
}

/// One direct entry of the source directory and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// File name shared by source and destination
    pub name: OsString,
    /// Full source path
    pub source: PathBuf,
    /// Full destination path
    pub destination: PathBuf,
    /// How the entry will be copied
    pub kind: EntryKind,
    /// Effect on the destination at planning time
    pub action: MirrorAction,
}

/// Statistics from a mirror run.
///
/// # Example
///
/// ```no_run
/// use overcopy::{mirror_into, MirrorOptions};
/// use std::path::Path;
///
/// let stats = mirror_into(Path::new("src"), Path::new("dst"), &MirrorOptions::default())?;
/// println!("Mirrored {} entries, replaced {}", stats.entries_mirrored, stats.entries_replaced);
/// # Ok::<(), overcopy::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MirrorStats {
    /// Number of top-level source entries mirrored
    pub entries_mirrored: u64,
    /// Number of colliding destination entries removed
    pub entries_replaced: u64,
    /// Number of files copied, at any depth
    pub files_copied: u64,
    /// Number of directories created, including the destination root
    pub dirs_created: u64,
    /// Number of symlinks recreated
    pub symlinks_copied: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Duration of the run
    pub duration: Duration,
}

/// The entries a mirror run will process, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPlan {
    source: PathBuf,
    destination: PathBuf,
    destination_exists: bool,
    entries: Vec<PlannedEntry>,
}

impl MirrorPlan {
    /// Source directory, as given.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination directory, as given.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether the destination directory existed at planning time.
    #[must_use]
    pub fn destination_exists(&self) -> bool {
        self.destination_exists
    }

    /// Planned entries, sorted by name.
    #[must_use]
    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    /// Number of planned entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the source directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create the destination directory and any missing ancestors.
    ///
    /// Returns `true` if the directory was created by this call.
    pub fn ensure_destination(&self) -> Result<bool> {
        if self.destination.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.destination).map_err(|source| Error::CreateDir {
            path: self.destination.clone(),
            source,
        })?;
        Ok(true)
    }

    /// Mirror every planned entry into the destination.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Entries before it have been
    /// mirrored; entries after it are untouched.
    pub fn execute(&self, options: &MirrorOptions) -> Result<MirrorStats> {
        self.execute_with(options, |_| {})
    }

    /// Mirror every planned entry, calling `on_entry` after each one.
    ///
    /// # Errors
    ///
    /// Same as [`MirrorPlan::execute`]. `on_entry` is not called for the
    /// entry that failed.
    pub fn execute_with<F>(
        &self,
        options: &MirrorOptions,
        mut on_entry: F,
    ) -> Result<MirrorStats>
    where
        F: FnMut(&PlannedEntry),
    {
        let start_time = Instant::now();
        let mut stats = MirrorStats::default();

        #[cfg(feature = "tracing")]
        tracing::info!(
            source = %self.source.display(),
            destination = %self.destination.display(),
            entries = self.entries.len(),
            "mirroring directory"
        );

        if self.ensure_destination()? {
            stats.dirs_created += 1;
        }

        for entry in &self.entries {
            mirror_entry(entry, options, &mut stats)?;
            on_entry(entry);
        }

        stats.duration = start_time.elapsed();

        #[cfg(feature = "tracing")]
        tracing::info!(
            entries = stats.entries_mirrored,
            replaced = stats.entries_replaced,
            files = stats.files_copied,
            bytes = stats.bytes_copied,
            elapsed_ms = stats.duration.as_millis() as u64,
            "mirror complete"
        );

        Ok(stats)
    }
}

/// Copy every entry of `src` into `dst`, overwriting same-named entries.
///
/// This is [`mirror_into`] with default options and no statistics.
///
/// # Example
///
/// ```no_run
/// overcopy::copy_overwrite("processed_books", "mirror/processed_books")?;
/// # Ok::<(), overcopy::Error>(())
/// ```
///
/// # Errors
///
/// See [`mirror_into`].
pub fn copy_overwrite<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    mirror_into(src.as_ref(), dst.as_ref(), &MirrorOptions::default()).map(|_| ())
}

/// Copy every entry of `src` into `dst` with the given options.
///
/// # Errors
///
/// Precondition errors, raised before anything is modified:
/// - [`Error::SourceNotFound`] if `src` does not exist
/// - [`Error::NotADirectory`] if `src` is not a directory
/// - [`Error::DestinationInsideSource`] if `dst` is `src` or lies inside it
/// - [`Error::SourceInsideEntry`] if replacing an entry of `dst` would
///   delete `src`
///
/// IO errors, raised at the point of failure:
/// - [`Error::CreateDir`], [`Error::ReadDir`], [`Error::Metadata`],
///   [`Error::Remove`], [`Error::Copy`], [`Error::Symlink`]
/// - [`Error::SymlinkLoop`], [`Error::MaxDepthExceeded`]
pub fn mirror_into(src: &Path, dst: &Path, options: &MirrorOptions) -> Result<MirrorStats> {
    plan(src, dst, options)?.execute(options)
}

/// Validate inputs and list what a mirror run would do, without modifying
/// anything.
///
/// # Errors
///
/// The precondition errors of [`mirror_into`], plus [`Error::ReadDir`] or
/// [`Error::Metadata`] if the source or destination cannot be inspected.
pub fn plan(src: &Path, dst: &Path, options: &MirrorOptions) -> Result<MirrorPlan> {
    check_source(src)?;
    let (source_dir, resolved_dst) = check_not_nested(src, dst)?;

    let destination_exists = dst.is_dir();
    let mut entries = Vec::new();

    for src_path in read_dir_sorted(src)? {
        let Some(name) = src_path.file_name().map(OsString::from) else {
            continue;
        };

        let Some(kind) = source_kind(&src_path, options.symlinks)? else {
            options.warn(&format!("Skipping special file: {}", src_path.display()));
            continue;
        };

        if source_dir.starts_with(resolved_dst.join(&name)) {
            return Err(Error::SourceInsideEntry {
                source_dir,
                entry: dst.join(&name),
            });
        }

        let destination = dst.join(&name);
        let action = if destination_exists {
            match existing_entry(&destination)? {
                None => MirrorAction::Create,
                Some(meta) if kind_of(&meta) == Some(kind) => MirrorAction::Replace,
                Some(_) => MirrorAction::ReplaceKind,
            }
        } else {
            MirrorAction::Create
        };

        entries.push(PlannedEntry {
            name,
            source: src_path,
            destination,
            kind,
            action,
        });
    }

    Ok(MirrorPlan {
        source: src.to_path_buf(),
        destination: dst.to_path_buf(),
        destination_exists,
        entries,
    })
}

/// Mirror a single planned entry.
///
/// Whatever currently exists at the destination path is removed first;
/// the planned action is not consulted. The destination's parent must
/// already exist (see [`MirrorPlan::ensure_destination`]).
///
/// # Errors
///
/// Any IO error of [`mirror_into`].
pub fn mirror_entry(
    entry: &PlannedEntry,
    options: &MirrorOptions,
    stats: &mut MirrorStats,
) -> Result<()> {
    if let Some(meta) = existing_entry(&entry.destination)? {
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %entry.destination.display(), "removing existing entry");

        remove_existing(&entry.destination, &meta)?;
        stats.entries_replaced += 1;
    }

    match entry.kind {
        EntryKind::Dir => copy_tree(&entry.source, &entry.destination, options, stats)?,
        EntryKind::File => {
            stats.bytes_copied +=
                copy_file_with_metadata(&entry.source, &entry.destination, options)?;
            stats.files_copied += 1;
        }
        EntryKind::Symlink => {
            copy_symlink(&entry.source, &entry.destination)?;
            stats.symlinks_copied += 1;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        source = %entry.source.display(),
        destination = %entry.destination.display(),
        kind = entry.kind.as_str(),
        "mirrored entry"
    );

    stats.entries_mirrored += 1;
    Ok(())
}

fn check_source(src: &Path) -> Result<()> {
    match fs::metadata(src) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(src.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::SourceNotFound(src.to_path_buf()))
        }
        Err(source) => Err(Error::Metadata {
            path: src.to_path_buf(),
            source,
        }),
    }
}

/// Reject a destination that is the source or lies inside it.
///
/// Returns the canonical source and the resolved destination.
fn check_not_nested(src: &Path, dst: &Path) -> Result<(PathBuf, PathBuf)> {
    let source_dir = src.canonicalize().map_err(|source| Error::Metadata {
        path: src.to_path_buf(),
        source,
    })?;
    let destination = resolve_destination(dst).map_err(|source| Error::Metadata {
        path: dst.to_path_buf(),
        source,
    })?;

    if destination.starts_with(&source_dir) {
        return Err(Error::DestinationInsideSource {
            source_dir,
            destination,
        });
    }
    Ok((source_dir, destination))
}

/// Resolve `dst` to an absolute path through its nearest existing ancestor.
///
/// The existing part is canonicalized and the missing tail is replayed on
/// top of it, with each `..` popping one component. Missing components
/// cannot be symlinks, so popping them is exact. When a `..` reaches back
/// into the existing part, the result is resolved once more so that links
/// there are followed.
fn resolve_destination(dst: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(dst)?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();

    let canonical = loop {
        match existing.canonicalize() {
            Ok(canonical) => break canonical,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (existing.components().next_back(), existing.parent()) {
                    (Some(component), Some(parent)) => {
                        missing.push(component);
                        existing = parent;
                    }
                    _ => return Ok(absolute),
                }
            }
            Err(e) => return Err(e),
        }
    };

    let mut resolved = canonical;
    let mut popped = false;
    for component in missing.iter().rev() {
        match component {
            Component::ParentDir => {
                resolved.pop();
                popped = true;
            }
            Component::CurDir => {}
            other => resolved.push(other.as_os_str()),
        }
    }

    if popped {
        resolve_destination(&resolved)
    } else {
        Ok(resolved)
    }
}
