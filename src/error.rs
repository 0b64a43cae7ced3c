//! Error types for overcopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur while mirroring a directory, the [`ErrorKind`] taxonomy,
//! and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Kind | Errors |
//! |------|--------|
//! | [`ErrorKind::Precondition`] | [`Error::SourceNotFound`], [`Error::NotADirectory`], [`Error::DestinationInsideSource`], [`Error::SourceInsideEntry`] |
//! | [`ErrorKind::Io`] | [`Error::CreateDir`], [`Error::ReadDir`], [`Error::Metadata`], [`Error::Remove`], [`Error::Copy`], [`Error::Symlink`], [`Error::SymlinkLoop`], [`Error::MaxDepthExceeded`] |
//!
//! Precondition errors are always raised before the destination is touched.
//! I/O errors are raised at the point of failure; entries processed before
//! the failure are left in place.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for overcopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Input paths were rejected; nothing was modified.
    Precondition,
    /// A filesystem operation failed partway through the run.
    Io,
}

impl ErrorKind {
    /// Stable lowercase name, used in CLI diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during a mirror operation.
///
/// All errors include relevant path information to aid debugging.
/// Use the [`std::error::Error`] trait methods to access underlying
/// causes where applicable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Source path does not exist
    #[error("Source directory does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Source exists but is not a directory
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Destination resolves to the source itself or a path inside it
    #[error("Destination {destination} is inside source {source_dir}")]
    DestinationInsideSource {
        /// Canonical source directory
        source_dir: PathBuf,
        /// Resolved destination directory
        destination: PathBuf,
    },

    /// Replacing a destination entry would delete the source itself
    #[error("Replacing {entry} would remove source {source_dir}")]
    SourceInsideEntry {
        /// Canonical source directory
        source_dir: PathBuf,
        /// Destination entry that contains the source
        entry: PathBuf,
    },

    /// Failed to create a directory
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to list a directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory being listed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to stat a path
    #[error("Failed to read metadata of {path}: {source}")]
    Metadata {
        /// Path being inspected
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to remove a colliding destination entry
    #[error("Failed to remove existing {path}: {source}")]
    Remove {
        /// Destination entry being removed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to copy a file
    #[error("Failed to copy {src} to {dst}: {source}")]
    Copy {
        /// Source file
        src: PathBuf,
        /// Destination file
        dst: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to read or recreate a symlink
    #[error("Failed to copy symlink {src} to {dst}: {source}")]
    Symlink {
        /// Source link
        src: PathBuf,
        /// Destination link
        dst: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Symlink loop detected (would cause infinite recursion)
    #[error("Symlink loop detected: {0}")]
    SymlinkLoop(PathBuf),

    /// Maximum directory depth exceeded
    #[error("Maximum depth {max_depth} exceeded at: {path}")]
    MaxDepthExceeded {
        /// The path where max depth was exceeded
        path: PathBuf,
        /// The configured maximum depth
        max_depth: usize,
    },
}

impl Error {
    /// Classify this error as a precondition or an I/O failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound(_)
            | Self::NotADirectory(_)
            | Self::DestinationInsideSource { .. }
            | Self::SourceInsideEntry { .. } => ErrorKind::Precondition,
            _ => ErrorKind::Io,
        }
    }

    /// Whether this error was raised before any filesystem mutation.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }

    /// The underlying IO error, if this failure wraps one.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::CreateDir { source, .. }
            | Self::ReadDir { source, .. }
            | Self::Metadata { source, .. }
            | Self::Remove { source, .. }
            | Self::Copy { source, .. }
            | Self::Symlink { source, .. } => Some(source),
            _ => None,
        }
    }
}
