//! Configuration options for mirror operations.
//!
//! This module provides [`MirrorOptions`] for configuring how entries are
//! copied and [`SymlinkMode`] for choosing how symbolic links are treated.
//!
//! # Example
//!
//! ```
//! use overcopy::{MirrorOptions, SymlinkMode};
//!
//! let options = MirrorOptions::default()
//!     .with_symlinks(SymlinkMode::Preserve)
//!     .with_max_depth(64)
//!     .without_timestamps();
//! ```

/// How symbolic links inside the source tree are copied.
///
/// # Default
///
/// The default is [`SymlinkMode::Follow`], which materializes link targets
/// the way a plain recursive copy does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SymlinkMode {
    /// Follow links and copy what they point to.
    ///
    /// A link to a file becomes a regular file, a link to a directory becomes
    /// a directory copy. Dangling links fail the run. A link that points back
    /// to a directory already being copied is reported as
    /// [`Error::SymlinkLoop`](crate::Error::SymlinkLoop).
    #[default]
    Follow,
    /// Recreate links as links, with the same target text.
    ///
    /// Links are never traversed in this mode, so loops are impossible.
    Preserve,
}

impl SymlinkMode {
    /// Stable lowercase name, used in CLI output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Preserve => "preserve",
        }
    }
}

/// Options for mirror operations.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `preserve_timestamps` | `true` | Copy file timestamps (mtime/atime) |
/// | `preserve_permissions` | `true` | Copy file and directory permissions |
/// | `symlinks` | `Follow` | Materialize symlink targets |
/// | `max_depth` | `None` | No depth limit |
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MirrorOptions {
    /// Whether to preserve file timestamps (default: true)
    ///
    /// Failing to set timestamps is reported as a warning, not an error.
    pub preserve_timestamps: bool,

    /// Whether to preserve permission bits on files and directories (default: true)
    pub preserve_permissions: bool,

    /// How symlinks are handled (default: [`SymlinkMode::Follow`])
    pub symlinks: SymlinkMode,

    /// Maximum directory depth below each top-level entry (default: None = unlimited)
    ///
    /// Depth 0 is the top-level entry itself.
    pub max_depth: Option<usize>,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            preserve_timestamps: true,
            preserve_permissions: true,
            symlinks: SymlinkMode::Follow,
            max_depth: None,
            warn_handler: None,
        }
    }
}

impl MirrorOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Set the symlink policy
    #[must_use]
    pub fn with_symlinks(mut self, mode: SymlinkMode) -> Self {
        self.symlinks = mode;
        self
    }

    /// Set maximum directory depth
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Disable timestamp preservation
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.preserve_timestamps = false;
        self
    }

    /// Disable permission preservation
    ///
    /// Copied files then get the default permissions for new files.
    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.preserve_permissions = false;
        self
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}
