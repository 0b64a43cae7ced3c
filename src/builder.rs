//! Builder API for ergonomic mirror operations.
//!
//! The builder pattern provides a fluent interface for configuring and
//! executing a mirror run. This is often more convenient than manually
//! constructing [`MirrorOptions`].
//!
//! # Examples
//!
//! ```no_run
//! use overcopy::MirrorBuilder;
//!
//! let stats = MirrorBuilder::new("build/assets", "public/assets")
//!     .preserve_symlinks()
//!     .no_timestamps()
//!     .run()?;
//! println!("Mirrored {} entries", stats.entries_mirrored);
//! # Ok::<(), overcopy::Error>(())
//! ```
//!
//! Inspect first, then run:
//!
//! ```no_run
//! use overcopy::MirrorBuilder;
//!
//! let builder = MirrorBuilder::new("src", "dst");
//! let plan = builder.plan()?;
//! for entry in plan.entries() {
//!     println!("{} {}", entry.action.as_str(), entry.destination.display());
//! }
//! plan.execute(builder.options())?;
//! # Ok::<(), overcopy::Error>(())
//! ```

use crate::error::Result;
use crate::mirror::{MirrorPlan, MirrorStats, plan};
use crate::options::{MirrorOptions, SymlinkMode};
use std::path::{Path, PathBuf};

/// A builder for configuring and executing mirror operations.
#[derive(Debug, Clone)]
pub struct MirrorBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: MirrorOptions,
}

impl MirrorBuilder {
    /// Create a new `MirrorBuilder` with the given source and destination paths.
    ///
    /// Uses default options (follow symlinks, preserve timestamps and permissions).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: MirrorOptions::default(),
        }
    }

    /// Recreate symlinks as links instead of copying their targets.
    #[must_use]
    pub fn preserve_symlinks(mut self) -> Self {
        self.options = self.options.with_symlinks(SymlinkMode::Preserve);
        self
    }

    /// Follow symlinks and copy their targets (the default).
    #[must_use]
    pub fn follow_symlinks(mut self) -> Self {
        self.options = self.options.with_symlinks(SymlinkMode::Follow);
        self
    }

    /// Do not preserve file timestamps.
    #[must_use]
    pub fn no_timestamps(mut self) -> Self {
        self.options = self.options.without_timestamps();
        self
    }

    /// Do not preserve permission bits.
    #[must_use]
    pub fn no_permissions(mut self) -> Self {
        self.options = self.options.without_permissions();
        self
    }

    /// Limit recursion depth below each top-level entry.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_depth(depth);
        self
    }

    /// Route non-fatal warnings to `handler`.
    #[must_use]
    pub fn warn_handler(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// The options this builder will run with.
    #[must_use]
    pub fn options(&self) -> &MirrorOptions {
        &self.options
    }

    /// Use the given options instead of the builder's current ones.
    #[must_use]
    pub fn with_options(mut self, options: MirrorOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate inputs and list the planned entries without modifying anything.
    ///
    /// # Errors
    ///
    /// See [`plan`](crate::plan).
    pub fn plan(&self) -> Result<MirrorPlan> {
        plan(&self.src, &self.dst, &self.options)
    }

    /// Execute the mirror run.
    ///
    /// # Errors
    ///
    /// See [`mirror_into`](crate::mirror_into).
    pub fn run(self) -> Result<MirrorStats> {
        self.plan()?.execute(&self.options)
    }
}
