//! # overcopy
//!
//! Mirror the entries of one directory into another, overwriting whatever
//! is in the way.
//!
//! ## Semantics
//!
//! For every direct entry `e` of the source directory, the destination entry
//! with the same name is removed (file, directory or link, regardless of
//! type) and replaced by a copy of `e`. Directories are copied recursively.
//! Destination entries whose names do not occur in the source are left
//! alone. This is a mirror-into, not a prune-sync.
//!
//! - The source must exist and be a directory; otherwise nothing is touched.
//! - The destination is created with any missing ancestors.
//! - File contents, permission bits and timestamps are preserved.
//! - The run is sequential and not transactional: the first error aborts it
//!   and entries already mirrored stay in place. Re-running is safe.
//!
//! ## Quick Start
//!
//! ```no_run
//! overcopy::copy_overwrite("processed_books", "site/processed_books")?;
//! # Ok::<(), overcopy::Error>(())
//! ```
//!
//! ## Builder API
//!
//! ```no_run
//! use overcopy::MirrorBuilder;
//!
//! let stats = MirrorBuilder::new("src", "dst")
//!     .preserve_symlinks()
//!     .run()?;
//! println!("Mirrored {} entries ({} bytes)", stats.entries_mirrored, stats.bytes_copied);
//! # Ok::<(), overcopy::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use overcopy::{mirror_into, MirrorOptions, SymlinkMode};
//! use std::path::Path;
//!
//! let options = MirrorOptions::default()
//!     .with_symlinks(SymlinkMode::Preserve)
//!     .with_max_depth(100);
//!
//! let stats = mirror_into(Path::new("src"), Path::new("dst"), &options)?;
//! println!("Replaced {} existing entries", stats.entries_replaced);
//! # Ok::<(), overcopy::Error>(())
//! ```
//!
//! ## Symlinks
//!
//! By default links are followed and their targets copied
//! ([`SymlinkMode::Follow`]). Loops are detected and reported as
//! [`Error::SymlinkLoop`]. With [`SymlinkMode::Preserve`] links are
//! recreated as links. Links already present at the destination are always
//! removed as links, never through their targets.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for options, stats and kinds |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod mirror;
mod options;

#[cfg(feature = "progress")]
mod progress;

pub use builder::MirrorBuilder;
pub use error::{Error, ErrorKind, Result};
pub use mirror::{
    EntryKind, MirrorAction, MirrorPlan, MirrorStats, PlannedEntry, copy_overwrite, mirror_entry,
    mirror_into, plan,
};
pub use options::{MirrorOptions, SymlinkMode};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_progress_bar;
