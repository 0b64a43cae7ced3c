//! Filesystem copy primitives.
//!
//! These are the building blocks of a mirror run: single files with
//! metadata, whole subtrees, and the removal of colliding entries.

mod file;
mod tree;
pub(crate) mod utils;

pub(crate) use file::copy_file_with_metadata;
pub(crate) use tree::copy_tree;
