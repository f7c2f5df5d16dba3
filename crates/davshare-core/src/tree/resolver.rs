//! Single-segment name resolution.

use crate::error::{TreeError, TreeResult};
use crate::tree::node::{CollectionNode, LeafNode, ResourceNode};
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path};
use tracing::trace;

/// Returns true for names hidden from clients (leading `.`).
///
/// This also covers the `.` and `..` pseudo-entries.
#[inline]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// True if `name` is exactly one normal path component.
fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(segment)), None) if segment == OsStr::new(name)
    )
}

/// Resolves one child `name` under `root`.
///
/// Policy, in order:
/// 1. hidden names fail with [`TreeError::Forbidden`], whether or not they exist
/// 2. names that are not a single segment fail with [`TreeError::Forbidden`]
/// 3. `root/name` must exist (symlinks followed), else [`TreeError::NotFound`]
/// 4. a directory yields a collection, anything else a leaf
///
/// Only metadata is read; nothing is created or modified.
pub fn resolve(root: &Path, name: &str) -> TreeResult<ResourceNode> {
    if is_hidden(name) {
        trace!(name = %name, "refusing hidden name");
        return Err(TreeError::forbidden(name));
    }
    if !is_single_segment(name) {
        trace!(name = %name, "refusing multi-segment name");
        return Err(TreeError::forbidden(name));
    }

    let candidate = root.join(name);
    let metadata = fs::metadata(&candidate).map_err(|e| TreeError::from_io(&candidate, e))?;

    if metadata.is_dir() {
        Ok(ResourceNode::Collection(CollectionNode::new(candidate)))
    } else {
        Ok(ResourceNode::Leaf(LeafNode::new(candidate)))
    }
}
