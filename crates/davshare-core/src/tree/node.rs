//! Collection and leaf nodes.

use crate::error::{TreeError, TreeResult};
use crate::tree::etag;
use crate::tree::resolver::{is_hidden, resolve};
use std::fs::{self, File, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// A filesystem entry as seen by the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceNode {
    /// A directory.
    Collection(CollectionNode),
    /// Anything that is not a directory.
    Leaf(LeafNode),
}

impl ResourceNode {
    /// Final path segment of the bound path.
    pub fn name(&self) -> String {
        match self {
            ResourceNode::Collection(c) => c.name(),
            ResourceNode::Leaf(l) => l.name(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ResourceNode::Collection(_))
    }

    /// Absolute path this node is bound to.
    pub fn path(&self) -> &Path {
        match self {
            ResourceNode::Collection(c) => c.path(),
            ResourceNode::Leaf(l) => l.path(),
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionNode> {
        match self {
            ResourceNode::Collection(c) => Some(c),
            ResourceNode::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            ResourceNode::Collection(_) => None,
            ResourceNode::Leaf(l) => Some(l),
        }
    }

    /// Current last-modification time.
    pub fn modified(&self) -> TreeResult<SystemTime> {
        match self {
            ResourceNode::Collection(c) => c.modified(),
            ResourceNode::Leaf(l) => l.modified(),
        }
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn stat(path: &Path) -> TreeResult<Metadata> {
    fs::metadata(path).map_err(|e| TreeError::from_io(path, e))
}

fn modified_of(path: &Path, metadata: &Metadata) -> TreeResult<SystemTime> {
    metadata.modified().map_err(|e| TreeError::from_io(path, e))
}

/// A directory node. Children are enumerated on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNode {
    path: PathBuf,
}

impl CollectionNode {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        basename(&self.path)
    }

    /// Looks up a direct child by name.
    pub fn get_child(&self, name: &str) -> TreeResult<ResourceNode> {
        resolve(&self.path, name)
    }

    /// Lists visible children in directory enumeration order.
    ///
    /// The order is only meaningful within one call. Hidden entries are never
    /// materialized, and entries removed while the listing runs are skipped.
    /// Names that are not valid UTF-8 cannot be addressed by the engine and are
    /// skipped too, as are children that cannot be stat'ed (symlink loops,
    /// links into unreadable directories). Only a failure to read this
    /// directory itself is an error.
    pub fn list_children(&self) -> TreeResult<Vec<ResourceNode>> {
        let entries = fs::read_dir(&self.path).map_err(|e| TreeError::from_io(&self.path, e))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TreeError::from_io(&self.path, e))?;
            let Ok(name) = entry.file_name().into_string() else {
                debug!(dir = %self.path.display(), name = ?entry.file_name(), "skipping non-UTF-8 entry");
                continue;
            };
            if is_hidden(&name) {
                continue;
            }
            match resolve(&self.path, &name) {
                Ok(child) => children.push(child),
                Err(TreeError::NotFound { .. }) => {
                    trace!(dir = %self.path.display(), name = %name, "entry vanished during listing");
                }
                Err(e) => {
                    debug!(dir = %self.path.display(), name = %name, error = %e, "skipping unreadable entry");
                }
            }
        }

        trace!(dir = %self.path.display(), count = children.len(), "listed children");
        Ok(children)
    }

    pub fn modified(&self) -> TreeResult<SystemTime> {
        modified_of(&self.path, &stat(&self.path)?)
    }
}

/// Point-in-time metadata of a leaf, read with a single `stat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafStat {
    /// Byte length.
    pub size: u64,
    /// Last-modification time.
    pub modified: SystemTime,
    /// Quoted entity tag.
    pub etag: String,
}

impl LeafStat {
    /// Builds a snapshot from already-read metadata.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> TreeResult<Self> {
        Ok(Self {
            size: metadata.len(),
            modified: modified_of(path, metadata)?,
            etag: etag::from_metadata(metadata),
        })
    }
}

/// A file node. Size and content always reflect the file at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    path: PathBuf,
}

impl LeafNode {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        basename(&self.path)
    }

    /// Current byte length.
    pub fn size(&self) -> TreeResult<u64> {
        Ok(stat(&self.path)?.len())
    }

    pub fn modified(&self) -> TreeResult<SystemTime> {
        modified_of(&self.path, &stat(&self.path)?)
    }

    /// Quoted entity tag derived from device, inode and mtime.
    pub fn etag(&self) -> TreeResult<String> {
        etag::etag(&self.path)
    }

    /// Size, mtime and entity tag from one metadata read.
    pub fn stat(&self) -> TreeResult<LeafStat> {
        LeafStat::from_metadata(&self.path, &stat(&self.path)?)
    }

    /// Opens the file for reading.
    ///
    /// The caller owns the handle; it is closed when dropped.
    pub fn open_for_read(&self) -> TreeResult<File> {
        File::open(&self.path).map_err(|e| TreeError::from_io(&self.path, e))
    }
}
