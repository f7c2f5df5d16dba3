//! The directory served as the protocol root.

use crate::error::{TreeError, TreeResult};
use crate::tree::node::{CollectionNode, ResourceNode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Binds the protocol root to a directory on disk.
///
/// Fixed at construction and never changed. Each binding is an independent
/// value, so several differently rooted trees can live in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootBinding {
    path: PathBuf,
}

impl RootBinding {
    /// Binds to `path`, which must be an existing directory.
    ///
    /// The path is canonicalized so every node carries an absolute path.
    pub fn new(path: impl AsRef<Path>) -> TreeResult<Self> {
        let path = path.as_ref();
        let canonical = fs::canonicalize(path).map_err(|e| TreeError::from_io(path, e))?;
        let metadata = fs::metadata(&canonical).map_err(|e| TreeError::from_io(&canonical, e))?;
        if !metadata.is_dir() {
            return Err(TreeError::Access {
                path: canonical,
                source: io::Error::new(io::ErrorKind::NotADirectory, "root is not a directory"),
            });
        }

        debug!(root = %canonical.display(), "bound protocol root");
        Ok(Self { path: canonical })
    }

    /// Binds to the process's current working directory.
    pub fn current_dir() -> TreeResult<Self> {
        let cwd = std::env::current_dir().map_err(|source| TreeError::Access {
            path: PathBuf::from("."),
            source,
        })?;
        Self::new(cwd)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The collection node for the root directory itself.
    pub fn root_node(&self) -> CollectionNode {
        CollectionNode::new(self.path.clone())
    }

    /// Resolves a multi-segment path by descending one collection at a time.
    ///
    /// An empty sequence yields the root. Descending through a leaf is
    /// [`TreeError::NotFound`]; hidden segments anywhere are
    /// [`TreeError::Forbidden`].
    pub fn walk<'a, I>(&self, segments: I) -> TreeResult<ResourceNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = ResourceNode::Collection(self.root_node());
        for segment in segments {
            node = match node {
                ResourceNode::Collection(collection) => collection.get_child(segment)?,
                ResourceNode::Leaf(leaf) => {
                    return Err(TreeError::NotFound {
                        path: leaf.path().join(segment),
                    });
                }
            };
        }
        Ok(node)
    }
}
