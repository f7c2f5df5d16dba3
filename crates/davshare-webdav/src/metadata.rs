//! WebDAV metadata for shared entries.
//!
//! This module provides the `DavMetaData` trait implementation for collections
//! and leaves. Values are a snapshot taken when the metadata is requested.

use dav_server::fs::{DavMetaData, FsError};
use davshare_core::tree::etag;
use davshare_core::{CollectionNode, LeafStat, ResourceNode, TreeResult};
use std::time::SystemTime;

/// Metadata for a shared entry.
#[derive(Debug, Clone)]
pub enum ShareMetaData {
    /// Directory metadata.
    Collection(CollectionMetaData),
    /// File metadata.
    Leaf(LeafMetaData),
}

/// Metadata for a directory.
#[derive(Debug, Clone)]
pub struct CollectionMetaData {
    /// Modification time.
    pub modified: SystemTime,
}

/// Metadata for a file.
#[derive(Debug, Clone)]
pub struct LeafMetaData {
    /// Byte length.
    pub size: u64,
    /// Modification time.
    pub modified: SystemTime,
    /// Quoted entity tag.
    pub etag: String,
}

impl ShareMetaData {
    /// Reads current metadata for a node. Blocking.
    pub fn from_node(node: &ResourceNode) -> TreeResult<Self> {
        match node {
            ResourceNode::Collection(c) => Self::from_collection(c),
            ResourceNode::Leaf(l) => Ok(Self::from_leaf_stat(l.stat()?)),
        }
    }

    /// Reads current metadata for a collection. Blocking.
    pub fn from_collection(node: &CollectionNode) -> TreeResult<Self> {
        Ok(ShareMetaData::Collection(CollectionMetaData {
            modified: node.modified()?,
        }))
    }

    pub fn from_leaf_stat(stat: LeafStat) -> Self {
        ShareMetaData::Leaf(LeafMetaData {
            size: stat.size,
            modified: stat.modified,
            etag: stat.etag,
        })
    }
}

impl DavMetaData for ShareMetaData {
    fn len(&self) -> u64 {
        match self {
            ShareMetaData::Collection(_) => 0,
            ShareMetaData::Leaf(l) => l.size,
        }
    }

    fn modified(&self) -> Result<SystemTime, FsError> {
        let time = match self {
            ShareMetaData::Collection(c) => c.modified,
            ShareMetaData::Leaf(l) => l.modified,
        };
        Ok(time)
    }

    fn is_dir(&self) -> bool {
        matches!(self, ShareMetaData::Collection(_))
    }

    fn is_file(&self) -> bool {
        matches!(self, ShareMetaData::Leaf(_))
    }

    fn is_symlink(&self) -> bool {
        // Symlinks are followed during resolution
        false
    }

    fn etag(&self) -> Option<String> {
        // dav-server adds the quotes itself
        match self {
            ShareMetaData::Collection(_) => None,
            ShareMetaData::Leaf(l) => Some(etag::unquoted(&l.etag).to_string()),
        }
    }

    fn executable(&self) -> Result<bool, FsError> {
        Ok(false)
    }
}
