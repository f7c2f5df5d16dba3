//! WebDAV filesystem implementation for a shared directory.
//!
//! This module provides the `DavFileSystem` trait implementation that walks the
//! resource tree from the [`RootBinding`] on every request. Filesystem calls
//! block, so they run on tokio's blocking pool.

use crate::dir_entry::ShareDirEntry;
use crate::error::{tree_error_to_fs_error, WebDavError};
use crate::file::ShareFile;
use crate::metadata::ShareMetaData;
use dav_server::davpath::DavPath;
use dav_server::fs::{
    DavDirEntry, DavFile, DavFileSystem, DavMetaData, FsError, FsFuture, FsStream, OpenOptions,
    ReadDirMeta,
};
use davshare_core::{ResourceNode, RootBinding, TreeError};
use futures::stream;
use std::path::{Component, Path};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument, trace};

/// WebDAV filesystem backed by a local directory.
///
/// Implements the `DavFileSystem` trait from dav-server. Only the read side is
/// implemented; every mutating method keeps dav-server's default
/// `NotImplemented` answer, and opening a file for writing is refused.
///
/// Nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct ShareWebDav {
    root: Arc<RootBinding>,
}

impl ShareWebDav {
    /// Create a new WebDAV filesystem serving `root`.
    pub fn new(root: RootBinding) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Bind `path` and serve it.
    pub fn open(path: &Path) -> Result<Self, WebDavError> {
        Ok(Self::new(RootBinding::new(path)?))
    }

    /// The bound root.
    pub fn root(&self) -> &RootBinding {
        &self.root
    }

    /// Split a WebDAV path into tree segments.
    ///
    /// dav-server has already percent-decoded and normalized the path, so only
    /// plain components are expected. Names that are not UTF-8 cannot exist in
    /// the tree.
    fn segments(path: &DavPath) -> Result<Vec<String>, FsError> {
        let mut segments = Vec::new();
        for component in path.as_rel_ospath().components() {
            match component {
                Component::Normal(name) => {
                    let name = name.to_str().ok_or(FsError::NotFound)?;
                    segments.push(name.to_string());
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(FsError::Forbidden);
                }
            }
        }
        trace!(raw_path = %path.as_url_string(), segments = ?segments, "segments");
        Ok(segments)
    }

    /// Resolve a request path and run `f` on the node, off the async runtime.
    async fn with_node<T, F>(&self, path: &DavPath, f: F) -> Result<T, FsError>
    where
        T: Send + 'static,
        F: FnOnce(ResourceNode) -> Result<T, FsError> + Send + 'static,
    {
        let segments = Self::segments(path)?;
        let root = Arc::clone(&self.root);
        blocking(move || {
            let node = root
                .walk(segments.iter().map(String::as_str))
                .map_err(|e| log_tree_error(&segments, &e))?;
            f(node)
        })
        .await
    }
}

/// Run a blocking filesystem closure on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, FsError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FsError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "Blocking filesystem task failed");
        FsError::GeneralFailure
    })?
}

fn log_tree_error(segments: &[String], e: &TreeError) -> FsError {
    match e {
        TreeError::NotFound { .. } => trace!(path = ?segments, "not found"),
        TreeError::Forbidden { name } => debug!(path = ?segments, name = %name, "refused hidden name"),
        TreeError::Access { .. } => debug!(path = ?segments, error = %e, "filesystem access failed"),
    }
    tree_error_to_fs_error(e)
}

impl DavFileSystem for ShareWebDav {
    #[instrument(level = "debug", skip(self), fields(path = %path.as_url_string()))]
    fn open<'a>(&'a self, path: &'a DavPath, options: OpenOptions) -> FsFuture<'a, Box<dyn DavFile>> {
        Box::pin(async move {
            if options.write || options.append || options.truncate || options.create || options.create_new {
                debug!(options = ?options, "Refusing write open on read-only share");
                return Err(WebDavError::ReadOnly.into());
            }

            let start = Instant::now();
            let file = self
                .with_node(path, |node| match node {
                    ResourceNode::Leaf(leaf) => {
                        let file = leaf.open_for_read().map_err(|e| tree_error_to_fs_error(&e))?;
                        Ok(ShareFile::new(file, leaf.path().to_path_buf()))
                    }
                    ResourceNode::Collection(_) => Err(FsError::Forbidden),
                })
                .await?;

            debug!(elapsed_us = start.elapsed().as_micros(), "Opened file for reading");
            Ok(Box::new(file) as Box<dyn DavFile>)
        })
    }

    #[instrument(level = "debug", skip(self), fields(path = %path.as_url_string()))]
    fn read_dir<'a>(
        &'a self,
        path: &'a DavPath,
        _: ReadDirMeta,
    ) -> FsFuture<'a, FsStream<Box<dyn DavDirEntry>>> {
        Box::pin(async move {
            let start = Instant::now();

            let entries = self
                .with_node(path, |node| {
                    let ResourceNode::Collection(collection) = node else {
                        return Err(FsError::Forbidden);
                    };
                    let children = collection
                        .list_children()
                        .map_err(|e| tree_error_to_fs_error(&e))?;

                    let mut entries: Vec<Box<dyn DavDirEntry>> = Vec::with_capacity(children.len());
                    for child in children {
                        match ShareMetaData::from_node(&child) {
                            Ok(meta) => entries.push(Box::new(ShareDirEntry::new(child.name(), meta))),
                            // Removed since it was listed
                            Err(TreeError::NotFound { .. }) => {}
                            Err(e) => return Err(tree_error_to_fs_error(&e)),
                        }
                    }
                    Ok(entries)
                })
                .await?;

            debug!(
                count = entries.len(),
                elapsed_us = start.elapsed().as_micros(),
                "Directory entries found"
            );
            Ok(Box::pin(stream::iter(entries.into_iter().map(Ok))) as FsStream<_>)
        })
    }

    #[instrument(level = "debug", skip(self), fields(path = %path.as_url_string()))]
    fn metadata<'a>(&'a self, path: &'a DavPath) -> FsFuture<'a, Box<dyn DavMetaData>> {
        Box::pin(async move {
            let meta = self
                .with_node(path, |node| {
                    ShareMetaData::from_node(&node).map_err(|e| tree_error_to_fs_error(&e))
                })
                .await?;
            Ok(Box::new(meta) as Box<dyn DavMetaData>)
        })
    }

    fn have_props<'a>(
        &'a self,
        _path: &'a DavPath,
    ) -> std::pin::Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        // No dead properties on a read-only share
        Box::pin(async { false })
    }
}
