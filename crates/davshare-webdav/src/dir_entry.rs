//! WebDAV directory entry implementation.
//!
//! Entries are produced by one listing call and carry the metadata read during
//! that call.

use crate::metadata::ShareMetaData;
use dav_server::fs::{DavDirEntry, DavMetaData, FsFuture};

/// A visible child of a collection.
#[derive(Debug, Clone)]
pub struct ShareDirEntry {
    name: String,
    meta: ShareMetaData,
}

impl ShareDirEntry {
    pub fn new(name: String, meta: ShareMetaData) -> Self {
        Self { name, meta }
    }
}

impl DavDirEntry for ShareDirEntry {
    fn name(&self) -> Vec<u8> {
        self.name.as_bytes().to_vec()
    }

    fn metadata(&self) -> FsFuture<'_, Box<dyn DavMetaData>> {
        let meta = self.meta.clone();
        Box::pin(async move { Ok(Box::new(meta) as Box<dyn DavMetaData>) })
    }

    fn is_dir(&self) -> FsFuture<'_, bool> {
        let is_dir = self.meta.is_dir();
        Box::pin(async move { Ok(is_dir) })
    }

    fn is_file(&self) -> FsFuture<'_, bool> {
        let is_file = self.meta.is_file();
        Box::pin(async move { Ok(is_file) })
    }

    fn is_symlink(&self) -> FsFuture<'_, bool> {
        Box::pin(async { Ok(false) })
    }
}
