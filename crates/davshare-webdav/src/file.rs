//! WebDAV file handle implementation.
//!
//! Provides the `DavFile` trait implementation for leaf content. Handles are
//! read-only and stream from the open file in the chunk sizes the handler asks
//! for. The descriptor is closed when the handle is dropped, which also covers
//! aborted responses.

use crate::error::{io_error_to_fs_error, tree_error_to_fs_error};
use crate::metadata::ShareMetaData;
use bytes::Bytes;
use dav_server::fs::{DavFile, DavMetaData, FsError, FsFuture};
use davshare_core::LeafStat;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::trace;

/// Read-only handle on a shared file.
#[derive(Debug)]
pub struct ShareFile {
    file: tokio::fs::File,
    path: PathBuf,
}

impl ShareFile {
    /// Wraps a file opened by [`LeafNode::open_for_read`](davshare_core::LeafNode::open_for_read).
    pub fn new(file: std::fs::File, path: PathBuf) -> Self {
        Self {
            file: tokio::fs::File::from_std(file),
            path,
        }
    }
}

impl DavFile for ShareFile {
    fn metadata(&mut self) -> FsFuture<'_, Box<dyn DavMetaData>> {
        Box::pin(async move {
            let metadata = self
                .file
                .metadata()
                .await
                .map_err(|e| io_error_to_fs_error(&e))?;
            let stat = LeafStat::from_metadata(&self.path, &metadata)
                .map_err(|e| tree_error_to_fs_error(&e))?;
            Ok(Box::new(ShareMetaData::from_leaf_stat(stat)) as Box<dyn DavMetaData>)
        })
    }

    fn read_bytes(&mut self, count: usize) -> FsFuture<'_, Bytes> {
        Box::pin(async move {
            let mut buf = vec![0u8; count];
            let mut filled = 0;
            while filled < count {
                let n = self
                    .file
                    .read(&mut buf[filled..])
                    .await
                    .map_err(|e| io_error_to_fs_error(&e))?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            buf.truncate(filled);
            trace!(path = %self.path.display(), requested = count, read = filled, "read_bytes");
            Ok(Bytes::from(buf))
        })
    }

    fn write_bytes(&mut self, _buf: Bytes) -> FsFuture<'_, ()> {
        Box::pin(async { Err(FsError::Forbidden) })
    }

    fn write_buf(&mut self, _buf: Box<dyn bytes::Buf + Send>) -> FsFuture<'_, ()> {
        Box::pin(async { Err(FsError::Forbidden) })
    }

    fn seek(&mut self, pos: SeekFrom) -> FsFuture<'_, u64> {
        Box::pin(async move {
            self.file
                .seek(pos)
                .await
                .map_err(|e| io_error_to_fs_error(&e))
        })
    }

    fn flush(&mut self) -> FsFuture<'_, ()> {
        // Nothing to flush for readers
        Box::pin(async { Ok(()) })
    }
}
