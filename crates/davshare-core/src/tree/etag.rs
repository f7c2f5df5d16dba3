//! Entity tags for leaf nodes.
//!
//! A tag is built from the file's device id, inode number and modification
//! time, so it is cheap to compute and changes whenever the mtime does. File
//! contents are never hashed.
//!
//! Format: `"<dev>-<ino>-<mtime>"`, all lowercase hex, mtime in nanoseconds
//! since the Unix epoch, wrapped in double quotes.

use crate::error::{TreeError, TreeResult};
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Computes the quoted entity tag of the file at `path`.
///
/// Fails with [`TreeError::NotFound`] if the file has vanished.
pub fn etag(path: &Path) -> TreeResult<String> {
    let metadata = fs::metadata(path).map_err(|e| TreeError::from_io(path, e))?;
    Ok(from_metadata(&metadata))
}

/// Computes the quoted entity tag from already-read metadata.
pub fn from_metadata(metadata: &Metadata) -> String {
    let (dev, ino) = file_identity(metadata);
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    format!("\"{dev:x}-{ino:x}-{mtime:x}\"")
}

/// Strips the surrounding quotes, leaving the opaque tag value.
pub fn unquoted(tag: &str) -> &str {
    tag.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(tag)
}

#[cfg(unix)]
fn file_identity(metadata: &Metadata) -> (u64, u64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.dev(), metadata.ino())
}

#[cfg(not(unix))]
fn file_identity(_metadata: &Metadata) -> (u64, u64) {
    (0, 0)
}
