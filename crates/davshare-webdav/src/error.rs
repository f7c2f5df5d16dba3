//! Error handling and mapping for the WebDAV server.
//!
//! Resource-tree errors are converted into `dav-server`'s [`FsError`], which
//! the handler turns into HTTP status codes:
//!
//! | Tree error                    | FsError          | HTTP |
//! |-------------------------------|------------------|------|
//! | `NotFound`                    | `NotFound`       | 404  |
//! | `Forbidden`                   | `Forbidden`      | 403  |
//! | `Access` (permission denied)  | `Forbidden`      | 403  |
//! | `Access` (other I/O)          | `GeneralFailure` | 500  |

use dav_server::fs::FsError;
use davshare_core::TreeError;
use std::io;
use thiserror::Error;

/// WebDAV-specific errors that can occur while serving the tree.
#[derive(Debug, Error)]
pub enum WebDavError {
    /// Resource-tree error.
    #[error("Resource tree error: {0}")]
    Tree(#[from] TreeError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Write operations are not served.
    #[error("Read-only share")]
    ReadOnly,

    /// Server error.
    #[error("Server error: {0}")]
    Server(String),
}

impl WebDavError {
    /// Converts this error to a dav-server FsError.
    pub fn to_fs_error(&self) -> FsError {
        match self {
            WebDavError::Tree(e) => tree_error_to_fs_error(e),
            WebDavError::Io(e) => io_error_to_fs_error(e),
            WebDavError::ReadOnly => FsError::Forbidden,
            WebDavError::Server(_) => FsError::GeneralFailure,
        }
    }
}

/// Converts a resource-tree error to a dav-server FsError.
pub fn tree_error_to_fs_error(e: &TreeError) -> FsError {
    match e {
        TreeError::NotFound { .. } => FsError::NotFound,
        TreeError::Forbidden { .. } => FsError::Forbidden,
        TreeError::Access { source, .. } => io_error_to_fs_error(source),
    }
}

/// Converts an IO error to a dav-server FsError.
pub fn io_error_to_fs_error(e: &io::Error) -> FsError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FsError::NotFound,
        io::ErrorKind::PermissionDenied => FsError::Forbidden,
        _ => FsError::GeneralFailure,
    }
}

/// Result type for WebDAV operations.
pub type WebDavResult<T> = Result<T, WebDavError>;

impl From<WebDavError> for FsError {
    fn from(e: WebDavError) -> Self {
        e.to_fs_error()
    }
}
