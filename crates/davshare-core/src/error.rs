//! Error types for resource-tree operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while resolving or reading a resource node.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The target does not exist, or vanished between resolution and use.
    #[error("Not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The name is hidden (leading `.`) or is not a single path segment.
    #[error("Access denied: {name:?}")]
    Forbidden {
        /// Name that was refused.
        name: String,
    },

    /// Permission or I/O failure other than plain absence.
    #[error("Filesystem access failed for {}: {source}", path.display())]
    Access {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Discriminant of [`TreeError`], for callers that map errors to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeErrorKind {
    NotFound,
    Forbidden,
    Access,
}

impl TreeError {
    /// Classifies an I/O error raised while touching `path`.
    ///
    /// Absence (including a path component that is not a directory) becomes
    /// [`TreeError::NotFound`]; everything else is kept as [`TreeError::Access`].
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => TreeError::NotFound {
                path: path.to_path_buf(),
            },
            _ => TreeError::Access {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub(crate) fn forbidden(name: &str) -> Self {
        TreeError::Forbidden {
            name: name.to_string(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> TreeErrorKind {
        match self {
            TreeError::NotFound { .. } => TreeErrorKind::NotFound,
            TreeError::Forbidden { .. } => TreeErrorKind::Forbidden,
            TreeError::Access { .. } => TreeErrorKind::Access,
        }
    }

    /// True for an [`TreeError::Access`] caused by missing permissions.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            TreeError::Access { source, .. } if source.kind() == io::ErrorKind::PermissionDenied
        )
    }
}

/// Result type for resource-tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
