//! Filesystem error types.

use std::io;
use thiserror::Error;

use crate::remote::RemoteError;

/// Error returned by every filesystem-facing operation.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path, scope, or named child does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a regular file.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// Extended attributes are never available.
    #[error("no attribute data")]
    NoAttributeData,

    /// The path already has a live handle.
    #[error("already open: {0}")]
    AlreadyOpen(String),

    /// Read or release without a live handle.
    #[error("not open: {0}")]
    NotOpen(String),

    /// Malformed path (e.g. contains `..`).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Operation is not implemented by this filesystem.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// The remote API failed for a reason other than a missing resource.
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),
}

impl FsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::NotAFile(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Platform error number for this failure, as a FUSE layer would reply.
    pub fn errno(&self) -> i32 {
        match self {
            FsError::NotFound(_) => libc::ENOENT,
            FsError::NotADirectory(_) => libc::ENOTDIR,
            FsError::NotAFile(_) => libc::EISDIR,
            FsError::NoAttributeData => libc::ENODATA,
            FsError::AlreadyOpen(_) => libc::EBUSY,
            FsError::NotOpen(_) => libc::EBADF,
            FsError::InvalidPath(_) => libc::EINVAL,
            FsError::Unsupported(_) => libc::ENOSYS,
            FsError::RemoteUnavailable(_) => libc::EIO,
        }
    }
}

impl From<RemoteError> for FsError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::NotFound(what) => FsError::NotFound(what),
            RemoteError::Unavailable(msg) => FsError::RemoteUnavailable(msg),
        }
    }
}

/// Convert FsError to std::io::Error for compatibility.
impl From<FsError> for io::Error {
    fn from(e: FsError) -> Self {
        let errno = e.errno();
        match e {
            FsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            FsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            FsError::NotAFile(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            FsError::InvalidPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            FsError::Unsupported(op) => io::Error::new(io::ErrorKind::Unsupported, op),
            _ => io::Error::from_raw_os_error(errno),
        }
    }
}

/// Filesystem result type.
pub type FsResult<T> = Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(FsError::not_found("/x").errno(), libc::ENOENT);
        assert_eq!(FsError::NoAttributeData.errno(), libc::ENODATA);
        assert_eq!(FsError::AlreadyOpen("/x".into()).errno(), libc::EBUSY);
        assert_eq!(FsError::Unsupported("write").errno(), libc::ENOSYS);
        assert_ne!(
            FsError::Unsupported("write").errno(),
            FsError::not_found("/x").errno()
        );
    }

    #[test]
    fn test_remote_error_conversion() {
        let e: FsError = RemoteError::NotFound("folder".into()).into();
        assert!(matches!(e, FsError::NotFound(_)));

        let e: FsError = RemoteError::Unavailable("timeout".into()).into();
        assert!(matches!(e, FsError::RemoteUnavailable(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err: io::Error = FsError::not_found("/a").into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let io_err: io::Error = FsError::NotOpen("/a".into()).into();
        assert_eq!(io_err.raw_os_error(), Some(libc::EBADF));
    }
}
