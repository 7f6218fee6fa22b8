//! Filesystem operations trait.
//!
//! This is the seam a dispatch layer (FUSE loop, CLI, RPC server) binds
//! to. Operations are path-based; the dispatch layer owns any inode ↔ path
//! mapping it needs.

use async_trait::async_trait;

use crate::error::{FsError, FsResult};
use crate::types::{FileAttr, StatFs};

/// Core filesystem operations.
///
/// Paths are absolute virtual paths (`/Course Name/Folder/file.pdf`).
/// Content-modifying operations have default implementations that reject
/// the call as unsupported, distinct from `NotFound`.
#[async_trait]
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get file attributes.
    async fn getattr(&self, path: &str) -> FsResult<FileAttr>;

    /// Get an extended attribute.
    async fn getxattr(&self, path: &str, name: &str) -> FsResult<Vec<u8>>;

    /// Get filesystem statistics.
    async fn statfs(&self, path: &str) -> FsResult<StatFs>;

    // ========================================================================
    // Reading
    // ========================================================================

    /// Read directory entries, including `.` and `..`.
    async fn readdir(&self, path: &str) -> FsResult<Vec<String>>;

    /// Open a file for reading. `flags` are accepted but not interpreted.
    ///
    /// Returns the handle id to pass to `read` and `release`.
    async fn open(&self, path: &str, flags: i32) -> FsResult<u64>;

    /// Read up to `size` bytes starting at `offset`.
    /// Returns fewer bytes if EOF is reached.
    async fn read(&self, path: &str, fh: u64, offset: u64, size: u32) -> FsResult<Vec<u8>>;

    /// Close a handle returned by `open`.
    async fn release(&self, path: &str, fh: u64) -> FsResult<()>;

    // ========================================================================
    // Directory mutation
    // ========================================================================

    /// Create a directory. `mode` is ignored.
    async fn mkdir(&self, path: &str, mode: u32) -> FsResult<()>;

    /// Remove a directory.
    async fn rmdir(&self, path: &str) -> FsResult<()>;

    // ========================================================================
    // Unsupported (default implementations)
    // ========================================================================

    /// Write data to a file.
    async fn write(&self, _path: &str, _fh: u64, _offset: u64, _data: &[u8]) -> FsResult<u32> {
        Err(FsError::Unsupported("write"))
    }

    /// Create a new file.
    async fn create(&self, _path: &str, _mode: u32) -> FsResult<u64> {
        Err(FsError::Unsupported("create"))
    }

    /// Remove a file.
    async fn unlink(&self, _path: &str) -> FsResult<()> {
        Err(FsError::Unsupported("unlink"))
    }

    /// Rename a file or directory.
    async fn rename(&self, _from: &str, _to: &str) -> FsResult<()> {
        Err(FsError::Unsupported("rename"))
    }

    /// Truncate a file.
    async fn truncate(&self, _path: &str, _size: u64) -> FsResult<()> {
        Err(FsError::Unsupported("truncate"))
    }

    /// Create a symbolic link.
    async fn symlink(&self, _path: &str, _target: &str) -> FsResult<()> {
        Err(FsError::Unsupported("symlink"))
    }

    /// Create a hard link.
    async fn link(&self, _oldpath: &str, _newpath: &str) -> FsResult<()> {
        Err(FsError::Unsupported("link"))
    }
}
