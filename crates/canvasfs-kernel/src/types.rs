//! Filesystem-facing metadata types.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Inode number reported for `/`.
pub const ROOT_INO: u64 = 1;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// File attributes (metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttr {
    /// Inode number (the remote id for folders and files).
    pub ino: u64,
    /// Size in bytes for files; child count for directories.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// Unix permissions (e.g., 0o444).
    pub perm: u32,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last access time.
    pub atime: SystemTime,
    /// Creation time.
    pub ctime: SystemTime,
    /// Number of hard links.
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
}

impl FileAttr {
    /// Full mode word (type bits | permission bits).
    pub fn mode(&self) -> u32 {
        let type_bits = match self.kind {
            FileType::File => libc::S_IFREG,
            FileType::Directory => libc::S_IFDIR,
        };
        type_bits as u32 | self.perm
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Ownership and permission bits stamped onto every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrOptions {
    pub uid: u32,
    pub gid: u32,
    /// Permissions for the root and folders.
    pub dir_perm: u32,
    /// Permissions for files. Content is never writable.
    pub file_perm: u32,
}

impl Default for AttrOptions {
    fn default() -> Self {
        let (uid, gid) = current_ids();
        Self {
            uid,
            gid,
            dir_perm: 0o755,
            file_perm: 0o444,
        }
    }
}

#[cfg(unix)]
fn current_ids() -> (u32, u32) {
    (
        rustix::process::getuid().as_raw(),
        rustix::process::getgid().as_raw(),
    )
}

#[cfg(not(unix))]
fn current_ids() -> (u32, u32) {
    (0, 0)
}

/// Filesystem statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFs {
    /// Total blocks.
    pub blocks: u64,
    /// Free blocks.
    pub bfree: u64,
    /// Available blocks (to non-root).
    pub bavail: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub ffree: u64,
    /// Block size.
    pub bsize: u32,
    /// Maximum name length.
    pub namelen: u32,
    /// Fragment size.
    pub frsize: u32,
}

impl Default for StatFs {
    /// Fixed stub; the remote exposes no quota information we rely on.
    fn default() -> Self {
        Self {
            blocks: 4096,
            bfree: 2048,
            bavail: 2048,
            files: 0,
            ffree: 0,
            bsize: 512,
            namelen: 255,
            frsize: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(kind: FileType, perm: u32) -> FileAttr {
        FileAttr {
            ino: 5,
            size: 0,
            kind,
            perm,
            mtime: SystemTime::UNIX_EPOCH,
            atime: SystemTime::UNIX_EPOCH,
            ctime: SystemTime::UNIX_EPOCH,
            nlink: 2,
            uid: 0,
            gid: 0,
        }
    }

    #[test]
    fn test_mode_bits() {
        let file = attr(FileType::File, 0o444);
        assert_eq!(file.mode(), libc::S_IFREG as u32 | 0o444);
        assert!(file.is_file());

        let dir = attr(FileType::Directory, 0o755);
        assert_eq!(dir.mode() & libc::S_IFMT as u32, libc::S_IFDIR as u32);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_statfs_stub() {
        let st = StatFs::default();
        assert_eq!(st.bsize, 512);
        assert_eq!(st.blocks, 4096);
        assert_eq!(st.bavail, 2048);
    }

    #[test]
    fn test_attr_options_read_only_files() {
        let opts = AttrOptions::default();
        assert_eq!(opts.file_perm & 0o222, 0);
    }
}
