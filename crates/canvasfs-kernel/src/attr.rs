//! Attribute lookup for the root, folders, and files.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::SystemTime;

use crate::classify::{Entry, EntryClassifier, Located};
use crate::error::{FsError, FsResult};
use crate::path::VirtualPath;
use crate::remote::{File, Folder};
use crate::types::{AttrOptions, FileAttr, FileType, ROOT_INO};

/// Produces [`FileAttr`] records for virtual paths.
pub struct AttributeService {
    classifier: Arc<EntryClassifier>,
    options: AttrOptions,
    mounted_at: SystemTime,
}

impl AttributeService {
    pub fn new(classifier: Arc<EntryClassifier>, options: AttrOptions) -> Self {
        Self {
            classifier,
            options,
            mounted_at: SystemTime::now(),
        }
    }

    /// Attributes of `path`, or `NotFound`.
    pub async fn get_attributes(&self, path: &VirtualPath) -> FsResult<FileAttr> {
        match self.classifier.locate(path).await? {
            Located::Root => Ok(self.root_attr()),
            Located::Scoped { entry, .. } => match entry {
                Entry::Folder(chain) => {
                    let folder = chain
                        .last()
                        .ok_or_else(|| FsError::not_found(path.to_string()))?;
                    Ok(self.folder_attr(folder))
                }
                Entry::File { file, .. } => Ok(self.file_attr(&file)),
                Entry::NotFound => Err(FsError::not_found(path.to_string())),
            },
        }
    }

    /// Extended attributes are never available, whatever the path or name.
    pub fn get_extended_attribute(&self, name: &str) -> FsResult<Vec<u8>> {
        tracing::debug!(name, "getxattr");
        Err(FsError::NoAttributeData)
    }

    /// Synthetic `/`: one child per scope, stamped with the mount time.
    fn root_attr(&self) -> FileAttr {
        FileAttr {
            ino: ROOT_INO,
            size: self.classifier.namespace().len() as u64,
            kind: FileType::Directory,
            perm: self.options.dir_perm,
            mtime: self.mounted_at,
            atime: self.mounted_at,
            ctime: self.mounted_at,
            nlink: 2,
            uid: self.options.uid,
            gid: self.options.gid,
        }
    }

    fn folder_attr(&self, folder: &Folder) -> FileAttr {
        FileAttr {
            ino: folder.id,
            size: folder.files_count + folder.folders_count,
            kind: FileType::Directory,
            perm: self.options.dir_perm,
            mtime: system_time(folder.updated_at),
            atime: system_time(folder.updated_at),
            ctime: system_time(folder.created_at),
            nlink: 2,
            uid: self.options.uid,
            gid: self.options.gid,
        }
    }

    fn file_attr(&self, file: &File) -> FileAttr {
        FileAttr {
            ino: file.id,
            size: file.size,
            kind: FileType::File,
            perm: self.options.file_perm,
            mtime: system_time(file.modified_at),
            atime: system_time(file.updated_at),
            ctime: system_time(file.created_at),
            nlink: 2,
            uid: self.options.uid,
            gid: self.options.gid,
        }
    }
}

fn system_time(t: DateTime<Utc>) -> SystemTime {
    t.into()
}
