//! Open-file table.
//!
//! Opening a file downloads its whole content into memory; reads are then
//! served from that buffer until release. Memory use therefore tracks the
//! largest files open at the same time.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::classify::{Entry, EntryClassifier, Located};
use crate::error::{FsError, FsResult};
use crate::path::VirtualPath;
use crate::remote::RemoteApi;

/// One open file.
#[derive(Debug)]
struct OpenFile {
    fh: u64,
    content: Arc<[u8]>,
}

/// Tracks open files, at most one handle per path.
pub struct FileHandleTable {
    classifier: Arc<EntryClassifier>,
    remote: Arc<dyn RemoteApi>,
    open: Mutex<HashMap<String, OpenFile>>,
    next_fh: AtomicU64,
}

impl FileHandleTable {
    pub fn new(classifier: Arc<EntryClassifier>, remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            classifier,
            remote,
            open: Mutex::new(HashMap::new()),
            next_fh: AtomicU64::new(1),
        }
    }

    /// Open `path`, fetching its full content. Returns the new handle id.
    ///
    /// Handle ids increase monotonically and are never reused.
    pub async fn open(&self, path: &VirtualPath) -> FsResult<u64> {
        let key = path.key();
        if self.open.lock().contains_key(&key) {
            return Err(FsError::AlreadyOpen(path.to_string()));
        }

        let file = match self.classifier.locate(path).await? {
            Located::Root => return Err(FsError::not_a_file(path.to_string())),
            Located::Scoped { entry, .. } => match entry {
                Entry::File { file, .. } => file,
                Entry::Folder(_) => return Err(FsError::not_a_file(path.to_string())),
                Entry::NotFound => return Err(FsError::not_found(path.to_string())),
            },
        };

        let content: Arc<[u8]> = self.remote.fetch_content(&file).await?.into();

        let mut open = self.open.lock();
        // Another open of the same path may have finished while we fetched.
        if open.contains_key(&key) {
            return Err(FsError::AlreadyOpen(path.to_string()));
        }
        let fh = self.next_fh.fetch_add(1, Ordering::Relaxed);
        tracing::info!(path = %path, fh, bytes = content.len(), "opened file");
        open.insert(key, OpenFile { fh, content });
        Ok(fh)
    }

    /// Read `[offset, offset + size)` clamped to the content length.
    ///
    /// `fh` must be the live handle for `path`.
    pub fn read(&self, path: &VirtualPath, fh: u64, offset: u64, size: u32) -> FsResult<Vec<u8>> {
        let open = self.open.lock();
        let file = open
            .get(&path.key())
            .filter(|f| f.fh == fh)
            .ok_or_else(|| FsError::NotOpen(path.to_string()))?;

        let len = file.content.len() as u64;
        let start = offset.min(len) as usize;
        let end = offset.saturating_add(size as u64).min(len) as usize;
        Ok(file.content[start..end].to_vec())
    }

    /// Drop the buffered content for `path`.
    pub fn release(&self, path: &VirtualPath, fh: u64) -> FsResult<()> {
        let key = path.key();
        let mut open = self.open.lock();
        if !open.get(&key).is_some_and(|f| f.fh == fh) {
            return Err(FsError::NotOpen(path.to_string()));
        }
        open.remove(&key);
        tracing::info!(path = %path, fh, "released file");
        Ok(())
    }

    /// Live handle for `path`, if open.
    pub fn handle_for(&self, path: &VirtualPath) -> Option<u64> {
        self.open.lock().get(&path.key()).map(|f| f.fh)
    }

    /// Number of open files.
    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::children::ChildrenCache;
    use crate::namespace::ResourceNamespace;
    use crate::remote::MemoryRemote;
    use crate::resolver::PathResolver;

    const CONTENT: &[u8] = b"0123456789abcdef";

    async fn table() -> (Arc<MemoryRemote>, FileHandleTable) {
        let remote = Arc::new(MemoryRemote::new(1, "Me"));
        let scope = remote.add_course(10, "CS101");
        remote.add_file(scope.kind, "docs/hex.txt", CONTENT.to_vec());
        remote.mkdir_p(scope.kind, "docs/sub");

        let namespace = Arc::new(ResourceNamespace::load(remote.as_ref()).await.unwrap());
        let classifier = Arc::new(EntryClassifier::new(
            namespace,
            Arc::new(PathResolver::new(remote.clone())),
            Arc::new(ChildrenCache::new(remote.clone())),
        ));
        let table = FileHandleTable::new(classifier, remote.clone());
        (remote, table)
    }

    fn path(s: &str) -> VirtualPath {
        VirtualPath::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_open_read_release() {
        let (remote, table) = table().await;
        let p = path("/CS101/docs/hex.txt");

        let fh = table.open(&p).await.unwrap();
        assert_eq!(remote.calls().fetch_content, 1);
        assert_eq!(table.read(&p, fh, 0, 4).unwrap(), b"0123");
        assert_eq!(table.read(&p, fh, 10, 100).unwrap(), b"abcdef");
        assert!(table.read(&p, fh, 16, 10).unwrap().is_empty());
        assert!(table.read(&p, fh, 1000, 10).unwrap().is_empty());

        table.release(&p, fh).unwrap();
        assert!(matches!(table.read(&p, fh, 0, 4), Err(FsError::NotOpen(_))));
        assert!(matches!(table.release(&p, fh), Err(FsError::NotOpen(_))));
    }

    #[tokio::test]
    async fn test_double_open_rejected() {
        let (remote, table) = table().await;
        let p = path("/CS101/docs/hex.txt");

        table.open(&p).await.unwrap();
        assert!(matches!(table.open(&p).await, Err(FsError::AlreadyOpen(_))));
        assert_eq!(remote.calls().fetch_content, 1);
    }

    #[tokio::test]
    async fn test_handles_never_reused() {
        let (_remote, table) = table().await;
        let p = path("/CS101/docs/hex.txt");

        let first = table.open(&p).await.unwrap();
        table.release(&p, first).unwrap();
        let second = table.open(&p).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_open_folder_or_missing() {
        let (_remote, table) = table().await;

        assert!(matches!(
            table.open(&path("/CS101/docs/sub")).await,
            Err(FsError::NotAFile(_))
        ));
        assert!(matches!(
            table.open(&path("/CS101/docs/nope.txt")).await,
            Err(FsError::NotFound(_))
        ));
        assert_eq!(table.open_count(), 0);
    }

    #[tokio::test]
    async fn test_wrong_handle() {
        let (_remote, table) = table().await;
        let p = path("/CS101/docs/hex.txt");

        let fh = table.open(&p).await.unwrap();
        assert!(matches!(table.read(&p, fh + 1, 0, 1), Err(FsError::NotOpen(_))));
        assert_eq!(table.handle_for(&p), Some(fh));
    }
}
