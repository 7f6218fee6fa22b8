//! Folder listing cache, keyed by folder identity.

use std::sync::Arc;

use crate::cache::MemoCache;
use crate::error::FsResult;
use crate::remote::{Children, Folder, RemoteApi};

/// Memoized `list_children` calls.
pub struct ChildrenCache {
    remote: Arc<dyn RemoteApi>,
    cache: MemoCache<u64, Arc<Children>>,
}

impl ChildrenCache {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            remote,
            cache: MemoCache::new(),
        }
    }

    /// Subfolders and files of `folder`, fetched at most once per generation.
    pub async fn children(&self, folder: &Folder) -> FsResult<Arc<Children>> {
        if let Some(hit) = self.cache.get(&folder.id) {
            return Ok(hit);
        }

        let generation = self.cache.generation();
        tracing::debug!(folder = folder.id, name = %folder.name, "listing folder");
        let children = Arc::new(self.remote.list_children(folder).await?);
        self.cache
            .insert_if_current(generation, folder.id, Arc::clone(&children));
        Ok(children)
    }

    /// Drop every cached listing.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemote;

    #[tokio::test]
    async fn test_listing_cached_until_invalidated() {
        let remote = Arc::new(MemoryRemote::new(1, "Me"));
        let course = remote.add_course(10, "CS101");
        remote.add_file(course.kind, "notes.txt", b"x".to_vec());
        let root = remote.resolve(&course, &[]).await.unwrap().remove(0);
        remote.reset_calls();

        let cache = ChildrenCache::new(remote.clone());
        let first = cache.children(&root).await.unwrap();
        let second = cache.children(&root).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(remote.calls().list_children, 1);

        cache.invalidate_all();
        cache.children(&root).await.unwrap();
        assert_eq!(remote.calls().list_children, 2);
    }
}
