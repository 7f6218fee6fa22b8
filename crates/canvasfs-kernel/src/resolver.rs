//! Path → folder chain resolution, memoized per scope and full path.

use std::sync::Arc;

use crate::cache::MemoCache;
use crate::error::{FsError, FsResult};
use crate::path::VirtualPath;
use crate::remote::{Folder, RemoteApi, RemoteError, ResourceScope, ScopeKind};

/// Folders from a scope's root to a target, root first.
pub type FolderChain = Arc<[Folder]>;

/// Cached outcome of one remote resolution.
#[derive(Debug, Clone)]
enum Resolution {
    Found(FolderChain),
    Missing,
}

/// Resolves intra-scope paths to folder chains.
///
/// Only exact `(scope, full path)` keys are cached. Resolving `a/b/c`
/// does not make `a/b` a hit. Transport failures are never cached.
pub struct PathResolver {
    remote: Arc<dyn RemoteApi>,
    cache: MemoCache<(ScopeKind, String), Resolution>,
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl PathResolver {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            remote,
            cache: MemoCache::new(),
        }
    }

    /// Resolve `path` inside `scope`.
    ///
    /// Fails with `NotFound` when the remote cannot resolve the path as a
    /// folder, and with `RemoteUnavailable` on transport failure.
    pub async fn resolve(&self, scope: &ResourceScope, path: &VirtualPath) -> FsResult<FolderChain> {
        let key = (scope.kind, path.key());

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(scope = %scope.kind, path = %path, "resolve cache hit");
            return Self::into_result(hit, scope, path);
        }

        let generation = self.cache.generation();
        tracing::debug!(scope = %scope.kind, path = %path, "resolve cache miss");

        let resolution = match self.remote.resolve(scope, path.segments()).await {
            Ok(chain) => Resolution::Found(chain.into()),
            Err(RemoteError::NotFound(_)) => Resolution::Missing,
            Err(e) => return Err(e.into()),
        };

        if !self.cache.insert_if_current(generation, key, resolution.clone()) {
            tracing::debug!(path = %path, "resolution raced an invalidation, not cached");
        }
        Self::into_result(resolution, scope, path)
    }

    /// Drop every cached resolution.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        tracing::debug!("resolution cache invalidated");
    }

    /// Number of cached resolutions, positive and negative.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn into_result(
        resolution: Resolution,
        scope: &ResourceScope,
        path: &VirtualPath,
    ) -> FsResult<FolderChain> {
        match resolution {
            Resolution::Found(chain) => Ok(chain),
            Resolution::Missing if path.is_root() => Err(FsError::not_found(format!("/{}", scope.name))),
            Resolution::Missing => Err(FsError::not_found(format!("/{}{}", scope.name, path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemote;

    fn setup() -> (Arc<MemoryRemote>, ResourceScope, PathResolver) {
        let remote = Arc::new(MemoryRemote::new(1, "Me"));
        let course = remote.add_course(10, "CS101");
        remote.mkdir_p(course.kind, "Lecture Slides/week1");
        let resolver = PathResolver::new(remote.clone());
        (remote, course, resolver)
    }

    fn path(s: &str) -> VirtualPath {
        VirtualPath::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_second_resolve_is_cache_hit() {
        let (remote, course, resolver) = setup();

        let first = resolver.resolve(&course, &path("Lecture Slides")).await.unwrap();
        let second = resolver.resolve(&course, &path("/Lecture Slides/")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(remote.calls().resolve, 1);
    }

    #[tokio::test]
    async fn test_sub_paths_not_cached_transitively() {
        let (remote, course, resolver) = setup();

        resolver.resolve(&course, &path("Lecture Slides/week1")).await.unwrap();
        resolver.resolve(&course, &path("Lecture Slides")).await.unwrap();

        assert_eq!(remote.calls().resolve, 2);
    }

    #[tokio::test]
    async fn test_not_found_is_cached() {
        let (remote, course, resolver) = setup();

        for _ in 0..2 {
            let result = resolver.resolve(&course, &path("missing")).await;
            assert!(matches!(result, Err(FsError::NotFound(_))));
        }
        assert_eq!(remote.calls().resolve, 1);
    }

    #[tokio::test]
    async fn test_transport_failure_not_cached() {
        let (remote, course, resolver) = setup();

        remote.set_failure(Some("timed out"));
        let result = resolver.resolve(&course, &path("Lecture Slides")).await;
        assert!(matches!(result, Err(FsError::RemoteUnavailable(_))));

        remote.set_failure(None);
        assert!(resolver.resolve(&course, &path("Lecture Slides")).await.is_ok());
        assert_eq!(remote.calls().resolve, 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (remote, course, resolver) = setup();

        resolver.resolve(&course, &path("")).await.unwrap();
        resolver.invalidate_all();
        assert_eq!(resolver.cached(), 0);

        resolver.resolve(&course, &path("")).await.unwrap();
        assert_eq!(remote.calls().resolve, 2);
    }

    #[tokio::test]
    async fn test_scopes_do_not_share_entries() {
        let (remote, course, resolver) = setup();
        let other = remote.add_course(11, "CS102");

        resolver.resolve(&course, &path("")).await.unwrap();
        resolver.resolve(&other, &path("")).await.unwrap();

        assert_eq!(remote.calls().resolve, 2);
    }
}
