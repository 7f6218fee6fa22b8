//! Folder creation and deletion.
//!
//! A successful remote mutation is followed by a whole-cache invalidation.
//! The two steps are not atomic: if the process dies in between, nothing
//! stale survives because nothing is persisted.

use std::sync::Arc;

use crate::children::ChildrenCache;
use crate::error::{FsError, FsResult};
use crate::namespace::ResourceNamespace;
use crate::path::VirtualPath;
use crate::remote::{RemoteApi, ResourceScope};
use crate::resolver::PathResolver;

/// Applies folder mutations and invalidates caches afterwards.
pub struct MutationService {
    namespace: Arc<ResourceNamespace>,
    resolver: Arc<PathResolver>,
    children: Arc<ChildrenCache>,
    remote: Arc<dyn RemoteApi>,
}

impl MutationService {
    pub fn new(
        namespace: Arc<ResourceNamespace>,
        resolver: Arc<PathResolver>,
        children: Arc<ChildrenCache>,
        remote: Arc<dyn RemoteApi>,
    ) -> Self {
        Self {
            namespace,
            resolver,
            children,
            remote,
        }
    }

    /// Create the folder named by the last segment of `path`.
    ///
    /// Top-level paths have no parent folder to create in and fail with
    /// `NotFound`, as does a parent that does not resolve.
    pub async fn create_folder(&self, path: &VirtualPath) -> FsResult<()> {
        let (scope, rest) = self.scoped(path)?;
        let Some((parent_path, name)) = rest.split_leaf() else {
            return Err(FsError::not_found(path.to_string()));
        };

        let parent_chain = self.resolver.resolve(scope, &parent_path).await?;
        let parent = parent_chain
            .last()
            .ok_or_else(|| FsError::not_found(path.to_string()))?;

        let created = self.remote.create_folder(parent, name).await?;
        tracing::info!(path = %path, id = created.id, "created folder");
        self.invalidate_all();
        Ok(())
    }

    /// Delete the folder at `path`. Scope roots cannot be deleted.
    pub async fn delete_folder(&self, path: &VirtualPath) -> FsResult<()> {
        let (scope, rest) = self.scoped(path)?;
        if rest.is_root() {
            return Err(FsError::invalid_path(path.to_string()));
        }

        let chain = self.resolver.resolve(scope, &rest).await?;
        let folder = chain
            .last()
            .ok_or_else(|| FsError::not_found(path.to_string()))?;

        self.remote.delete_folder(folder).await?;
        tracing::info!(path = %path, id = folder.id, "deleted folder");
        self.invalidate_all();
        Ok(())
    }

    /// Discard every cached resolution and listing.
    pub fn invalidate_all(&self) {
        self.resolver.invalidate_all();
        self.children.invalidate_all();
    }

    fn scoped(&self, path: &VirtualPath) -> FsResult<(&ResourceScope, VirtualPath)> {
        let (scope_name, rest) = path
            .split_scope()
            .ok_or_else(|| FsError::invalid_path(path.to_string()))?;
        Ok((self.namespace.lookup(scope_name)?, rest))
    }
}
