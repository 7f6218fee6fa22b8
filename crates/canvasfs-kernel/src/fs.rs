//! The assembled filesystem.
//!
//! Wires the namespace, resolver, classifier and services around one
//! [`RemoteApi`] and exposes them through [`VfsOps`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::attr::AttributeService;
use crate::children::ChildrenCache;
use crate::classify::EntryClassifier;
use crate::dir::DirectoryService;
use crate::error::FsResult;
use crate::handles::FileHandleTable;
use crate::mutation::MutationService;
use crate::namespace::ResourceNamespace;
use crate::ops::VfsOps;
use crate::path::VirtualPath;
use crate::remote::RemoteApi;
use crate::resolver::PathResolver;
use crate::types::{AttrOptions, FileAttr, StatFs};

/// Remote content store presented as a filesystem.
pub struct CanvasFs {
    namespace: Arc<ResourceNamespace>,
    resolver: Arc<PathResolver>,
    attributes: AttributeService,
    directories: DirectoryService,
    handles: FileHandleTable,
    mutations: MutationService,
}

impl std::fmt::Debug for CanvasFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasFs")
            .field("roots", &self.namespace.len())
            .field("resolver", &self.resolver)
            .field("open_files", &self.handles.open_count())
            .finish()
    }
}

impl CanvasFs {
    /// Enumerate the remote's scopes and build the filesystem.
    pub async fn mount(remote: Arc<dyn RemoteApi>, options: AttrOptions) -> FsResult<Self> {
        let namespace = ResourceNamespace::load(remote.as_ref()).await?;
        Ok(Self::with_namespace(remote, namespace, options))
    }

    /// Build the filesystem over an already-loaded namespace.
    pub fn with_namespace(
        remote: Arc<dyn RemoteApi>,
        namespace: ResourceNamespace,
        options: AttrOptions,
    ) -> Self {
        let namespace = Arc::new(namespace);
        let resolver = Arc::new(PathResolver::new(Arc::clone(&remote)));
        let children = Arc::new(ChildrenCache::new(Arc::clone(&remote)));
        let classifier = Arc::new(EntryClassifier::new(
            Arc::clone(&namespace),
            Arc::clone(&resolver),
            Arc::clone(&children),
        ));

        Self {
            attributes: AttributeService::new(Arc::clone(&classifier), options),
            directories: DirectoryService::new(Arc::clone(&classifier)),
            handles: FileHandleTable::new(Arc::clone(&classifier), Arc::clone(&remote)),
            mutations: MutationService::new(
                Arc::clone(&namespace),
                Arc::clone(&resolver),
                children,
                remote,
            ),
            namespace,
            resolver,
        }
    }

    /// The top-level scope mapping.
    pub fn namespace(&self) -> &ResourceNamespace {
        &self.namespace
    }

    /// Discard every cached resolution and listing.
    pub fn invalidate_caches(&self) {
        self.mutations.invalidate_all();
    }

    /// Number of cached path resolutions.
    pub fn cached_resolutions(&self) -> usize {
        self.resolver.cached()
    }
}

#[async_trait]
impl VfsOps for CanvasFs {
    async fn getattr(&self, path: &str) -> FsResult<FileAttr> {
        let path = VirtualPath::parse(path)?;
        tracing::debug!(path = %path, "getattr");
        self.attributes.get_attributes(&path).await
    }

    async fn getxattr(&self, _path: &str, name: &str) -> FsResult<Vec<u8>> {
        self.attributes.get_extended_attribute(name)
    }

    async fn statfs(&self, _path: &str) -> FsResult<StatFs> {
        Ok(StatFs::default())
    }

    async fn readdir(&self, path: &str) -> FsResult<Vec<String>> {
        let path = VirtualPath::parse(path)?;
        tracing::debug!(path = %path, "readdir");
        self.directories.list_directory(&path).await
    }

    async fn open(&self, path: &str, flags: i32) -> FsResult<u64> {
        let path = VirtualPath::parse(path)?;
        tracing::debug!(path = %path, flags, "open");
        self.handles.open(&path).await
    }

    async fn read(&self, path: &str, fh: u64, offset: u64, size: u32) -> FsResult<Vec<u8>> {
        let path = VirtualPath::parse(path)?;
        self.handles.read(&path, fh, offset, size)
    }

    async fn release(&self, path: &str, fh: u64) -> FsResult<()> {
        let path = VirtualPath::parse(path)?;
        self.handles.release(&path, fh)
    }

    async fn mkdir(&self, path: &str, _mode: u32) -> FsResult<()> {
        let path = VirtualPath::parse(path)?;
        self.mutations.create_folder(&path).await
    }

    async fn rmdir(&self, path: &str) -> FsResult<()> {
        let path = VirtualPath::parse(path)?;
        self.mutations.delete_folder(&path).await
    }
}
