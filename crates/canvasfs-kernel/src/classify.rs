//! Folder-or-file disambiguation.
//!
//! The remote has no stat-by-path call. A path is a folder if it resolves
//! as one; otherwise it is a file if its parent resolves and lists a file
//! with that exact display name.

use std::sync::Arc;

use crate::children::ChildrenCache;
use crate::error::{FsError, FsResult};
use crate::namespace::ResourceNamespace;
use crate::path::VirtualPath;
use crate::remote::{File, ResourceScope};
use crate::resolver::{FolderChain, PathResolver};

/// What a path inside a scope denotes.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A folder, with its chain from the scope root.
    Folder(FolderChain),
    /// A file, with the chain of its parent folder.
    File { file: File, parent: FolderChain },
    /// Neither.
    NotFound,
}

/// What a full virtual path denotes.
#[derive(Debug, Clone)]
pub enum Located<'a> {
    /// The synthetic `/`.
    Root,
    /// Something inside a scope.
    Scoped {
        scope: &'a ResourceScope,
        entry: Entry,
    },
}

/// Classifies paths using the resolver and the listing cache.
pub struct EntryClassifier {
    namespace: Arc<ResourceNamespace>,
    resolver: Arc<PathResolver>,
    children: Arc<ChildrenCache>,
}

impl EntryClassifier {
    pub fn new(
        namespace: Arc<ResourceNamespace>,
        resolver: Arc<PathResolver>,
        children: Arc<ChildrenCache>,
    ) -> Self {
        Self {
            namespace,
            resolver,
            children,
        }
    }

    /// Classify `path` inside `scope`.
    ///
    /// Only a `NotFound` from folder resolution falls through to the file
    /// probe; transport failures propagate.
    pub async fn classify(&self, scope: &ResourceScope, path: &VirtualPath) -> FsResult<Entry> {
        match self.resolver.resolve(scope, path).await {
            Ok(chain) if !chain.is_empty() => return Ok(Entry::Folder(chain)),
            Ok(_) => return Ok(Entry::NotFound),
            Err(FsError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let Some((parent_path, name)) = path.split_leaf() else {
            return Ok(Entry::NotFound);
        };

        let parent = match self.resolver.resolve(scope, &parent_path).await {
            Ok(chain) => chain,
            Err(FsError::NotFound(_)) => return Ok(Entry::NotFound),
            Err(e) => return Err(e),
        };
        let Some(folder) = parent.last() else {
            return Ok(Entry::NotFound);
        };

        let children = self.children.children(folder).await?;
        Ok(match children.file_named(name) {
            Some(file) => Entry::File {
                file: file.clone(),
                parent,
            },
            None => Entry::NotFound,
        })
    }

    /// Classify a full virtual path, starting from its scope segment.
    ///
    /// An unknown scope name fails with `NotFound`.
    pub async fn locate(&self, path: &VirtualPath) -> FsResult<Located<'_>> {
        let Some((scope_name, rest)) = path.split_scope() else {
            return Ok(Located::Root);
        };
        let scope = self.namespace.lookup(scope_name)?;
        let entry = self.classify(scope, &rest).await?;
        Ok(Located::Scoped { scope, entry })
    }

    pub fn namespace(&self) -> &ResourceNamespace {
        &self.namespace
    }

    pub fn children(&self) -> &ChildrenCache {
        &self.children
    }
}
