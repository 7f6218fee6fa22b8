//! Directory listings.

use std::sync::Arc;

use crate::classify::{Entry, EntryClassifier, Located};
use crate::error::{FsError, FsResult};
use crate::path::VirtualPath;

/// Produces ordered child-name listings.
pub struct DirectoryService {
    classifier: Arc<EntryClassifier>,
}

impl DirectoryService {
    pub fn new(classifier: Arc<EntryClassifier>) -> Self {
        Self { classifier }
    }

    /// `.`, `..`, then subfolder names, then file display names, in remote
    /// listing order. The root lists one name per scope.
    pub async fn list_directory(&self, path: &VirtualPath) -> FsResult<Vec<String>> {
        let mut names = vec![".".to_string(), "..".to_string()];

        let chain = match self.classifier.locate(path).await? {
            Located::Root => {
                names.extend(self.classifier.namespace().names().map(str::to_string));
                return Ok(names);
            }
            Located::Scoped { entry, .. } => match entry {
                Entry::Folder(chain) => chain,
                Entry::File { .. } => return Err(FsError::not_a_directory(path.to_string())),
                Entry::NotFound => return Err(FsError::not_found(path.to_string())),
            },
        };

        let folder = chain
            .last()
            .ok_or_else(|| FsError::not_found(path.to_string()))?;
        let children = self.classifier.children().children(folder).await?;
        names.extend(children.names().map(str::to_string));
        Ok(names)
    }
}
