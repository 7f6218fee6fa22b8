//! In-memory remote store.
//!
//! Used for testing and the CLI's demo mode. All data is ephemeral.
//! Every trait call is counted so tests can tell cache hits from misses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::model::{Children, File, Folder, ResourceScope, ScopeKind};
use super::{RemoteApi, RemoteError, RemoteResult};

/// Name of the root folder created for every scope.
const ROOT_FOLDER_NAME: &str = "files";

/// Number of calls made to each [`RemoteApi`] operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub courses: u64,
    pub personal_scope: u64,
    pub resolve: u64,
    pub list_children: u64,
    pub fetch_content: u64,
    pub create_folder: u64,
    pub delete_folder: u64,
}

impl CallCounts {
    /// Total calls across all operations.
    pub fn total(&self) -> u64 {
        self.courses
            + self.personal_scope
            + self.resolve
            + self.list_children
            + self.fetch_content
            + self.create_folder
            + self.delete_folder
    }
}

#[derive(Debug, Clone)]
struct FolderNode {
    id: u64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    parent: Option<u64>,
    folders: Vec<u64>,
    files: Vec<File>,
}

impl FolderNode {
    fn snapshot(&self) -> Folder {
        Folder {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            files_count: self.files.len() as u64,
            folders_count: self.folders.len() as u64,
        }
    }
}

#[derive(Debug)]
struct State {
    courses: Vec<ResourceScope>,
    personal: ResourceScope,
    roots: HashMap<ScopeKind, u64>,
    folders: HashMap<u64, FolderNode>,
    contents: HashMap<u64, Vec<u8>>,
    next_id: u64,
    calls: CallCounts,
    failure: Option<String>,
}

impl State {
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn new_folder(&mut self, name: &str, parent: Option<u64>) -> u64 {
        let id = self.alloc_id();
        let now = Utc::now();
        self.folders.insert(
            id,
            FolderNode {
                id,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
                parent,
                folders: Vec::new(),
                files: Vec::new(),
            },
        );
        if let Some(parent) = parent.and_then(|p| self.folders.get_mut(&p)) {
            parent.folders.push(id);
            parent.updated_at = now;
        }
        id
    }

    fn ensure_root(&mut self, kind: ScopeKind) -> u64 {
        if let Some(id) = self.roots.get(&kind) {
            return *id;
        }
        let id = self.new_folder(ROOT_FOLDER_NAME, None);
        self.roots.insert(kind, id);
        id
    }

    fn child_folder(&self, parent: u64, name: &str) -> Option<u64> {
        let node = self.folders.get(&parent)?;
        node.folders
            .iter()
            .copied()
            .find(|id| self.folders.get(id).is_some_and(|f| f.name == name))
    }

    /// Walk `segments` from the scope root, returning node ids root-to-leaf.
    fn walk(&self, kind: ScopeKind, segments: &[String]) -> RemoteResult<Vec<u64>> {
        let root = *self
            .roots
            .get(&kind)
            .ok_or_else(|| RemoteError::not_found(kind.to_string()))?;
        let mut chain = vec![root];
        for segment in segments {
            let current = chain[chain.len() - 1];
            let next = self
                .child_folder(current, segment)
                .ok_or_else(|| RemoteError::not_found(segments.join("/")))?;
            chain.push(next);
        }
        Ok(chain)
    }

    fn check_failure(&self) -> RemoteResult<()> {
        match &self.failure {
            Some(msg) => Err(RemoteError::unavailable(msg.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory [`RemoteApi`] implementation.
///
/// Thread-safe via internal `RwLock`.
#[derive(Debug)]
pub struct MemoryRemote {
    state: RwLock<State>,
}

impl MemoryRemote {
    /// Create a store whose personal scope belongs to `user_name`.
    pub fn new(user_id: u64, user_name: impl Into<String>) -> Self {
        let personal = ResourceScope::personal(user_id, user_name);
        let mut state = State {
            courses: Vec::new(),
            personal: personal.clone(),
            roots: HashMap::new(),
            folders: HashMap::new(),
            contents: HashMap::new(),
            next_id: 1000,
            calls: CallCounts::default(),
            failure: None,
        };
        state.ensure_root(personal.kind);
        Self {
            state: RwLock::new(state),
        }
    }

    /// Add a course scope with an empty root folder.
    pub fn add_course(&self, id: u64, name: impl Into<String>) -> ResourceScope {
        let scope = ResourceScope::course(id, name);
        let mut state = self.state.write();
        state.ensure_root(scope.kind);
        state.courses.push(scope.clone());
        scope
    }

    /// The personal scope.
    pub fn personal(&self) -> ResourceScope {
        self.state.read().personal.clone()
    }

    /// Create every folder along `path` (slash-separated) under `kind`.
    ///
    /// Returns the id of the last folder.
    pub fn mkdir_p(&self, kind: ScopeKind, path: &str) -> u64 {
        let mut state = self.state.write();
        let mut current = state.ensure_root(kind);
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match state.child_folder(current, segment) {
                Some(id) => id,
                None => state.new_folder(segment, Some(current)),
            };
        }
        current
    }

    /// Add a file at `path` (slash-separated, last segment is the display
    /// name), creating parent folders as needed. Returns the file id.
    pub fn add_file(&self, kind: ScopeKind, path: &str, content: impl Into<Vec<u8>>) -> u64 {
        let (parent_path, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };
        let parent = self.mkdir_p(kind, parent_path);
        let content = content.into();

        let mut state = self.state.write();
        let id = state.alloc_id();
        let now = Utc::now();
        let file = File {
            id,
            display_name: name.to_string(),
            size: content.len() as u64,
            created_at: now,
            updated_at: now,
            modified_at: now,
            url: Some(format!("memory://files/{id}")),
        };
        if let Some(node) = state.folders.get_mut(&parent) {
            node.files.push(file);
        }
        state.contents.insert(id, content);
        id
    }

    /// Make every subsequent call fail with `Unavailable(msg)`, or clear the
    /// failure with `None`.
    pub fn set_failure(&self, msg: Option<&str>) {
        self.state.write().failure = msg.map(str::to_string);
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        self.state.read().calls
    }

    /// Zero the call counters.
    pub fn reset_calls(&self) {
        self.state.write().calls = CallCounts::default();
    }
}

#[async_trait]
impl RemoteApi for MemoryRemote {
    async fn courses(&self) -> RemoteResult<Vec<ResourceScope>> {
        let mut state = self.state.write();
        state.calls.courses += 1;
        state.check_failure()?;
        Ok(state.courses.clone())
    }

    async fn personal_scope(&self) -> RemoteResult<ResourceScope> {
        let mut state = self.state.write();
        state.calls.personal_scope += 1;
        state.check_failure()?;
        Ok(state.personal.clone())
    }

    async fn resolve(
        &self,
        scope: &ResourceScope,
        segments: &[String],
    ) -> RemoteResult<Vec<Folder>> {
        let mut state = self.state.write();
        state.calls.resolve += 1;
        state.check_failure()?;

        let chain = state.walk(scope.kind, segments)?;
        Ok(chain
            .iter()
            .filter_map(|id| state.folders.get(id).map(FolderNode::snapshot))
            .collect())
    }

    async fn list_children(&self, folder: &Folder) -> RemoteResult<Children> {
        let mut state = self.state.write();
        state.calls.list_children += 1;
        state.check_failure()?;

        let node = state
            .folders
            .get(&folder.id)
            .ok_or_else(|| RemoteError::not_found(format!("folder {}", folder.id)))?;
        Ok(Children {
            folders: node
                .folders
                .iter()
                .filter_map(|id| state.folders.get(id).map(FolderNode::snapshot))
                .collect(),
            files: node.files.clone(),
        })
    }

    async fn fetch_content(&self, file: &File) -> RemoteResult<Vec<u8>> {
        let mut state = self.state.write();
        state.calls.fetch_content += 1;
        state.check_failure()?;

        state
            .contents
            .get(&file.id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("file {}", file.id)))
    }

    async fn create_folder(&self, parent: &Folder, name: &str) -> RemoteResult<Folder> {
        let mut state = self.state.write();
        state.calls.create_folder += 1;
        state.check_failure()?;

        if !state.folders.contains_key(&parent.id) {
            return Err(RemoteError::not_found(format!("folder {}", parent.id)));
        }
        if state.child_folder(parent.id, name).is_some() {
            return Err(RemoteError::unavailable(format!(
                "folder {name} already exists in {}",
                parent.id
            )));
        }
        let id = state.new_folder(name, Some(parent.id));
        state
            .folders
            .get(&id)
            .map(FolderNode::snapshot)
            .ok_or_else(|| RemoteError::unavailable("folder vanished after create"))
    }

    async fn delete_folder(&self, folder: &Folder) -> RemoteResult<()> {
        let mut state = self.state.write();
        state.calls.delete_folder += 1;
        state.check_failure()?;

        let node = state
            .folders
            .get(&folder.id)
            .ok_or_else(|| RemoteError::not_found(format!("folder {}", folder.id)))?;
        let Some(parent) = node.parent else {
            return Err(RemoteError::unavailable("cannot delete a root folder"));
        };
        if !node.folders.is_empty() || !node.files.is_empty() {
            return Err(RemoteError::unavailable(format!(
                "folder {} is not empty",
                folder.id
            )));
        }

        state.folders.remove(&folder.id);
        if let Some(parent) = state.folders.get_mut(&parent) {
            parent.folders.retain(|id| *id != folder.id);
            parent.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_chain_includes_root() {
        let remote = MemoryRemote::new(1, "Me");
        let course = remote.add_course(10, "CS101");
        remote.mkdir_p(course.kind, "a/b");

        let chain = remote.resolve(&course, &segments("a/b")).await.unwrap();
        let names: Vec<_> = chain.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec![ROOT_FOLDER_NAME, "a", "b"]);

        let root = remote.resolve(&course, &[]).await.unwrap();
        assert_eq!(root.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_file_name_is_not_found() {
        let remote = MemoryRemote::new(1, "Me");
        let course = remote.add_course(10, "CS101");
        remote.add_file(course.kind, "docs/readme.txt", b"hi".to_vec());

        let result = remote.resolve(&course, &segments("docs/readme.txt")).await;
        assert!(matches!(result, Err(RemoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_children_and_counts() {
        let remote = MemoryRemote::new(1, "Me");
        let course = remote.add_course(10, "CS101");
        remote.mkdir_p(course.kind, "docs/sub");
        remote.add_file(course.kind, "docs/readme.txt", b"hi".to_vec());

        let chain = remote.resolve(&course, &segments("docs")).await.unwrap();
        let docs = chain.last().unwrap();
        assert_eq!(docs.files_count, 1);
        assert_eq!(docs.folders_count, 1);

        let children = remote.list_children(docs).await.unwrap();
        assert_eq!(children.names().collect::<Vec<_>>(), vec!["sub", "readme.txt"]);

        let file = children.file_named("readme.txt").unwrap();
        assert_eq!(file.size, 2);
        assert_eq!(remote.fetch_content(file).await.unwrap(), b"hi");
    }

    #[tokio::test]
    async fn test_create_and_delete_folder() {
        let remote = MemoryRemote::new(1, "Me");
        let course = remote.add_course(10, "CS101");
        let root = remote.resolve(&course, &[]).await.unwrap().remove(0);

        let created = remote.create_folder(&root, "new").await.unwrap();
        assert_eq!(created.name, "new");
        assert!(remote.resolve(&course, &segments("new")).await.is_ok());

        remote.delete_folder(&created).await.unwrap();
        assert!(remote.resolve(&course, &segments("new")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_non_empty_fails() {
        let remote = MemoryRemote::new(1, "Me");
        let course = remote.add_course(10, "CS101");
        remote.add_file(course.kind, "docs/readme.txt", b"hi".to_vec());
        let docs = remote.resolve(&course, &segments("docs")).await.unwrap().pop().unwrap();

        let result = remote.delete_folder(&docs).await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_injected_failure_and_counters() {
        let remote = MemoryRemote::new(1, "Me");
        remote.add_course(10, "CS101");

        remote.courses().await.unwrap();
        remote.set_failure(Some("connection reset"));
        assert!(matches!(
            remote.courses().await,
            Err(RemoteError::Unavailable(_))
        ));
        assert_eq!(remote.calls().courses, 2);

        remote.reset_calls();
        assert_eq!(remote.calls().total(), 0);
    }
}
