//! Remote content store capability surface.
//!
//! The engine never talks HTTP itself. Everything it needs from the
//! remote side goes through [`RemoteApi`]:
//!
//! - [`MemoryRemote`] - In-memory store (for tests and demo mode)
//! - `CanvasClient` (in `canvasfs-canvas`) - Canvas LMS REST API

mod memory;
mod model;

pub use memory::{CallCounts, MemoryRemote};
pub use model::{Children, File, Folder, ResourceScope, ScopeKind};

use async_trait::async_trait;
use thiserror::Error;

/// Remote failure, split by whether the resource is known to be absent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote reports the resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport, decoding, or server failure.
    #[error("{0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Create a NotFound error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create an Unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Remote result type.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Operations the engine needs from the remote store.
///
/// Calls are awaited one at a time by the engine; implementations are
/// free to block on network I/O for as long as their own deadline allows.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Course scopes, in the order the remote enumerates them.
    async fn courses(&self) -> RemoteResult<Vec<ResourceScope>>;

    /// The account's personal scope.
    async fn personal_scope(&self) -> RemoteResult<ResourceScope>;

    /// Resolve `segments` under `scope` to the chain of folders from the
    /// scope's root folder to the target, inclusive of both.
    ///
    /// An empty `segments` slice resolves to the root folder alone.
    async fn resolve(&self, scope: &ResourceScope, segments: &[String])
        -> RemoteResult<Vec<Folder>>;

    /// Subfolders and files directly under `folder`.
    async fn list_children(&self, folder: &Folder) -> RemoteResult<Children>;

    /// Complete byte content of `file`.
    async fn fetch_content(&self, file: &File) -> RemoteResult<Vec<u8>>;

    /// Create a folder named `name` under `parent`.
    async fn create_folder(&self, parent: &Folder, name: &str) -> RemoteResult<Folder>;

    /// Delete `folder`.
    async fn delete_folder(&self, folder: &Folder) -> RemoteResult<()>;
}
