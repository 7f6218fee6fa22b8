//! # canvasfs-kernel
//!
//! Path resolution and caching engine that presents a remote, course-scoped
//! folder store as a filesystem tree.
//!
//! ```text
//! /                         synthetic root, one entry per scope
//! ├── CS101/                course scope → course root folder
//! │   └── Lecture Slides/   folder (resolved remotely, memoized)
//! │       └── week1.pdf     file (found in parent's listing)
//! └── Ada Lovelace/         personal scope
//! ```
//!
//! Key components:
//!
//! - [`ResourceNamespace`] - Root name → scope, built once at mount
//! - [`PathResolver`] - Scope + path → folder chain, memoized
//! - [`EntryClassifier`] - Folder-or-file disambiguation
//! - [`AttributeService`], [`DirectoryService`] - getattr / readdir
//! - [`FileHandleTable`] - open / read / release over buffered content
//! - [`MutationService`] - mkdir / rmdir with cache invalidation
//! - [`CanvasFs`] - All of the above behind [`VfsOps`]
//!
//! ## Concurrency
//!
//! Every cache and the handle table owns its own lock, and no lock is held
//! across a remote call, so `CanvasFs` may be driven from a concurrent
//! dispatcher. Invalidation bumps a generation so a lookup that was already
//! in flight cannot repopulate a cache with pre-mutation results.

pub mod attr;
mod cache;
pub mod children;
pub mod classify;
pub mod dir;
mod error;
pub mod fs;
pub mod handles;
pub mod mutation;
pub mod namespace;
mod ops;
pub mod path;
pub mod remote;
pub mod resolver;
mod types;

pub use attr::AttributeService;
pub use children::ChildrenCache;
pub use classify::{Entry, EntryClassifier, Located};
pub use dir::DirectoryService;
pub use error::{FsError, FsResult};
pub use fs::CanvasFs;
pub use handles::FileHandleTable;
pub use mutation::MutationService;
pub use namespace::ResourceNamespace;
pub use ops::VfsOps;
pub use path::VirtualPath;
pub use remote::{
    Children, File, Folder, MemoryRemote, RemoteApi, RemoteError, RemoteResult, ResourceScope,
    ScopeKind,
};
pub use resolver::{FolderChain, PathResolver};
pub use types::{AttrOptions, FileAttr, FileType, ROOT_INO, StatFs};
