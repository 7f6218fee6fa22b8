//! Virtual path parsing.
//!
//! A virtual path is `/`-separated. Its first segment names a resource
//! scope and the rest is the path inside that scope.

use crate::error::{FsError, FsResult};

/// A normalized virtual path: no empty segments, no `.`, no `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    /// Parse and normalize `path`.
    ///
    /// Empty segments and `.` are dropped. `..` is rejected rather than
    /// resolved, since the remote side has no notion of it.
    pub fn parse(path: &str) -> FsResult<Self> {
        let mut segments = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(FsError::invalid_path(path)),
                s => segments.push(s.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// Build from already-normalized segments.
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// True for `/`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Split into the scope name and the intra-scope remainder.
    ///
    /// Returns `None` for the root path.
    pub fn split_scope(&self) -> Option<(&str, VirtualPath)> {
        let (first, rest) = self.segments.split_first()?;
        Some((first.as_str(), VirtualPath::from_segments(rest.to_vec())))
    }

    /// Split into the parent path and the last segment.
    ///
    /// Returns `None` for the root path.
    pub fn split_leaf(&self) -> Option<(VirtualPath, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((VirtualPath::from_segments(parent.to_vec()), last.as_str()))
    }

    /// Canonical string form, used as a cache key (`a/b/c`, no leading slash).
    pub fn key(&self) -> String {
        self.segments.join("/")
    }
}

impl std::fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
