//! Remote entities as snapshotted at fetch time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of remote root a scope is, and its remote id.
///
/// This is the scope's identity: two scopes with the same kind are the same
/// scope, whatever their display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    /// A course the account is enrolled in.
    Course(u64),
    /// The account's personal files.
    Personal(u64),
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Course(id) => write!(f, "course:{id}"),
            ScopeKind::Personal(id) => write!(f, "user:{id}"),
        }
    }
}

/// One top-level namespace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceScope {
    pub kind: ScopeKind,
    /// Display name, used as the first path segment.
    pub name: String,
}

impl ResourceScope {
    /// Create a course scope.
    pub fn course(id: u64, name: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Course(id),
            name: name.into(),
        }
    }

    /// Create a personal scope.
    pub fn personal(user_id: u64, name: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Personal(user_id),
            name: name.into(),
        }
    }
}

/// A remote folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub files_count: u64,
    pub folders_count: u64,
}

/// A remote file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: u64,
    pub display_name: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Download location, if the remote exposes one.
    #[serde(default)]
    pub url: Option<String>,
}

/// Immediate children of a folder, in remote listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children {
    pub folders: Vec<Folder>,
    pub files: Vec<File>,
}

impl Children {
    /// Subfolder names followed by file display names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.folders
            .iter()
            .map(|f| f.name.as_str())
            .chain(self.files.iter().map(|f| f.display_name.as_str()))
    }

    /// First file whose display name matches exactly.
    pub fn file_named(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.display_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: u64, name: &str) -> File {
        let t = DateTime::<Utc>::UNIX_EPOCH;
        File {
            id,
            display_name: name.to_string(),
            size: 0,
            created_at: t,
            updated_at: t,
            modified_at: t,
            url: None,
        }
    }

    #[test]
    fn test_file_named_first_match_wins() {
        let children = Children {
            folders: Vec::new(),
            files: vec![file(1, "a.pdf"), file(2, "A.pdf"), file(3, "a.pdf")],
        };
        assert_eq!(children.file_named("a.pdf").map(|f| f.id), Some(1));
        assert_eq!(children.file_named("A.pdf").map(|f| f.id), Some(2));
        assert!(children.file_named("b.pdf").is_none());
    }

    #[test]
    fn test_scope_kind_display() {
        assert_eq!(ScopeKind::Course(7).to_string(), "course:7");
        assert_eq!(ScopeKind::Personal(3).to_string(), "user:3");
    }
}
