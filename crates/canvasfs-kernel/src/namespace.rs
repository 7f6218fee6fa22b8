//! Top-level namespace: root name → resource scope.
//!
//! Built once at mount time and never mutated. Courses that appear or
//! disappear mid-session are not picked up until the next mount.

use indexmap::IndexMap;

use crate::error::{FsError, FsResult};
use crate::remote::{RemoteApi, ResourceScope};

/// Maps each top-level directory name to the scope it exposes.
#[derive(Debug, Clone, Default)]
pub struct ResourceNamespace {
    roots: IndexMap<String, ResourceScope>,
}

impl ResourceNamespace {
    /// Enumerate the remote's courses plus the personal scope.
    pub async fn load(remote: &dyn RemoteApi) -> FsResult<Self> {
        let mut scopes = remote.courses().await?;
        scopes.push(remote.personal_scope().await?);
        let namespace = Self::from_scopes(scopes);
        tracing::info!(roots = namespace.len(), "loaded resource namespace");
        Ok(namespace)
    }

    /// Build from scopes in enumeration order.
    ///
    /// When two scopes share a display name the later one wins; the name
    /// keeps the position where it first appeared.
    pub fn from_scopes(scopes: impl IntoIterator<Item = ResourceScope>) -> Self {
        let mut roots = IndexMap::new();
        for scope in scopes {
            if let Some(previous) = roots.insert(scope.name.clone(), scope) {
                tracing::warn!(
                    name = %previous.name,
                    replaced = %previous.kind,
                    "duplicate root name, later scope wins"
                );
            }
        }
        Self { roots }
    }

    /// Look up a scope by its root name.
    pub fn lookup(&self, name: &str) -> FsResult<&ResourceScope> {
        self.roots
            .get(name)
            .ok_or_else(|| FsError::not_found(format!("/{name}")))
    }

    /// Root names, in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    /// The full mapping.
    pub fn roots(&self) -> &IndexMap<String, ResourceScope> {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryRemote, ScopeKind};

    #[tokio::test]
    async fn test_load_courses_then_personal() {
        let remote = MemoryRemote::new(1, "Ada Lovelace");
        remote.add_course(10, "CS101");
        remote.add_course(11, "CS102");

        let ns = ResourceNamespace::load(&remote).await.unwrap();
        assert_eq!(
            ns.names().collect::<Vec<_>>(),
            vec!["CS101", "CS102", "Ada Lovelace"]
        );
        assert_eq!(ns.lookup("CS102").unwrap().kind, ScopeKind::Course(11));
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let ns = ResourceNamespace::from_scopes([
            ResourceScope::course(1, "Math"),
            ResourceScope::course(2, "Physics"),
            ResourceScope::course(3, "Math"),
        ]);
        assert_eq!(ns.len(), 2);
        assert_eq!(ns.names().collect::<Vec<_>>(), vec!["Math", "Physics"]);
        assert_eq!(ns.lookup("Math").unwrap().kind, ScopeKind::Course(3));

        let roots: Vec<_> = ns
            .roots()
            .iter()
            .map(|(name, scope)| (name.as_str(), scope.kind))
            .collect();
        assert_eq!(
            roots,
            vec![("Math", ScopeKind::Course(3)), ("Physics", ScopeKind::Course(2))]
        );
    }

    #[test]
    fn test_lookup_missing() {
        let ns = ResourceNamespace::from_scopes([ResourceScope::course(1, "Math")]);
        assert!(matches!(ns.lookup("Art"), Err(FsError::NotFound(_))));
    }
}
