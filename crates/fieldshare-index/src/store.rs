//! The content store abstraction.
//!
//! The directory tree is a filesystem-as-database with no transactions;
//! idempotent re-runs substitute for rollback. Putting the store behind a
//! trait keeps the orchestration testable against an in-memory fake.

use std::collections::BTreeMap;
use std::sync::RwLock;

use thiserror::Error;

/// Errors from the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage error: {0}")]
    Storage(String),
}

/// Keys are store-relative paths with `/` separators,
/// e.g. `alice/items/flickr/2020/123.yaml`.
pub trait ContentStore {
    /// Read a file. Absent files are `Ok(None)`, not an error.
    fn get(&self, path: &str) -> Result<Option<String>, StoreError>;

    /// Write a file, creating parent directories as needed.
    fn put(&self, path: &str, contents: &str) -> Result<(), StoreError>;

    /// All file paths under a prefix, recursively, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Immediate subdirectory names under a prefix, sorted.
    fn list_dirs(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// User directories at the store root: everything except hidden and
/// reserved (`_`-prefixed) entries.
pub fn list_users(store: &dyn ContentStore) -> Result<Vec<String>, StoreError> {
    Ok(store
        .list_dirs("")?
        .into_iter()
        .filter(|d| !d.starts_with('_') && !d.starts_with('.'))
        .collect())
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalized_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

impl ContentStore for MemStore {
    fn get(&self, path: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("poisoned lock".to_string()))?;
        Ok(entries.get(path).cloned())
    }

    fn put(&self, path: &str, contents: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Storage("poisoned lock".to_string()))?;
        entries.insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("poisoned lock".to_string()))?;
        let prefix = normalized_prefix(prefix);
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn list_dirs(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("poisoned lock".to_string()))?;
        let prefix = normalized_prefix(prefix);
        let mut dirs: Vec<String> = entries
            .keys()
            .filter_map(|k| {
                let rest = k.strip_prefix(&prefix)?;
                let (dir, _) = rest.split_once('/')?;
                Some(dir.to_string())
            })
            .collect();
        dirs.dedup();
        Ok(dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_none() {
        let store = MemStore::new();
        assert!(store.get("missing.yaml").unwrap().is_none());
    }

    #[test]
    fn put_then_get() {
        let store = MemStore::new();
        store.put("alice/profile.yaml", "name: Alice\n").unwrap();
        assert_eq!(
            store.get("alice/profile.yaml").unwrap().as_deref(),
            Some("name: Alice\n")
        );
    }

    #[test]
    fn list_is_recursive_and_sorted() {
        let store = MemStore::new();
        store.put("alice/items/flickr/2020/b.yaml", "b").unwrap();
        store.put("alice/items/flickr/2020/a.yaml", "a").unwrap();
        store.put("alice/profile.yaml", "p").unwrap();
        assert_eq!(
            store.list("alice/items").unwrap(),
            vec![
                "alice/items/flickr/2020/a.yaml",
                "alice/items/flickr/2020/b.yaml"
            ]
        );
    }

    #[test]
    fn list_dirs_returns_unique_children() {
        let store = MemStore::new();
        store.put("alice/profile.yaml", "p").unwrap();
        store.put("bob/profile.yaml", "p").unwrap();
        store.put("_collections/x/index.json", "{}").unwrap();
        assert_eq!(
            store.list_dirs("").unwrap(),
            vec!["_collections", "alice", "bob"]
        );
        assert_eq!(list_users(&store).unwrap(), vec!["alice", "bob"]);
    }
}
