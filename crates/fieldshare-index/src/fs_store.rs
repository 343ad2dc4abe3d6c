//! Filesystem-backed content store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::store::{ContentStore, StoreError};

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            full.push(segment);
        }
        full
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<&str> = rel.iter().filter_map(|s| s.to_str()).collect();
        Some(segments.join("/"))
    }
}

fn io_error(path: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_string(),
        source,
    }
}

impl ContentStore for FsStore {
    fn get(&self, path: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.resolve(path)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, e)),
        }
    }

    fn put(&self, path: &str, contents: &str) -> Result<(), StoreError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }
        fs::write(&full, contents).map_err(|e| io_error(path, e))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.resolve(prefix);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if entry.file_type().is_file() {
                if let Some(rel) = self.relative(entry.path()) {
                    files.push(rel);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    fn list_dirs(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.resolve(prefix);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_error(prefix, e))? {
            let entry = entry.map_err(|e| io_error(prefix, e))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    dirs.push(name.to_string());
                }
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::list_users;
    use tempfile::TempDir;

    #[test]
    fn round_trip_and_listing() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());

        store
            .put("alice/items/flickr/2020/a.yaml", "tags:\n  - night\n")
            .unwrap();
        store.put("alice/profile.yaml", "name: Alice\n").unwrap();
        store.put("_collections/index.json", "{}").unwrap();

        assert_eq!(
            store.get("alice/profile.yaml").unwrap().as_deref(),
            Some("name: Alice\n")
        );
        assert!(store.get("alice/missing.yaml").unwrap().is_none());

        assert_eq!(
            store.list("alice").unwrap(),
            vec!["alice/items/flickr/2020/a.yaml", "alice/profile.yaml"]
        );
        assert_eq!(list_users(&store).unwrap(), vec!["alice"]);
    }

    #[test]
    fn listing_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());
        assert!(store.list("nobody/items").unwrap().is_empty());
        assert!(store.list_dirs("nobody").unwrap().is_empty());
    }
}
