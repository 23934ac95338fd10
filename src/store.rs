//! Persistent summary storage

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Summary text keyed by `(path, is_directory)`.
///
/// A file and a directory may share a path without colliding.
pub trait SummaryStore {
    /// Write (or overwrite) the summary for a path.
    fn store(&mut self, path: &Path, summary: &str, is_directory: bool) -> Result<()>;

    /// Read a stored summary; fails with [`Error::SummaryNotFound`] if absent.
    fn fetch(&self, path: &Path, is_directory: bool) -> Result<String>;

    fn contains(&self, path: &Path, is_directory: bool) -> bool;
}

/// Default name of the file holding a directory's own summary.
pub const DIR_SUMMARY_FILE: &str = "_dir_summary.md";

const FILE_SUMMARY_EXTENSION: &str = ".md";

/// Mirrors the summarized tree under an output directory.
///
/// File `a/b.py` is stored at `<root>/a/b.py.md`; directory `a` at
/// `<root>/a/_dir_summary.md`; the tree root at `<root>/_dir_summary.md`.
///
/// A file `x` and a sibling directory `x.md` both claim `<root>/x.md`. The
/// layout cannot hold both, so whichever is stored second fails with
/// [`Error::Io`]; nothing is overwritten.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    dir_file_name: String,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if root.to_string_lossy().trim().is_empty() {
            return Err(Error::EmptyStoreRoot);
        }
        if !root.exists() {
            debug!("creating summary root {}", root.display());
            fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;
        }
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            dir_file_name: DIR_SUMMARY_FILE.to_string(),
        })
    }

    /// Use `name` instead of [`DIR_SUMMARY_FILE`] for directory summaries.
    pub fn with_dir_file_name(mut self, name: impl Into<String>) -> Self {
        self.dir_file_name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the summary for a path.
    pub fn summary_path(&self, path: &Path, is_directory: bool) -> PathBuf {
        let base = self.root.join(path);
        if is_directory {
            base.join(&self.dir_file_name)
        } else {
            let mut name = OsString::from(base);
            name.push(FILE_SUMMARY_EXTENSION);
            PathBuf::from(name)
        }
    }
}

impl SummaryStore for FileStore {
    fn store(&mut self, path: &Path, summary: &str, is_directory: bool) -> Result<()> {
        let target = self.summary_path(path, is_directory);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&target, summary).map_err(|e| Error::io(&target, e))?;
        debug!("stored summary at {}", target.display());
        Ok(())
    }

    fn fetch(&self, path: &Path, is_directory: bool) -> Result<String> {
        let target = self.summary_path(path, is_directory);
        fs::read_to_string(&target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::SummaryNotFound {
                path: path.to_path_buf(),
                is_directory,
            },
            _ => Error::io(&target, e),
        })
    }

    fn contains(&self, path: &Path, is_directory: bool) -> bool {
        self.summary_path(path, is_directory).is_file()
    }
}

/// In-memory store, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<(PathBuf, bool), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records as `((path, is_directory), summary)`.
    pub fn records(&self) -> &BTreeMap<(PathBuf, bool), String> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SummaryStore for MemoryStore {
    fn store(&mut self, path: &Path, summary: &str, is_directory: bool) -> Result<()> {
        self.records
            .insert((path.to_path_buf(), is_directory), summary.to_string());
        Ok(())
    }

    fn fetch(&self, path: &Path, is_directory: bool) -> Result<String> {
        self.records
            .get(&(path.to_path_buf(), is_directory))
            .cloned()
            .ok_or_else(|| Error::SummaryNotFound {
                path: path.to_path_buf(),
                is_directory,
            })
    }

    fn contains(&self, path: &Path, is_directory: bool) -> bool {
        self.records.contains_key(&(path.to_path_buf(), is_directory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("out")).unwrap();

        store.store(Path::new("a/b.py"), "file summary", false).unwrap();
        store.store(Path::new("a"), "dir summary", true).unwrap();

        assert_eq!(store.fetch(Path::new("a/b.py"), false).unwrap(), "file summary");
        assert_eq!(store.fetch(Path::new("a"), true).unwrap(), "dir summary");
        assert!(dir.path().join("out/a/b.py.md").is_file());
        assert!(dir.path().join("out/a/_dir_summary.md").is_file());
    }

    #[test]
    fn test_file_store_root_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.store(Path::new(""), "root summary", true).unwrap();
        assert!(dir.path().join(DIR_SUMMARY_FILE).is_file());
        assert_eq!(store.fetch(Path::new(""), true).unwrap(), "root summary");
    }

    #[test]
    fn test_file_and_directory_namespaces_are_separate() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.store(Path::new("build"), "a file", false).unwrap();
        store.store(Path::new("build"), "a directory", true).unwrap();
        assert_eq!(store.fetch(Path::new("build"), false).unwrap(), "a file");
        assert_eq!(store.fetch(Path::new("build"), true).unwrap(), "a directory");
    }

    #[test]
    fn test_store_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.store(Path::new("x.rs"), "first", false).unwrap();
        store.store(Path::new("x.rs"), "second", false).unwrap();
        assert_eq!(store.fetch(Path::new("x.rs"), false).unwrap(), "second");
    }

    #[test]
    fn test_missing_summary_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(!store.contains(Path::new("nope.rs"), false));
        let err = store.fetch(Path::new("nope.rs"), false).unwrap_err();
        assert!(matches!(
            err,
            Error::SummaryNotFound { is_directory: false, .. }
        ));
    }

    #[test]
    fn test_empty_root_rejected() {
        assert!(matches!(FileStore::new("  "), Err(Error::EmptyStoreRoot)));
    }

    #[test]
    fn test_custom_dir_file_name() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap().with_dir_file_name("README.md");
        assert_eq!(
            store.summary_path(Path::new("src"), true),
            dir.path().join("src/README.md")
        );
    }

    #[test]
    fn test_file_and_md_directory_collision_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.store(Path::new("x"), "file x", false).unwrap();
        let err = store.store(Path::new("x.md"), "dir x.md", true).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(store.fetch(Path::new("x"), false).unwrap(), "file x");
    }

    #[test]
    fn test_md_directory_then_file_collision_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.store(Path::new("x.md/inner"), "inner", false).unwrap();
        store.store(Path::new("x.md"), "dir x.md", true).unwrap();
        let err = store.store(Path::new("x"), "file x", false).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(store.fetch(Path::new("x.md"), true).unwrap(), "dir x.md");
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.store(Path::new("a"), "dir", true).unwrap();
        assert!(store.contains(Path::new("a"), true));
        assert!(!store.contains(Path::new("a"), false));
        assert!(store.fetch(Path::new("a"), false).is_err());
        assert_eq!(store.len(), 1);
    }
}
