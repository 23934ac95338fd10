//! In-memory directory trie built from a flat file list

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::utils::path_segments;
use super::walker::BottomUpWalk;

/// A node in the directory trie.
///
/// Directories only exist as ancestors of at least one file. Children are
/// kept sorted by name, so the shape does not depend on insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Dir(BTreeMap<String, TreeNode>),
    File,
}

impl Default for TreeNode {
    fn default() -> Self {
        TreeNode::Dir(BTreeMap::new())
    }
}

impl TreeNode {
    /// Fold root-relative file paths into a tree rooted at an empty directory.
    ///
    /// Fails with [`Error::TreeConflict`] when one path is a strict prefix of
    /// another, since that node would have to be both a file and a directory.
    pub fn build<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut root = TreeNode::default();
        for path in paths {
            root.insert(path.as_ref())?;
        }
        Ok(root)
    }

    fn insert(&mut self, path: &Path) -> Result<()> {
        let segments = path_segments(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(Error::InvalidPath(path.to_path_buf()));
        };

        let mut children = match self {
            TreeNode::Dir(children) => children,
            TreeNode::File => return Err(Error::TreeConflict { path: PathBuf::new() }),
        };
        let mut prefix = PathBuf::new();
        for segment in parents {
            prefix.push(segment);
            let child = children
                .entry(segment.clone())
                .or_insert_with(TreeNode::default);
            children = match child {
                TreeNode::Dir(grandchildren) => grandchildren,
                TreeNode::File => return Err(Error::TreeConflict { path: prefix }),
            };
        }

        if let Some(TreeNode::Dir(_)) = children.get(leaf) {
            return Err(Error::TreeConflict {
                path: path.to_path_buf(),
            });
        }
        children.insert(leaf.clone(), TreeNode::File);
        Ok(())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir(_))
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            TreeNode::Dir(children) => Some(children),
            TreeNode::File => None,
        }
    }

    /// Every file path in the tree, relative to this node, in name order.
    pub fn flatten(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.collect_files(&PathBuf::new(), &mut files);
        files
    }

    fn collect_files(&self, prefix: &Path, out: &mut Vec<PathBuf>) {
        match self {
            TreeNode::File => out.push(prefix.to_path_buf()),
            TreeNode::Dir(children) => {
                for (name, child) in children {
                    child.collect_files(&prefix.join(name), out);
                }
            }
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            TreeNode::File => 1,
            TreeNode::Dir(children) => children.values().map(TreeNode::file_count).sum(),
        }
    }

    /// Number of directories including this one.
    pub fn dir_count(&self) -> usize {
        match self {
            TreeNode::File => 0,
            TreeNode::Dir(children) => 1 + children.values().map(TreeNode::dir_count).sum::<usize>(),
        }
    }

    /// Directories bottom-up: every subdirectory before its parent, root last.
    pub fn walk(&self) -> BottomUpWalk<'_> {
        BottomUpWalk::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_flatten_returns_input_set() {
        let input = paths(&["src/main.rs", "src/tree/walker.rs", "README.md", "src/tree/mod.rs"]);
        let tree = TreeNode::build(&input).unwrap();
        let expected: BTreeSet<_> = input.into_iter().collect();
        let actual: BTreeSet<_> = tree.flatten().into_iter().collect();
        assert_eq!(actual, expected);
        assert_eq!(tree.file_count(), 4);
        assert_eq!(tree.dir_count(), 3);
    }

    #[test]
    fn test_insertion_order_does_not_change_shape() {
        let forward = TreeNode::build(paths(&["a/b.py", "a/c.py", "d/e/f.py"])).unwrap();
        let backward = TreeNode::build(paths(&["d/e/f.py", "a/c.py", "a/b.py"])).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_directories_only_as_ancestors() {
        let tree = TreeNode::build(paths(&["a/b/c.txt"])).unwrap();
        let a = &tree.children().unwrap()["a"];
        let b = &a.children().unwrap()["b"];
        assert!(a.is_dir());
        assert!(b.is_dir());
        assert_eq!(b.children().unwrap()["c.txt"], TreeNode::File);
    }

    #[test]
    fn test_file_then_directory_conflict() {
        let err = TreeNode::build(paths(&["a", "a/b.py"])).unwrap_err();
        assert!(matches!(err, Error::TreeConflict { ref path } if path == Path::new("a")));
    }

    #[test]
    fn test_directory_then_file_conflict() {
        let err = TreeNode::build(paths(&["a/b.py", "a"])).unwrap_err();
        assert!(matches!(err, Error::TreeConflict { ref path } if path == Path::new("a")));
    }

    #[test]
    fn test_duplicate_path_is_not_a_conflict() {
        let tree = TreeNode::build(paths(&["a/b.py", "a/b.py"])).unwrap();
        assert_eq!(tree.file_count(), 1);
    }

    #[test]
    fn test_invalid_paths_rejected() {
        assert!(matches!(
            TreeNode::build(paths(&["/abs/file"])),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            TreeNode::build(paths(&["../outside"])),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        let tree = TreeNode::build(Vec::<PathBuf>::new()).unwrap();
        assert!(tree.flatten().is_empty());
        assert_eq!(tree.dir_count(), 1);
    }
}
