//! Bottom-up traversal of a built tree

use std::collections::btree_map;
use std::path::PathBuf;

use super::node::TreeNode;

/// One directory yielded by [`BottomUpWalk`], with its immediate children.
///
/// Paths are relative to the walked root; the root itself is the empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub dir: PathBuf,
    pub subdirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

struct Frame<'a> {
    dir: PathBuf,
    children: btree_map::Iter<'a, String, TreeNode>,
    subdirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl<'a> Frame<'a> {
    fn new(dir: PathBuf, children: &'a btree_map::BTreeMap<String, TreeNode>) -> Self {
        Self {
            dir,
            children: children.iter(),
            subdirs: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Depth-first, post-order iterator over the directories of a [`TreeNode`].
///
/// A directory is yielded only after every directory below it. The root is
/// always the last entry. Uses an explicit stack, so memory is O(depth).
pub struct BottomUpWalk<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> BottomUpWalk<'a> {
    pub fn new(root: &'a TreeNode) -> Self {
        let stack = match root {
            TreeNode::Dir(children) => vec![Frame::new(PathBuf::new(), children)],
            TreeNode::File => Vec::new(),
        };
        Self { stack }
    }
}

impl Iterator for BottomUpWalk<'_> {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<WalkEntry> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some((name, TreeNode::File)) => frame.files.push(frame.dir.join(name)),
                Some((name, TreeNode::Dir(children))) => {
                    let path = frame.dir.join(name);
                    frame.subdirs.push(path.clone());
                    self.stack.push(Frame::new(path, children));
                }
                None => {
                    let done = self.stack.pop()?;
                    return Some(WalkEntry {
                        dir: done.dir,
                        subdirs: done.subdirs,
                        files: done.files,
                    });
                }
            }
        }
    }
}
