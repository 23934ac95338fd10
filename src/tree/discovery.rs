//! File discovery: enumerate candidate files and apply ignore rules

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::git;

use super::config::{DiscoveryMode, WalkerConfig};
use super::filter::IgnoreFilter;
use super::node::TreeNode;

/// Discovers the files under a root and builds them into a [`TreeNode`].
pub struct TreeWalker {
    config: WalkerConfig,
}

impl TreeWalker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Sorted, deduplicated root-relative file paths that survive the ignore filter.
    pub fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let candidates = match self.resolve_mode(root) {
            DiscoveryMode::Git => git::ls_files(root)?,
            DiscoveryMode::Walk | DiscoveryMode::Auto => walk_files(root)?,
        };
        let total = candidates.len();

        let filter = IgnoreFilter::from_config(root, &self.config);
        let mut files: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| {
                if path.to_str().is_none() {
                    warn!("skipping non-UTF-8 path {}", path.display());
                    return false;
                }
                if filter.is_ignored(path) {
                    debug!("ignoring {}", path.display());
                    return false;
                }
                is_regular_file(&root.join(path))
            })
            .collect();
        files.sort();
        files.dedup();

        info!(
            "discovered {} files under {} ({} candidates)",
            files.len(),
            root.display(),
            total
        );
        Ok(files)
    }

    /// Discover files and fold them into a tree.
    pub fn build(&self, root: &Path) -> Result<TreeNode> {
        TreeNode::build(self.list_files(root)?)
    }

    fn resolve_mode(&self, root: &Path) -> DiscoveryMode {
        match self.config.discovery {
            DiscoveryMode::Auto => {
                if git::find_work_tree(root).is_some() {
                    DiscoveryMode::Git
                } else {
                    debug!("{} is not in a git work tree, walking filesystem", root.display());
                    DiscoveryMode::Walk
                }
            }
            mode => mode,
        }
    }
}

/// Deleted-but-indexed entries, submodules and symlinks are not summarized.
fn is_regular_file(path: &Path) -> bool {
    match path.symlink_metadata() {
        Ok(meta) if meta.file_type().is_file() => true,
        _ => {
            debug!("skipping non-regular entry {}", path.display());
            false
        }
    }
}

/// Filesystem walk for trees outside version control.
///
/// I/O failures abort discovery. Malformed `.gitignore` lines only warn,
/// matching how the ignore filter treats invalid patterns.
fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .ignore(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.io_error().is_none() => {
                warn!("ignore rule problem during walk: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}
