//! Bottom-up summary generation
//!
//! Files are summarized from their contents; directories from the stored
//! summaries of their immediate children. The walk order guarantees a
//! directory is only summarized once all of its children are in the store.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::llm::{TextGenerator, strip_end_marker};
use crate::prompts::{directory_prompt, file_prompt};
use crate::store::SummaryStore;
use crate::tree::{TreeWalker, WalkEntry, WalkerConfig, display_path};

#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    pub walker: WalkerConfig,
    /// Fetch file summaries already present in the store instead of
    /// regenerating them. Directory summaries are always regenerated.
    pub reuse_existing: bool,
}

/// Counters for the most recent [`SummaryGenerator::generate`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files_generated: usize,
    pub files_reused: usize,
    pub dirs_generated: usize,
}

/// Drives a [`TextGenerator`] over a tree and persists results to a [`SummaryStore`].
pub struct SummaryGenerator<G, S> {
    backend: G,
    store: S,
    config: GeneratorConfig,
    stats: RunStats,
}

impl<G: TextGenerator, S: SummaryStore> SummaryGenerator<G, S> {
    pub fn new(backend: G, store: S, config: GeneratorConfig) -> Self {
        Self {
            backend,
            store,
            config,
            stats: RunStats::default(),
        }
    }

    pub fn backend(&self) -> &G {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn last_stats(&self) -> RunStats {
        self.stats
    }

    /// Summarize `target` and everything below it.
    ///
    /// A file target is stored under its file name. For a directory target
    /// every record is keyed relative to that directory, with the directory
    /// itself stored as the empty path. Returns the summary generated last
    /// (the target's own).
    pub fn generate(&mut self, target: &Path) -> Result<String> {
        self.stats = RunStats::default();
        if target.is_file() {
            let key = target
                .file_name()
                .map(PathBuf::from)
                .ok_or_else(|| Error::InvalidTarget(target.to_path_buf()))?;
            self.generate_for_file(target, &key)
        } else if target.is_dir() {
            self.generate_for_dir(target)
        } else {
            Err(Error::InvalidTarget(target.to_path_buf()))
        }
    }

    fn generate_for_dir(&mut self, root: &Path) -> Result<String> {
        let tree = TreeWalker::new(self.config.walker.clone()).build(root)?;
        info!(
            "summarizing {} files in {} directories under {}",
            tree.file_count(),
            tree.dir_count(),
            root.display()
        );

        let mut generated: HashSet<PathBuf> = HashSet::new();
        let mut summary = String::new();
        for entry in tree.walk() {
            summary = self.generate_for_entry(root, &entry, &mut generated)?;
        }

        info!(
            "generated {} file and {} directory summaries ({} reused)",
            self.stats.files_generated, self.stats.dirs_generated, self.stats.files_reused
        );
        Ok(summary)
    }

    fn generate_for_entry(
        &mut self,
        root: &Path,
        entry: &WalkEntry,
        generated: &mut HashSet<PathBuf>,
    ) -> Result<String> {
        let mut submodules = Vec::with_capacity(entry.files.len() + entry.subdirs.len());
        for file in &entry.files {
            if generated.insert(file.clone()) {
                self.obtain_file_summary(root, file)?;
            }
            submodules.push((display_path(file), self.store.fetch(file, false)?));
        }
        for subdir in &entry.subdirs {
            submodules.push((display_path(subdir), self.store.fetch(subdir, true)?));
        }

        let prompt = directory_prompt(&display_path(&entry.dir), &submodules);
        let summary = self.complete(&prompt)?;
        debug!(
            "generated summary for {}:\n{}\n-----",
            display_path(&entry.dir),
            summary
        );
        self.store.store(&entry.dir, &summary, true)?;
        self.stats.dirs_generated += 1;
        Ok(summary)
    }

    fn obtain_file_summary(&mut self, root: &Path, file: &Path) -> Result<()> {
        if self.config.reuse_existing && self.store.contains(file, false) {
            debug!("reusing stored summary for {}", file.display());
            self.stats.files_reused += 1;
            return Ok(());
        }
        self.generate_for_file(&root.join(file), file).map(|_| ())
    }

    fn generate_for_file(&mut self, path: &Path, key: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let contents = String::from_utf8_lossy(&bytes);
        debug!("read {} ({} bytes)", path.display(), bytes.len());

        let prompt = file_prompt(&display_path(key), &contents);
        let summary = self.complete(&prompt)?;
        debug!("generated summary for {}:\n{}\n-----", key.display(), summary);
        self.store.store(key, &summary, false)?;
        self.stats.files_generated += 1;
        Ok(summary)
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        let raw = self.backend.invoke(prompt)?;
        Ok(strip_end_marker(&raw).to_string())
    }
}
