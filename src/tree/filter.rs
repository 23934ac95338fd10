//! Ignore rules: hidden entries, `.gitignore` files, and explicit patterns

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glob::Pattern;
use log::{debug, warn};

use super::config::WalkerConfig;
use super::utils::{is_hidden, join_segments, pattern_matches};

/// Name of the per-directory exclusion file.
pub const EXCLUSION_FILE: &str = ".gitignore";

/// A single compiled ignore pattern.
#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: Pattern,
    /// Pattern contains a `/` and is matched against the full relative path.
    anchored: bool,
    /// Pattern ended with `/` and only applies to directories.
    dir_only: bool,
}

impl IgnoreRule {
    fn parse(raw: &str) -> Option<Self> {
        let mut text = raw.trim_end();
        if text.is_empty() || text.starts_with('#') {
            return None;
        }
        if text.starts_with('!') {
            debug!("skipping unsupported negated ignore pattern {:?}", raw);
            return None;
        }

        let dir_only = text.ends_with('/');
        text = text.trim_end_matches('/');
        if let Some(rest) = text.strip_prefix("**/") {
            text = rest;
        }
        let anchored = text.contains('/');
        text = text.trim_start_matches('/');
        if text.is_empty() {
            return None;
        }

        match Pattern::new(text) {
            Ok(pattern) => Some(Self {
                pattern,
                anchored,
                dir_only,
            }),
            Err(e) => {
                warn!("ignoring invalid pattern {:?}: {}", raw, e);
                None
            }
        }
    }

    /// `segments` is the candidate path relative to the directory the rule belongs to.
    fn matches(&self, segments: &[String], is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        if self.anchored {
            pattern_matches(&self.pattern, &segments.join("/"))
        } else {
            segments
                .last()
                .is_some_and(|name| pattern_matches(&self.pattern, name))
        }
    }
}

fn parse_rules<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<IgnoreRule> {
    lines.into_iter().filter_map(IgnoreRule::parse).collect()
}

/// Decides whether a root-relative path is excluded from the tree.
///
/// A path is ignored when any of its segments is hidden, or when the path
/// or one of its ancestor directories matches an explicit pattern or a
/// `.gitignore` rule from a directory above it. Exclusion files are read
/// lazily and cached per directory.
pub struct IgnoreFilter {
    root: PathBuf,
    explicit: Vec<IgnoreRule>,
    exclusion_files: bool,
    cache: RefCell<HashMap<PathBuf, Rc<Vec<IgnoreRule>>>>,
}

impl IgnoreFilter {
    pub fn new(root: &Path, patterns: &[String]) -> Self {
        Self {
            root: root.to_path_buf(),
            explicit: parse_rules(patterns.iter().map(String::as_str)),
            exclusion_files: true,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn from_config(root: &Path, config: &WalkerConfig) -> Self {
        let filter = Self::new(root, &config.ignore_patterns);
        if config.exclusion_files {
            filter
        } else {
            filter.without_exclusion_files()
        }
    }

    /// Only apply the hidden-entry convention and explicit patterns.
    pub fn without_exclusion_files(mut self) -> Self {
        self.exclusion_files = false;
        self
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let segments: Vec<String> = path
            .iter()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| s != "." && !s.is_empty())
            .collect();
        if segments.is_empty() {
            return false;
        }
        if segments.iter().any(|s| is_hidden(s)) {
            return true;
        }

        let target_is_dir = self.root.join(path).is_dir();
        (1..=segments.len()).any(|end| {
            let is_dir = end < segments.len() || target_is_dir;
            self.prefix_is_ignored(&segments[..end], is_dir)
        })
    }

    fn prefix_is_ignored(&self, candidate: &[String], is_dir: bool) -> bool {
        if self.explicit.iter().any(|rule| rule.matches(candidate, is_dir)) {
            return true;
        }
        if !self.exclusion_files {
            return false;
        }
        // Exclusion files in every directory strictly above the candidate.
        (0..candidate.len()).any(|depth| {
            let rules = self.rules_for(&join_segments(&candidate[..depth]));
            rules
                .iter()
                .any(|rule| rule.matches(&candidate[depth..], is_dir))
        })
    }

    fn rules_for(&self, dir: &Path) -> Rc<Vec<IgnoreRule>> {
        if let Some(rules) = self.cache.borrow().get(dir) {
            return Rc::clone(rules);
        }
        let file = self.root.join(dir).join(EXCLUSION_FILE);
        let rules = match std::fs::read_to_string(&file) {
            Ok(contents) => {
                let rules = parse_rules(contents.lines());
                debug!("loaded {} rules from {}", rules.len(), file.display());
                rules
            }
            Err(_) => Vec::new(),
        };
        let rules = Rc::new(rules);
        self.cache
            .borrow_mut()
            .insert(dir.to_path_buf(), Rc::clone(&rules));
        rules
    }
}
