//! Configuration types for tree discovery

use clap::ValueEnum;

/// How candidate files are enumerated before ignore rules are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DiscoveryMode {
    /// Use git when the root is inside a work tree, otherwise walk the filesystem
    #[default]
    Auto,
    /// Tracked plus untracked-but-not-excluded files from `git ls-files`
    Git,
    /// Plain filesystem walk honoring `.gitignore` files
    Walk,
}

/// Configuration for tree discovery behavior.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Extra glob patterns excluded on top of exclusion files.
    pub ignore_patterns: Vec<String>,
    pub discovery: DiscoveryMode,
    /// Apply per-directory `.gitignore` rules in the ignore filter.
    pub exclusion_files: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            discovery: DiscoveryMode::Auto,
            exclusion_files: true,
        }
    }
}
