//! Treedoc - bottom-up LLM summaries of a source tree

pub mod error;
pub mod git;
pub mod llm;
pub mod prompts;
pub mod store;
pub mod summary;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use llm::{BackendConfig, BackendKind, TextGenerator, build_backend, strip_end_marker};
pub use store::{DIR_SUMMARY_FILE, FileStore, MemoryStore, SummaryStore};
pub use summary::{GeneratorConfig, RunStats, SummaryGenerator};
pub use tree::{
    BottomUpWalk, DiscoveryMode, IgnoreFilter, TreeNode, TreeWalker, WalkEntry, WalkerConfig,
};
