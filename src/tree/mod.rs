//! Directory tree discovery and traversal
//!
//! Files are discovered once per run (`TreeWalker`), folded into an
//! in-memory trie (`TreeNode`), and then walked bottom-up
//! (`BottomUpWalk`) so every directory is visited after all of its
//! subdirectories.

mod config;
mod discovery;
mod filter;
mod node;
mod utils;
mod walker;

pub use config::{DiscoveryMode, WalkerConfig};
pub use discovery::TreeWalker;
pub use filter::{EXCLUSION_FILE, IgnoreFilter};
pub use node::TreeNode;
pub use utils::{HIDDEN_MARKER, display_path, path_segments};
pub use walker::{BottomUpWalk, WalkEntry};
