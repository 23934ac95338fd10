//! Test utilities: temporary git repositories and a scripted backend.
//!
//! This module is only compiled for tests, benchmarks, and the `test-utils`
//! feature.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::llm::{END_OF_TURN, TextGenerator};
use crate::prompts::prompt_subject;

/// A temporary directory, optionally initialized as a git repository.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestRepo {
    dir: TempDir,
    git_initialized: bool,
}

impl TestRepo {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            dir,
            git_initialized: false,
        }
    }

    /// Create a new temporary directory with git initialized.
    pub fn with_git() -> Self {
        let mut repo = Self::new();
        repo.init_git();
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Initialize a git repository and configure a commit identity.
    pub fn init_git(&mut self) {
        self.git(&["init"]);
        self.git(&["config", "user.email", "test@test.com"]);
        self.git(&["config", "user.name", "Test"]);
        self.git_initialized = true;
    }

    /// Write a file (creating parent directories) and stage it if git is initialized.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.add_untracked(path, content);
        if self.git_initialized {
            self.git(&["add", "--force", path]);
        }
        full_path
    }

    /// Write a file without staging it.
    pub fn add_untracked(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    fn git(&self, args: &[&str]) {
        Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git");
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic in-process backend.
///
/// Answers `Summary of <path>.` (followed by an end-of-turn marker, which
/// the generator strips) for every prompt and records the path each prompt
/// was about. Can be told to fail when asked about a particular path.
#[derive(Default)]
pub struct ScriptedGenerator {
    subjects: RefCell<Vec<String>>,
    fail_on: Option<String>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with a backend error when prompted about `path`.
    pub fn failing_on(path: &str) -> Self {
        Self {
            subjects: RefCell::default(),
            fail_on: Some(path.to_string()),
        }
    }

    /// Paths of all prompts received so far, in order.
    pub fn subjects(&self) -> Vec<String> {
        self.subjects.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn invoke(&self, prompt: &str) -> Result<String> {
        let subject = prompt_subject(prompt).unwrap_or_default().to_string();
        self.subjects.borrow_mut().push(subject.clone());
        if self.fail_on.as_deref() == Some(subject.as_str()) {
            return Err(Error::Backend(format!("scripted failure for {subject}")));
        }
        Ok(format!("Summary of {subject}.{END_OF_TURN}"))
    }
}
