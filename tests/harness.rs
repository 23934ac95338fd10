//! Test harness for treedoc integration tests

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use treedoc::test_utils::ScriptedGenerator;
use treedoc::{DiscoveryMode, GeneratorConfig, MemoryStore, SummaryGenerator, WalkerConfig};

pub use treedoc::test_utils::TestRepo;

pub fn config(discovery: DiscoveryMode, ignore: &[&str]) -> GeneratorConfig {
    GeneratorConfig {
        walker: WalkerConfig {
            ignore_patterns: ignore.iter().map(|s| s.to_string()).collect(),
            discovery,
            ..Default::default()
        },
        reuse_existing: false,
    }
}

pub fn memory_generator(
    backend: ScriptedGenerator,
    discovery: DiscoveryMode,
) -> SummaryGenerator<ScriptedGenerator, MemoryStore> {
    SummaryGenerator::new(backend, MemoryStore::new(), config(discovery, &[]))
}

pub fn run_treedoc(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_treedoc");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("TREEDOC_LOG")
        .output()
        .expect("Failed to run treedoc");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}
