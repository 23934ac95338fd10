//! Git repository integration

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use log::debug;

use crate::error::{Error, Result};

/// Work tree root of the repository containing `path`, if any.
pub fn find_work_tree(path: &Path) -> Option<PathBuf> {
    let repo = Repository::discover(path).ok()?;
    let workdir = repo.workdir()?.to_path_buf();
    debug!("{} is inside git work tree {}", path.display(), workdir.display());
    Some(workdir)
}

/// Tracked files plus untracked files not excluded by git's own rules.
///
/// Runs `git ls-files` from `root`, so the returned paths are relative to it.
pub fn ls_files(root: &Path) -> Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .args(["ls-files", "--cached", "--others", "--exclude-standard", "-z"])
        .current_dir(root)
        .output()
        .map_err(Error::GitSpawn)?;

    if !output.status.success() {
        return Err(Error::GitFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(parse_ls_files(&output.stdout))
}

/// Split NUL-separated `ls-files -z` output, dropping repeats of the same path.
///
/// Names are kept byte-for-byte so they still resolve on disk.
fn parse_ls_files(stdout: &[u8]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    stdout
        .split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .map(path_from_bytes)
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestRepo;

    #[test]
    fn test_parse_ls_files_dedups() {
        let parsed = parse_ls_files(b"a/b.py\0a/c.py\0a/b.py\0");
        assert_eq!(parsed, vec![PathBuf::from("a/b.py"), PathBuf::from("a/c.py")]);
        assert!(parse_ls_files(b"").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_ls_files_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let parsed = parse_ls_files(b"bad\xff.py\0");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].as_os_str().as_bytes(), b"bad\xff.py");
    }

    #[test]
    fn test_tracked_and_untracked_listed() {
        let repo = TestRepo::with_git();
        repo.add_file("tracked.rs", "fn main() {}");
        repo.add_untracked("untracked.rs", "fn other() {}");

        let mut files = ls_files(repo.path()).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![PathBuf::from("tracked.rs"), PathBuf::from("untracked.rs")]
        );
    }

    #[test]
    fn test_gitignored_untracked_excluded() {
        let repo = TestRepo::with_git();
        repo.add_file(".gitignore", "*.log\n");
        repo.add_file("main.rs", "fn main() {}");
        repo.add_untracked("debug.log", "log content");

        let files = ls_files(repo.path()).unwrap();
        assert!(files.contains(&PathBuf::from("main.rs")));
        assert!(!files.contains(&PathBuf::from("debug.log")));
    }

    #[test]
    fn test_paths_relative_to_subdirectory() {
        let repo = TestRepo::with_git();
        repo.add_file("pkg/mod.rs", "mod x;");
        repo.add_file("other.rs", "");

        let files = ls_files(&repo.path().join("pkg")).unwrap();
        assert_eq!(files, vec![PathBuf::from("mod.rs")]);
    }

    #[test]
    fn test_not_a_repository_fails() {
        let repo = TestRepo::new();
        assert!(find_work_tree(repo.path()).is_none());
        assert!(matches!(
            ls_files(repo.path()),
            Err(Error::GitFailed { .. })
        ));
    }

    #[test]
    fn test_find_work_tree() {
        let repo = TestRepo::with_git();
        repo.add_file("src/lib.rs", "");
        assert!(find_work_tree(&repo.path().join("src")).is_some());
    }
}
