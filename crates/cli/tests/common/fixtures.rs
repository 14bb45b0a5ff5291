//! Temporary directory trees with controlled timestamps

use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A scratch directory holding an `input/` tree
///
/// Commands run with the scratch directory as working directory, so the
/// default `storage.xml` and `target/` land beside `input/`.
pub struct TestTree {
    temp: TempDir,
}

#[allow(dead_code)]
impl TestTree {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(temp.path().join("input")).expect("create input dir");
        Self { temp }
    }

    /// Working directory for commands
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn input(&self) -> PathBuf {
        self.root().join("input")
    }

    /// Write a file under `input/` with a fixed modification time
    pub fn write(&self, rel: &str, contents: &[u8], mtime: i64) {
        let path = self.input().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, contents).expect("write file");
        self.touch(rel, mtime);
    }

    pub fn touch(&self, rel: &str, mtime: i64) {
        set_file_mtime(self.input().join(rel), FileTime::from_unix_time(mtime, 0))
            .expect("set mtime");
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.input().join(rel)).expect("remove file");
    }

    /// All files under a directory (relative, `/`-separated, sorted)
    pub fn files_in(&self, dir: &str) -> Vec<String> {
        let base = self.root().join(dir);
        let mut files: Vec<String> = WalkDir::new(&base)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .map(|e| {
                e.path()
                    .strip_prefix(&base)
                    .expect("under base")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }
}
