// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory file system. Paths are normalized lexically (`a/./b/../c` is
/// `a/c`), so relative import paths resolve the same way they do on disk.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.lock().insert(normalize(path.as_ref()), content.into());
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.lock()
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lock().contains_key(&normalize(path))
    }
}
