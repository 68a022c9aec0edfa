// src/fs/mod.rs

//! File access for specifications and configuration files.
//!
//! Everything the loader reads goes through [`FileSystem`], so whole
//! projects (a specification, its target and its imports) can be checked
//! from memory in tests.

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

pub use mock::MockFileSystem;

/// Read-only view of the files a project refers to.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn is_file(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
