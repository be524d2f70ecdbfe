// Copyright 2026 The MVCS Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Filesystem abstraction consumed by the core engine. Kept behind a trait so
//! the engine's algorithms never call `std::fs` directly, which is what lets
//! [`crate::testing`] swap in fakes for deterministic tests.

use std::fmt;
use std::fs;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;

use sha2::Digest as _;
use sha2::Sha256;

use crate::error::Error;
use crate::error::Result;

/// Streaming hash chunk size, per the engine's streaming-hash contract.
const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// File/directory I/O, existence/type probes, and streaming content hashing.
/// Every path accepted here is an absolute, host-native path; the engine is
/// responsible for resolving working-tree-relative project paths before
/// calling through this trait (see [`crate::path_util`]).
pub trait StorageProvider: fmt::Debug + Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Creates `path` with the given contents, creating intermediate
    /// directories as needed.
    fn create_file(&self, path: &Path, bytes: &[u8]) -> Result<()>;
    /// Copies `src` to `dst`, creating `dst`'s intermediate directories.
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()>;
    /// Moves `src` to `dst`, creating `dst`'s intermediate directories.
    fn move_file(&self, src: &Path, dst: &Path) -> Result<()>;
    /// Creates `path` and any missing intermediate directories.
    fn create_dir(&self, path: &Path) -> Result<()>;
    /// Recursively deletes a file or directory.
    fn delete_file_or_dir(&self, path: &Path) -> Result<()>;

    /// Lists direct children of `path` (depth 1), excluding entries matching
    /// any of `ignore`'s glob patterns (relative to `path`).
    fn read_dir(&self, path: &Path, ignore: &[String]) -> Result<Vec<PathBuf>>;
    /// Lists every path under `path`, recursively, excluding entries
    /// matching any of `ignore`'s glob patterns (relative to `path`).
    fn read_dir_deep(&self, path: &Path, ignore: &[String]) -> Result<Vec<PathBuf>>;

    /// Streaming SHA-256 of the file at `path`, hex-encoded lowercase.
    fn hash_file(&self, path: &Path) -> Result<String>;
}

/// Production [`StorageProvider`], backed directly by `std::fs`.
///
/// Synchronous by design: there is exactly one backend here (the local
/// filesystem of the working directory), so there's no analogue of jj-lib's
/// cloud-backed `Backend` impls that make `async_trait` worthwhile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorageProvider;

impl FsStorageProvider {
    pub fn new() -> Self {
        Self
    }

    fn io_err(path: &Path, source: std::io::Error) -> Error {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Self::io_err(parent, e))?;
            }
        }
        Ok(())
    }
}

impl StorageProvider for FsStorageProvider {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Self::io_err(path, e))
    }

    fn create_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_parent_dir(path)?;
        fs::write(path, bytes).map_err(|e| Self::io_err(path, e))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        Self::ensure_parent_dir(dst)?;
        fs::copy(src, dst).map_err(|e| Self::io_err(src, e))?;
        Ok(())
    }

    fn move_file(&self, src: &Path, dst: &Path) -> Result<()> {
        Self::ensure_parent_dir(dst)?;
        fs::rename(src, dst).map_err(|e| Self::io_err(src, e))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| Self::io_err(path, e))
    }

    fn delete_file_or_dir(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path).map_err(|e| Self::io_err(path, e))
        } else {
            fs::remove_file(path).map_err(|e| Self::io_err(path, e))
        }
    }

    fn read_dir(&self, path: &Path, ignore: &[String]) -> Result<Vec<PathBuf>> {
        let patterns = compile_ignore(ignore)?;
        let mut out = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| Self::io_err(path, e))? {
            let entry = entry.map_err(|e| Self::io_err(path, e))?;
            let entry_path = entry.path();
            if !is_ignored(&entry_path, path, &patterns) {
                out.push(entry_path);
            }
        }
        out.sort();
        Ok(out)
    }

    fn read_dir_deep(&self, path: &Path, ignore: &[String]) -> Result<Vec<PathBuf>> {
        let patterns = compile_ignore(ignore)?;
        let mut out = Vec::new();
        walk_dir(path, path, &patterns, &mut out)?;
        out.sort();
        Ok(out)
    }

    fn hash_file(&self, path: &Path) -> Result<String> {
        let mut file = fs::File::open(path).map_err(|e| Self::io_err(path, e))?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; HASH_CHUNK_SIZE];
        loop {
            let bytes_read = file.read(&mut buf).map_err(|e| Self::io_err(path, e))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buf[..bytes_read]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

fn compile_ignore(ignore: &[String]) -> Result<Vec<glob::Pattern>> {
    ignore
        .iter()
        .map(|glob_str| {
            glob::Pattern::new(glob_str)
                .map_err(|e| Error::Corrupt(format!("invalid ignore glob '{glob_str}': {e}")))
        })
        .collect()
}

fn is_ignored(path: &Path, root: &Path, patterns: &[glob::Pattern]) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let relative = crate::path_util::to_slash(relative);
    patterns.iter().any(|pattern| pattern.matches(&relative))
}

fn walk_dir(root: &Path, dir: &Path, patterns: &[glob::Pattern], out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::Io {
        path: dir.to_path_buf(),
        source: e,
    })? {
        let entry = entry.map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let entry_path = entry.path();
        if is_ignored(&entry_path, root, patterns) {
            continue;
        }
        if entry_path.is_dir() {
            walk_dir(root, &entry_path, patterns, out)?;
        } else {
            out.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::new_temp_dir;

    #[test]
    fn hash_file_matches_known_sha256() {
        let dir = new_temp_dir();
        let path = dir.path().join("greeting.txt");
        fs::write(&path, b"hello world").unwrap();
        let storage = FsStorageProvider::new();
        let hash = storage.hash_file(&path).unwrap();
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dacefbdde5edd1fcb03c0da5d04eb8f5c7f1"
                .to_string()
                .to_ascii_lowercase()
        );
    }

    #[test]
    fn read_dir_deep_respects_ignore_glob() {
        let dir = new_temp_dir();
        fs::create_dir_all(dir.path().join(".mvcs/contents")).unwrap();
        fs::write(dir.path().join(".mvcs/project.json"), b"{}").unwrap();
        fs::write(dir.path().join("file1.txt"), b"hi").unwrap();
        fs::create_dir_all(dir.path().join("subdir1")).unwrap();
        fs::write(dir.path().join("subdir1/file2.txt"), b"hi").unwrap();

        let storage = FsStorageProvider::new();
        let entries = storage
            .read_dir_deep(dir.path(), &[".mvcs/**".to_string()])
            .unwrap();

        let relatives: Vec<String> = entries
            .iter()
            .map(|p| crate::path_util::to_slash(p.strip_prefix(dir.path()).unwrap()))
            .collect();
        assert_eq!(relatives, vec!["file1.txt", "subdir1/file2.txt"]);
    }

    #[test]
    fn create_file_creates_intermediate_directories() {
        let dir = new_temp_dir();
        let storage = FsStorageProvider::new();
        let target = dir.path().join("a/b/c.txt");
        storage.create_file(&target, b"data").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"data");
    }
}
