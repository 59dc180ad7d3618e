//! Filesystem file source
//!
//! Implements `FileSource` by reading files relative to a root directory,
//! and expands command-line paths into the working set of files.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use log::warn;
use walkdir::WalkDir;

use crate::core::error::CheckError;
use crate::core::models::FileContent;
use crate::core::ports::FileSource;

/// File source backed by the local filesystem
#[derive(Debug, Clone)]
pub struct FsFileSource {
    /// Directory relative paths are resolved against
    root: PathBuf,
}

impl FsFileSource {
    /// Create a file source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a caller path against the root
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
    }
}

#[async_trait]
impl FileSource for FsFileSource {
    async fn load(&self, path: &str) -> Result<FileContent, CheckError> {
        let content = tokio::fs::read_to_string(self.resolve(path)).await.map_err(|source| {
            CheckError::FileRead {
                path: path.to_string(),
                source,
            }
        })?;
        Ok(FileContent::new(path, content))
    }
}

/// Expand command-line paths into a list of files
///
/// Directories are walked recursively, skipping `.git`. Everything else is
/// passed through, so a missing file surfaces as a read error for the
/// bindings that match it. A leading `./` is dropped.
#[must_use]
pub fn expand_paths(paths: &[String]) -> Vec<String> {
    let mut files = Vec::new();
    for path in paths {
        let path = Path::new(path);
        if !path.is_dir() {
            files.push(display(path));
            continue;
        }

        let walker = WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(display(entry.path())),
                Ok(_) => {},
                Err(err) => warn!("skipping unreadable path: {err}"),
            }
        }
    }
    files
}

fn display(path: &Path) -> String {
    let trimmed: PathBuf = path.components().skip_while(|c| *c == Component::CurDir).collect();
    trimmed.to_string_lossy().into_owned()
}
