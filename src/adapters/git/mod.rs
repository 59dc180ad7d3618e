//! Git integration adapter
//!
//! Lists files staged for commit, for `judge check --staged`.

use std::path::Path;

use anyhow::Context;
use git2::{Delta, ErrorCode, Repository};

/// Files staged in the repository containing `dir`
///
/// Paths are relative to `dir` when they sit below it, otherwise absolute.
/// Deleted files are left out. An unborn `HEAD` (no commits yet) compares
/// the index against an empty tree.
///
/// # Errors
///
/// Returns an error if `dir` is not inside a git work tree or the index
/// cannot be read.
pub fn staged_files(dir: &Path) -> anyhow::Result<Vec<String>> {
    let repo = Repository::discover(dir).context("Not a git repository")?;
    let workdir = repo.workdir().context("Bare repository has no working tree")?;
    let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
    let base = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let head_tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree()?),
        Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
        Err(err) => return Err(err.into()),
    };
    let index = repo.index()?;
    let diff = repo.diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;

    let files = diff
        .deltas()
        .filter(|delta| delta.status() != Delta::Deleted)
        .filter_map(|delta| delta.new_file().path().map(|p| workdir.join(p)))
        .map(|full| match full.strip_prefix(&base) {
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => full.to_string_lossy().into_owned(),
        })
        .collect();
    Ok(files)
}
