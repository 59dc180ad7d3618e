//! Centralized path definitions for judge
//!
//! Single source of truth for the file names judge reads and writes.
//!
//! ## Layout
//!
//! ```text
//! project/
//! ├── judge.toml          # Configuration (committed)
//! ├── .gitignore          # Honoured when matching files to bindings
//! └── .judge-cache/       # Remote rule cache (gitignored)
//!     └── <sha256(url)>.json
//! ```
//!
//! Relative locations in `judge.toml` are resolved against the directory
//! holding the config file, not the current directory.

use std::path::{Path, PathBuf};

/// Configuration filename
pub const JUDGE_TOML: &str = "judge.toml";

/// Ignore list consulted by the file matcher
pub const GITIGNORE: &str = ".gitignore";

/// Default remote rule cache directory
pub const DEFAULT_CACHE_DIR: &str = ".judge-cache";

/// Get path to the `judge.toml` in the current directory.
#[must_use]
pub fn judge_toml() -> PathBuf {
    PathBuf::from(JUDGE_TOML)
}

/// Directory a config file lives in.
///
/// A bare filename lives in the current directory.
#[must_use]
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve a configured location against the config directory.
///
/// Absolute paths are returned unchanged.
#[must_use]
pub fn resolve(config_dir: &Path, location: &str) -> PathBuf {
    let path = Path::new(location);
    if path.is_absolute() { path.to_path_buf() } else { config_dir.join(path) }
}
