//! File and rule content handed to the oracle

use serde::{Deserialize, Serialize};

/// An implementation file's text plus a best-effort language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Path as given by the caller
    pub path: String,
    /// Raw text
    pub content: String,
    /// Language tag derived from the extension
    pub language: String,
}

impl FileContent {
    /// Build file content, deriving the language tag from `path`
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let language = language_for_path(&path);
        Self {
            path,
            content: content.into(),
            language,
        }
    }
}

/// Rule document text, with its source URL when fetched remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContent {
    /// Path or URL of the rule
    pub path: String,
    /// Rule text
    pub content: String,
    /// Set when the content came from a remote reference
    pub source_url: Option<String>,
}

impl RuleContent {
    /// Rule content read from a local file
    pub fn local(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            source_url: None,
        }
    }

    /// Rule content retrieved from (or cached for) a URL
    pub fn remote(url: impl Into<String>, content: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            path: url.clone(),
            content: content.into(),
            source_url: Some(url),
        }
    }
}

/// Language tag for a path's extension
///
/// The table is case-sensitive; unknown extensions pass through unchanged
/// and a path without an extension yields an empty tag. A dotfile such as
/// `.gitignore` has no extension.
#[must_use]
pub fn language_for_path(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file_name.strip_prefix('.').unwrap_or(file_name);
    let ext = stem.rsplit_once('.').map_or("", |(_, ext)| ext);
    language_for_extension(ext).to_string()
}

/// Language tag for a bare extension (no leading dot)
#[must_use]
pub fn language_for_extension(ext: &str) -> &str {
    match ext {
        "ts" | "tsx" => "typescript",
        "js" | "jsx" => "javascript",
        "py" => "python",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "swift" => "swift",
        "kt" => "kotlin",
        "sh" => "bash",
        "yml" | "yaml" => "yaml",
        "json" => "json",
        "md" => "markdown",
        other => other,
    }
}
