//! File matcher service - partitions files across rule bindings
//!
//! A file is first checked against the project's `.gitignore` (git's own
//! dialect: bare names match at any depth, `dir/` matches the whole
//! subtree, `!` re-includes). Surviving files are matched against every
//! binding's include/exclude globs; there is no first-match-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::{debug, warn};

use crate::core::models::RuleBinding;
use crate::paths;

/// Result of matching files against bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Binding name to matched files, in input file order
    pub binding_files: BTreeMap<String, Vec<String>>,
    /// File to the names of the bindings it satisfies, in binding order
    pub file_bindings: BTreeMap<String, Vec<String>>,
    /// Files that matched no binding
    pub unmatched: Vec<String>,
    /// Files excluded by the ignore file before binding matching
    pub ignored: Vec<String>,
}

impl MatchResult {
    /// Files matched by a binding (empty if none)
    #[must_use]
    pub fn files_for(&self, binding: &str) -> &[String] {
        self.binding_files.get(binding).map(Vec::as_slice).unwrap_or_default()
    }

    /// Bindings a file satisfies (empty if none)
    #[must_use]
    pub fn bindings_for(&self, file: &str) -> &[String] {
        self.file_bindings.get(file).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Matches files to rule bindings, honouring a project ignore file
#[derive(Debug, Clone)]
pub struct FileMatcher {
    root: PathBuf,
    ignore: Gitignore,
}

impl FileMatcher {
    /// A matcher with an empty ignore list
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: Gitignore::empty(),
        }
    }

    /// Load `.gitignore` from `root`
    ///
    /// A missing or unreadable ignore file yields an empty ignore list.
    #[must_use]
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = root.join(paths::GITIGNORE);
        if !path.is_file() {
            debug!("no ignore file at {}", path.display());
            return Self::new(root);
        }

        let mut builder = GitignoreBuilder::new(&root);
        if let Some(err) = builder.add(&path) {
            warn!("ignoring unreadable {}: {err}", path.display());
            return Self::new(root);
        }
        Self::build(root, &builder)
    }

    /// Build a matcher from ignore-file lines (same syntax as `.gitignore`)
    #[must_use]
    pub fn with_ignore_lines<I, S>(root: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);
        for line in lines {
            if let Err(err) = builder.add_line(None, line.as_ref()) {
                warn!("skipping ignore pattern {:?}: {err}", line.as_ref());
            }
        }
        Self::build(root, &builder)
    }

    fn build(root: PathBuf, builder: &GitignoreBuilder) -> Self {
        match builder.build() {
            Ok(ignore) => Self { root, ignore },
            Err(err) => {
                warn!("ignore patterns could not be compiled: {err}");
                Self::new(root)
            },
        }
    }

    /// Root the ignore patterns are relative to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a file is excluded by the ignore list
    #[must_use]
    pub fn is_ignored(&self, file: &str) -> bool {
        if self.ignore.is_empty() {
            return false;
        }
        let path = Path::new(file);
        let relative = if path.is_absolute() {
            match path.strip_prefix(&self.root) {
                Ok(rel) => rel,
                // Outside the project: no ignore rule can apply
                Err(_) => return false,
            }
        } else {
            path
        };
        self.ignore.matched_path_or_any_parents(relative, false).is_ignore()
    }

    /// Partition `files` across `bindings`
    #[must_use]
    pub fn match_files(&self, files: &[String], bindings: &[RuleBinding]) -> MatchResult {
        let compiled: Vec<CompiledBinding<'_>> = bindings.iter().map(CompiledBinding::new).collect();
        let mut result = MatchResult::default();

        for file in files {
            if self.is_ignored(file) {
                result.ignored.push(file.clone());
                continue;
            }

            let matching: Vec<&str> =
                compiled.iter().filter(|b| b.matches(file)).map(|b| b.name).collect();

            if matching.is_empty() {
                result.unmatched.push(file.clone());
                continue;
            }

            for name in &matching {
                result.binding_files.entry((*name).to_string()).or_default().push(file.clone());
            }
            result
                .file_bindings
                .insert(file.clone(), matching.into_iter().map(String::from).collect());
        }

        debug!(
            "matched {} file(s): {} unmatched, {} ignored",
            files.len(),
            result.unmatched.len(),
            result.ignored.len()
        );
        result
    }
}

/// A binding with its globs compiled once per match run
struct CompiledBinding<'a> {
    name: &'a str,
    include: GlobSet,
    exclude: GlobSet,
}

impl<'a> CompiledBinding<'a> {
    fn new(binding: &'a RuleBinding) -> Self {
        Self {
            name: &binding.name,
            include: compile_globset(&binding.name, &binding.files.include),
            exclude: compile_globset(&binding.name, &binding.files.exclude),
        }
    }

    fn matches(&self, file: &str) -> bool {
        // An empty exclude set never matches, so an empty list excludes nothing
        self.include.is_match(file) && !self.exclude.is_match(file)
    }
}

/// Compile a glob for binding patterns
///
/// `*` and `?` never cross a `/`; `**` spans directories; braces and
/// bracket classes are supported.
///
/// # Errors
///
/// Returns an error if the pattern is not a valid glob.
pub fn compile_glob(pattern: &str) -> Result<globset::Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

fn compile_globset(binding: &str, patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match compile_glob(pattern) {
            Ok(glob) => {
                builder.add(glob);
            },
            Err(err) => warn!("binding {binding}: skipping invalid pattern {pattern:?}: {err}"),
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!("binding {binding}: patterns could not be compiled: {err}");
        GlobSet::empty()
    })
}
