//! Project configuration (`judge.toml`)
//!
//! The file is parsed into [`ConfigFile`], checked, and resolved into a
//! [`Config`]: defaults applied, relative locations anchored at the config
//! file's directory, bindings turned into [`RuleBinding`]s.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::oracle::Provider;
use crate::adapters::rules::FreshnessPolicy;
use crate::core::models::{
    DEFAULT_CONFIDENCE_THRESHOLD, FilePatterns, RuleBinding, RuleReference, Severity, is_url,
};
use crate::core::services::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT, Scheduling, compile_glob};
use crate::paths;

/// The only supported config schema version
pub const CONFIG_VERSION: &str = "1.0";

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file at the given path
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Config path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the schema
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Config path
        path: PathBuf,
        /// TOML error
        source: toml::de::Error,
    },

    /// The config file parsed but breaks a constraint
    #[error("invalid config {}: {reason}", path.display())]
    Invalid {
        /// Config path
        path: PathBuf,
        /// What is wrong
        reason: String,
    },
}

/// `judge.toml` as written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Schema version, must be `"1.0"`
    pub version: String,
    /// Oracle backend
    #[serde(default)]
    pub provider: Provider,
    /// Program and arguments for `provider = "command"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Oracle timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Remote rule cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Exit non-zero when the verdict fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_issues: Option<bool>,
    /// Bindings evaluated at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_checks: Option<usize>,
    /// How bindings share the concurrency cap
    #[serde(default)]
    pub scheduling: Scheduling,
    /// Revalidate remote rules with HEAD before trusting the cache
    #[serde(default)]
    pub revalidate_remote: bool,
    /// Rule bindings
    #[serde(default)]
    pub rule_bindings: Vec<BindingEntry>,
}

/// A `[[rule_bindings]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingEntry {
    /// Unique binding name
    pub name: String,
    /// File patterns
    pub files: FilePatterns,
    /// Rule documents
    pub rules: Vec<RuleEntry>,
    /// Severity that fails the run (default `error`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Severity>,
    /// Minimum issue confidence (default 0.8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

/// One entry of a binding's `rules`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    /// Path (relative to the config file) or URL
    pub path: String,
    /// Persist remote fetches (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Config file this was loaded from
    #[serde(skip)]
    pub path: PathBuf,
    /// Schema version
    pub version: String,
    /// Oracle backend
    pub provider: Provider,
    /// Custom oracle argv
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Oracle timeout in seconds
    pub timeout: u64,
    /// Remote rule cache directory
    pub cache_dir: PathBuf,
    /// Exit non-zero when the verdict fails
    pub fail_on_issues: bool,
    /// Bindings evaluated at once
    pub max_concurrent_checks: usize,
    /// Scheduling strategy
    pub scheduling: Scheduling,
    /// Revalidate remote rules before trusting the cache
    pub revalidate_remote: bool,
    /// Resolved bindings
    pub rule_bindings: Vec<RuleBinding>,
}

impl Config {
    /// Load and resolve the config at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml(&content, path)
    }

    /// Parse and resolve config text as if it were loaded from `path`
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        file.resolve(path)
    }

    /// Oracle timeout
    #[must_use]
    pub const fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Cache trust policy for remote rules
    #[must_use]
    pub const fn freshness(&self) -> FreshnessPolicy {
        if self.revalidate_remote { FreshnessPolicy::Revalidate } else { FreshnessPolicy::TrustCache }
    }

    /// Directory relative paths were resolved against
    #[must_use]
    pub fn root(&self) -> PathBuf {
        paths::config_dir(&self.path)
    }
}

impl ConfigFile {
    /// Check constraints and resolve into a [`Config`]
    pub fn resolve(self, path: &Path) -> Result<Config, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        };
        self.validate().map_err(invalid)?;

        let dir = paths::config_dir(path);
        let rule_bindings = self
            .rule_bindings
            .into_iter()
            .map(|entry| resolve_binding(entry, &dir))
            .collect();

        Ok(Config {
            path: path.to_path_buf(),
            version: self.version,
            provider: self.provider,
            command: self.command,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT.as_secs()),
            cache_dir: paths::resolve(
                &dir,
                self.cache_dir.as_deref().unwrap_or(paths::DEFAULT_CACHE_DIR),
            ),
            fail_on_issues: self.fail_on_issues.unwrap_or(true),
            max_concurrent_checks: self.max_concurrent_checks.unwrap_or(DEFAULT_MAX_CONCURRENT),
            scheduling: self.scheduling,
            revalidate_remote: self.revalidate_remote,
            rule_bindings,
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.version != CONFIG_VERSION {
            return Err(format!(
                "unsupported version {:?} (expected {CONFIG_VERSION:?})",
                self.version
            ));
        }
        if self.provider == Provider::Command && self.command.is_empty() {
            return Err("provider \"command\" requires a non-empty `command`".to_string());
        }
        if self.timeout == Some(0) {
            return Err("timeout must be positive".to_string());
        }
        if self.max_concurrent_checks == Some(0) {
            return Err("max_concurrent_checks must be positive".to_string());
        }

        let mut names = HashSet::new();
        for binding in &self.rule_bindings {
            binding.validate()?;
            if !names.insert(binding.name.as_str()) {
                return Err(format!("duplicate binding name {:?}", binding.name));
            }
        }
        Ok(())
    }
}

impl BindingEntry {
    fn validate(&self) -> Result<(), String> {
        let name = &self.name;
        if name.trim().is_empty() {
            return Err("binding name must not be empty".to_string());
        }
        if self.files.include.is_empty() {
            return Err(format!("binding {name:?}: files.include must not be empty"));
        }
        if self.rules.is_empty() {
            return Err(format!("binding {name:?}: rules must not be empty"));
        }
        if let Some(rule) = self.rules.iter().find(|r| r.path.trim().is_empty()) {
            return Err(format!("binding {name:?}: empty rule path {:?}", rule.path));
        }
        if let Some(threshold) = self.confidence_threshold
            && !(0.0..=1.0).contains(&threshold)
        {
            return Err(format!(
                "binding {name:?}: confidence_threshold {threshold} is outside [0, 1]"
            ));
        }
        for pattern in self.files.include.iter().chain(&self.files.exclude) {
            compile_glob(pattern)
                .map_err(|err| format!("binding {name:?}: invalid pattern {pattern:?}: {err}"))?;
        }
        Ok(())
    }
}

fn resolve_binding(entry: BindingEntry, dir: &Path) -> RuleBinding {
    let rules = entry
        .rules
        .into_iter()
        .map(|rule| {
            let path = if is_url(&rule.path) {
                rule.path
            } else {
                paths::resolve(dir, &rule.path).to_string_lossy().into_owned()
            };
            RuleReference {
                path,
                cache: rule.cache.unwrap_or(true),
            }
        })
        .collect();

    RuleBinding {
        name: entry.name,
        files: entry.files,
        rules,
        fail_on: entry.fail_on.unwrap_or_default(),
        confidence_threshold: entry.confidence_threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
    }
}

/// Template written by `judge init`
pub const INIT_TEMPLATE: &str = r#"# judge configuration

version = "1.0"

# Oracle: "claude", "gemini", or "command" (set `command` below)
provider = "claude"
# command = ["my-reviewer", "--json"]

# Seconds the oracle may take per rule
timeout = 120

# Where fetched remote rules are cached
cache_dir = ".judge-cache"

# Exit non-zero when a binding fails
fail_on_issues = true

# Bindings checked at once; "batched" waits for a whole group, "window" refills slots
max_concurrent_checks = 5
scheduling = "batched"

# Revalidate remote rules with HEAD before trusting the cache
revalidate_remote = false

[[rule_bindings]]
name = "example-spec-compliance"
fail_on = "error"
confidence_threshold = 0.8

[rule_bindings.files]
include = ["src/**/*.ts", "src/**/*.js"]
exclude = ["**/*.test.ts", "**/*.spec.ts"]

[[rule_bindings.rules]]
path = "docs/example-spec.md"

# [[rule_bindings.rules]]
# path = "https://example.com/spec.md"
# cache = true
"#;
