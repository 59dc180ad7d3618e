//! On-disk cache for remote rule documents
//!
//! One JSON file per URL, named by the SHA-256 hex digest of the URL.
//! There is no index: the file's existence is the existence check.
//!
//! Caching is an optimization. Read failures surface as misses and callers
//! treat write failures as "not persisted". Concurrent writers of the same
//! key are not coordinated; the last write wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::error::CacheError;

/// Response headers, keyed by lowercase header name
pub type ResponseHeaders = BTreeMap<String, String>;

/// Validity window when the response carries no freshness information
pub const DEFAULT_TTL: TimeDelta = TimeDelta::hours(1);

static MAX_AGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"max-age\s*=\s*(\d+)").ok());

/// A cached remote document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// Document text
    pub content: String,
    /// When the entry was written
    pub timestamp: DateTime<Utc>,
    /// Headers of the response the content came from
    pub headers: ResponseHeaders,
    /// SHA-256 hex digest of `content`
    pub hash: String,
}

impl CachedEntry {
    /// Capture `content` and its response headers now
    #[must_use]
    pub fn new(content: impl Into<String>, headers: ResponseHeaders) -> Self {
        Self::captured_at(content, headers, Utc::now())
    }

    /// Capture `content` at a given time
    #[must_use]
    pub fn captured_at(
        content: impl Into<String>,
        headers: ResponseHeaders,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let hash = digest(&content);
        Self {
            content,
            timestamp,
            headers,
            hash,
        }
    }

    /// Decide whether this entry is still valid given headers from a fresh HEAD request
    ///
    /// In order:
    /// 1. both carry an `etag`: valid iff the tags are equal
    /// 2. both carry `last-modified`: valid iff the live date is not later
    /// 3. a live `cache-control` `max-age`: valid while younger
    /// 4. otherwise valid for [`DEFAULT_TTL`] after capture
    #[must_use]
    pub fn is_fresh(&self, live: &ResponseHeaders, now: DateTime<Utc>) -> bool {
        if let (Some(live_tag), Some(cached_tag)) =
            (header(live, "etag"), header(&self.headers, "etag"))
        {
            return live_tag == cached_tag;
        }

        if let (Some(live_modified), Some(cached_modified)) =
            (header(live, "last-modified"), header(&self.headers, "last-modified"))
        {
            return match (parse_http_date(live_modified), parse_http_date(cached_modified)) {
                (Some(live), Some(cached)) => live <= cached,
                _ => false,
            };
        }

        let age = now.signed_duration_since(self.timestamp);
        match header(live, "cache-control").and_then(max_age_seconds) {
            Some(seconds) => age.num_milliseconds() < seconds.saturating_mul(1000),
            None => age < DEFAULT_TTL,
        }
    }
}

/// Filesystem cache of remote documents
#[derive(Debug, Clone)]
pub struct RemoteCache {
    dir: PathBuf,
}

impl RemoteCache {
    /// Cache stored under `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url`
    #[must_use]
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", digest(url)))
    }

    /// Read the entry for `url`
    ///
    /// Returns `Ok(None)` when nothing is cached.
    pub async fn try_get(&self, url: &str) -> Result<Option<CachedEntry>, CacheError> {
        let raw = match tokio::fs::read_to_string(self.entry_path(url)).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Read the entry for `url`, treating any failure as a miss
    pub async fn get(&self, url: &str) -> Option<CachedEntry> {
        match self.try_get(url).await {
            Ok(entry) => {
                debug!("cache {} for {url}", if entry.is_some() { "hit" } else { "miss" });
                entry
            },
            Err(err) => {
                warn!("treating unreadable cache entry for {url} as a miss: {err}");
                None
            },
        }
    }

    /// Persist `content` and its response headers for `url`
    pub async fn set(
        &self,
        url: &str,
        content: &str,
        headers: ResponseHeaders,
    ) -> Result<CachedEntry, CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let entry = CachedEntry::new(content, headers);
        let json = serde_json::to_string_pretty(&entry)?;
        tokio::fs::write(self.entry_path(url), json).await?;
        debug!("cached {url} ({} bytes)", content.len());
        Ok(entry)
    }

    /// Whether the cached entry for `url` is valid against live headers
    ///
    /// A missing entry is never valid.
    pub async fn is_valid(&self, url: &str, live: &ResponseHeaders) -> bool {
        self.get(url).await.is_some_and(|entry| entry.is_fresh(live, Utc::now()))
    }

    /// Remove every cached entry, returning how many were removed
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// SHA-256 hex digest
#[must_use]
pub fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

fn header<'h>(headers: &'h ResponseHeaders, name: &str) -> Option<&'h str> {
    headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
}

fn max_age_seconds(cache_control: &str) -> Option<i64> {
    MAX_AGE.as_ref()?.captures(cache_control)?.get(1)?.as_str().parse().ok()
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim()).ok().map(|d| d.with_timezone(&Utc))
}
