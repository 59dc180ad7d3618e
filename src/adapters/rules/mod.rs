//! Rule store - resolves rule references to rule text
//!
//! Local paths are read from disk. URLs go through the [`RemoteCache`]:
//! an existing entry is reused whatever the reference's `cache` flag, which
//! only decides whether a fresh fetch is persisted.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::adapters::cache::{RemoteCache, ResponseHeaders};
use crate::core::error::CheckError;
use crate::core::models::{RuleContent, RuleReference};
use crate::core::ports::RuleSource;

/// How cached remote rules are trusted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessPolicy {
    /// Any cached entry is used as-is
    #[default]
    TrustCache,
    /// Send `HEAD` to the URL and refetch when the entry is stale
    ///
    /// If the HEAD request itself fails the cached entry is used.
    Revalidate,
}

/// [`RuleSource`] backed by the filesystem and HTTP
#[derive(Debug, Clone)]
pub struct RuleStore {
    cache: RemoteCache,
    client: reqwest::Client,
    policy: FreshnessPolicy,
}

impl RuleStore {
    /// Rule store caching remote documents under `cache_dir`
    pub fn new(cache_dir: impl Into<std::path::PathBuf>, policy: FreshnessPolicy) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("judge/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            cache: RemoteCache::new(cache_dir),
            client,
            policy,
        }
    }

    /// Underlying cache
    #[must_use]
    pub const fn cache(&self) -> &RemoteCache {
        &self.cache
    }

    /// Freshness policy in effect
    #[must_use]
    pub const fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    async fn read_local(&self, path: &str) -> Result<RuleContent, CheckError> {
        let content =
            tokio::fs::read_to_string(path).await.map_err(|source| CheckError::RuleRead {
                path: path.to_string(),
                source,
            })?;
        Ok(RuleContent::local(path, content))
    }

    async fn resolve_remote(&self, rule: &RuleReference) -> Result<RuleContent, CheckError> {
        let url = rule.path.as_str();

        if let Some(entry) = self.cache.get(url).await {
            let usable = match self.policy {
                FreshnessPolicy::TrustCache => true,
                FreshnessPolicy::Revalidate => match self.live_headers(url).await {
                    Some(live) => entry.is_fresh(&live, Utc::now()),
                    None => true,
                },
            };
            if usable {
                debug!("using cached copy of {url}");
                return Ok(RuleContent::remote(url, entry.content));
            }
            debug!("cached copy of {url} is stale, refetching");
        }

        let (content, headers) = self.fetch(url).await?;
        if rule.cache
            && let Err(err) = self.cache.set(url, &content, headers).await
        {
            warn!("could not cache {url}: {err}");
        }
        Ok(RuleContent::remote(url, content))
    }

    async fn fetch(&self, url: &str) -> Result<(String, ResponseHeaders), CheckError> {
        debug!("fetching {url}");
        let fetch_error = |reason: String| CheckError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| fetch_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(status.to_string()));
        }

        let headers = collect_headers(response.headers());
        let content = response.text().await.map_err(|err| fetch_error(err.to_string()))?;
        Ok((content, headers))
    }

    async fn live_headers(&self, url: &str) -> Option<ResponseHeaders> {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                Some(collect_headers(response.headers()))
            },
            Ok(response) => {
                warn!("freshness check for {url} returned {}, using cached copy", response.status());
                None
            },
            Err(err) => {
                warn!("freshness check for {url} failed, using cached copy: {err}");
                None
            },
        }
    }
}

#[async_trait]
impl RuleSource for RuleStore {
    async fn resolve(&self, rule: &RuleReference) -> Result<RuleContent, CheckError> {
        if rule.is_remote() {
            self.resolve_remote(rule).await
        } else {
            self.read_local(&rule.path).await
        }
    }
}

fn collect_headers(headers: &HeaderMap) -> ResponseHeaders {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}
