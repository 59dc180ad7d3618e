//! Remote rule cache management

use std::path::Path;

use judge::adapters::RemoteCache;
use judge::output::{CacheClearResult, OutputMode};

/// Remove every cached remote rule
pub fn cache_clear(path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let config = super::load_config(path)?;
    let cache = RemoteCache::new(&config.cache_dir);
    let removed = super::runtime()?.block_on(cache.clear())?;

    CacheClearResult {
        dir: config.cache_dir,
        removed,
    }
    .render(mode);
    Ok(())
}
