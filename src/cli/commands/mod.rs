//! Command implementations

mod cache;
mod check;
mod config;
mod init;

pub use cache::cache_clear;
pub use check::check;
pub use config::show_config;
pub use init::init;

use std::path::Path;

use judge::config::{Config, ConfigError};

/// Load the config, pointing at `judge init` when there is none
fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).map_err(|err| match err {
        ConfigError::NotFound(_) => {
            anyhow::anyhow!("{err}\nRun 'judge init' to create a configuration file")
        },
        other => other.into(),
    })
}

/// Runtime for the async library calls
fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}
