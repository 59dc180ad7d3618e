//! Create a judge.toml

use std::fs;
use std::path::Path;

use judge::config::INIT_TEMPLATE;
use judge::output::{InitResult, OutputMode};

/// Write the config template to `path`
pub fn init(path: &Path, force: bool, mode: OutputMode) -> anyhow::Result<()> {
    if path.exists() && !force {
        InitResult {
            path: path.to_path_buf(),
            created: false,
        }
        .render(mode);
        return Ok(());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, INIT_TEMPLATE)?;

    InitResult {
        path: path.to_path_buf(),
        created: true,
    }
    .render(mode);
    Ok(())
}
