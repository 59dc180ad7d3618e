//! Show the resolved configuration

use std::path::Path;

use judge::output::OutputMode;

/// Print the config with defaults applied and paths resolved
pub fn show_config(path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let config = super::load_config(path)?;
    match mode {
        OutputMode::Human => print!("{}", toml::to_string_pretty(&config)?),
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
