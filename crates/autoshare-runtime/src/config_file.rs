//! TOML configuration file loading.

use anyhow::Context;
use autoshare_core::Config;

pub fn load_config(path: &str) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path}"))?;
    let config: Config =
        toml::from_str(&text).with_context(|| format!("failed to parse config file {path}"))?;
    Ok(config)
}
