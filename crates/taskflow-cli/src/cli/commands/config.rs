//! Config command handlers.

use anyhow::{Context, Result};
use taskflow_core::config;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    // Same validation and normalization as at request time.
    let base_url = config::resolve_base_url(Some(url), None)?;
    let config_path = config::paths::config_path();
    config::Config::save_base_url_to(&config_path, &base_url)
        .with_context(|| format!("save config at {}", config_path.display()))?;
    println!("Set api_base_url to {base_url}");
    Ok(())
}
