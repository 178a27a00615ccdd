// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

pub const ENV_BACKEND_URL: &str = "TRANSLATOR_BACKEND_URL";
pub const ENV_LISTEN: &str = "TRANSLATOR_LISTEN";

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(path, &contents)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(path: &Path, contents: &str) -> Result<Config> {
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );

    let config = if is_yaml {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")?
    };
    Ok(config)
}

/// Apply `TRANSLATOR_*` environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(raw) = lookup(ENV_BACKEND_URL) {
        config.backend.url = raw
            .parse()
            .with_context(|| format!("{} is not a valid URL: {:?}", ENV_BACKEND_URL, raw))?;
    }
    if let Some(raw) = lookup(ENV_LISTEN) {
        config.listen = raw
            .parse()
            .with_context(|| format!("{} is not a socket address: {:?}", ENV_LISTEN, raw))?;
    }
    Ok(())
}
