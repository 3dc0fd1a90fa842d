//! TOML configuration loading.
//!
//! A missing config file is created with defaults, so a fresh install always
//! starts from a known state.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use resik_core::config::ResikConfig;
use tokio::fs;

/// Loads the configuration from `path`.
///
/// If the file does not exist, defaults are written there and returned.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// the default file cannot be written.
pub async fn load_config(path: &Path) -> anyhow::Result<ResikConfig> {
    match fs::read_to_string(path).await {
        Ok(raw) => toml::from_str(&raw)
            .with_context(|| format!("Failed to parse configuration at {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(
                "No configuration at {}, writing defaults",
                path.display()
            );
            let config = ResikConfig::default();
            save_config(path, &config).await?;
            Ok(config)
        }
        Err(e) => Err(e).context("Failed to read configuration"),
    }
}

/// Saves the configuration to `path`, creating parent directories as needed.
pub async fn save_config(path: &Path, config: &ResikConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create configuration directory")?;
    }

    let raw = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, raw)
        .await
        .with_context(|| format!("Failed to write configuration at {}", path.display()))?;

    Ok(())
}
