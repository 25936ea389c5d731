use anyhow::Context;
use protocol::config::{validate_client_config, ClientConfig};
use std::path::Path;

use crate::cli::Args;

/// Reads the client config. A missing file is not an error.
pub(crate) fn load_client_config(path: &Path) -> anyhow::Result<ClientConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config not found, using defaults");
        return Ok(ClientConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ClientConfig::from_toml(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

pub(crate) fn resolve_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = load_client_config(&args.config)?;
    if let Some(service_url) = &args.service_url {
        config.service_url = service_url.clone();
    }
    if let Some(skin) = args.skin {
        config.skin = skin;
    }
    validate_client_config(&config)
        .map_err(|err| anyhow::anyhow!("invalid config {}: {err}", args.config.display()))?;
    tracing::info!(
        service_url = %config.service_url,
        skin = %config.skin,
        "config resolved"
    );
    Ok(config)
}
