//! Subcommand implementations

use anyhow::{Context, Result};
use docchat_core::{ApiClient, Config};

pub mod ask;
pub mod crop;
pub mod render;
pub mod upload;
pub mod watch;

/// Load config, let `--base-url` win, and build the backend client
pub fn connect(base_url: Option<String>) -> Result<ApiClient> {
    let mut config = Config::load()?;
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    client_for(&config)
}

fn client_for(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.base_url)
        .with_context(|| format!("Invalid backend URL '{}'", config.base_url))
}
