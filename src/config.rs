use crate::error::{Error, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub webhook_secret: Option<String>,
    pub default_repo: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .map_err(|_| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))?;

        // No secret means webhook signature verification is skipped.
        let webhook_secret = env::var("GITHUB_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let default_repo = env::var("DEFAULT_REPO").unwrap_or_else(|_| "owner/repo-name".to_string());

        let bind_host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let bind_port = env::var("BIND_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Ok(Self {
            github_token,
            webhook_secret,
            default_repo,
            bind_host,
            bind_port,
            cache_ttl_secs,
        })
    }
}
