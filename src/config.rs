use std::path::PathBuf;

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::core::storage::StorageConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: bytesize::ByteSize,
    pub database_url: String,
    pub tmp_dir: String,
    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub access_token_secret: String,
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,
    pub refresh_token_secret: String,
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_access_token_expiry_minutes() -> i64 {
    24 * 60
}

fn default_refresh_token_expiry_days() -> i64 {
    10
}

fn default_secure_cookies() -> bool {
    true
}

impl Config {
    pub fn load(config_file: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config = ConfigLoader::builder()
            .add_source(File::from(config_file.into()).required(false))
            .add_source(Environment::with_prefix("VIDTUBE").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let config = Config::load("vidtube.toml").unwrap();
        assert_eq!(config.port, 8000);
        assert!(!config.database_url.is_empty());
        assert_eq!(config.auth.refresh_token_expiry_days, 10);
        assert!(matches!(config.storage, StorageConfig::Local(_)));
    }
}
