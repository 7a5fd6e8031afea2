use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::RetryConfig;
use crate::pipeline::ExportOptions;

pub const DEFAULT_STORE_PATH: &str = "assets.csv";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    pub platform: Option<PlatformConfig>,
    pub export: Option<ExportConfig>,
    pub store: Option<StoreConfig>,
}

/// Platform section as written in the file. Key values may be `$VAR`
/// references.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PlatformConfig {
    pub base_url: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExportConfig {
    pub chunk_size: Option<u32>,
    pub poll_interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

/// Fully resolved connection settings for the platform client.
#[derive(Clone)]
pub struct PlatformCredentials {
    pub base_url: String,
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("base_url", &self.base_url)
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl AppConfig {
    pub fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        let Some(export) = &self.export else {
            return defaults;
        };
        ExportOptions {
            chunk_size: export.chunk_size.unwrap_or(defaults.chunk_size),
            poll_interval: export
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            timeout: export.timeout_secs.map(Duration::from_secs).unwrap_or(defaults.timeout),
            retry: RetryConfig {
                max_retries: export.max_retries.unwrap_or(defaults.retry.max_retries),
                ..defaults.retry
            },
        }
    }

    /// Store path: command-line value, then the file, then `assets.csv`.
    pub fn store_path(&self, cli_path: Option<PathBuf>) -> PathBuf {
        cli_path
            .or_else(|| self.store.as_ref().and_then(|s| s.path.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_options_defaults() {
        let options = AppConfig::default().export_options();
        assert_eq!(options.chunk_size, 1000);
        assert_eq!(options.poll_interval, Duration::from_secs(5));
        assert_eq!(options.timeout, Duration::from_secs(3600));
        assert_eq!(options.retry.max_retries, 3);
    }

    #[test]
    fn test_export_options_partial_override() {
        let config = AppConfig {
            export: Some(ExportConfig {
                poll_interval_secs: Some(1),
                max_retries: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let options = config.export_options();
        assert_eq!(options.poll_interval, Duration::from_secs(1));
        assert_eq!(options.retry.max_retries, 0);
        assert_eq!(options.chunk_size, 1000);
    }

    #[test]
    fn test_store_path_precedence() {
        let config = AppConfig {
            store: Some(StoreConfig { path: Some(PathBuf::from("inventory.db")) }),
            ..Default::default()
        };
        assert_eq!(config.store_path(None), PathBuf::from("inventory.db"));
        assert_eq!(
            config.store_path(Some(PathBuf::from("cli.json"))),
            PathBuf::from("cli.json")
        );
        assert_eq!(AppConfig::default().store_path(None), PathBuf::from("assets.csv"));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = PlatformCredentials {
            base_url: "https://cloud.tenable.com".into(),
            access_key: "ak-123456".into(),
            secret_key: "sk-654321".into(),
        };
        let printed = format!("{:?}", credentials);
        assert!(!printed.contains("ak-123456"));
        assert!(!printed.contains("sk-654321"));
    }
}
