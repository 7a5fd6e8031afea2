use std::path::Path;
use crate::errors::AssetIntelError;
use super::types::AppConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

/// Load the config file if one was given, otherwise start from defaults.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig, AssetIntelError> {
    match path {
        Some(path) => parse_config(path).await,
        None => Ok(AppConfig::default()),
    }
}

pub async fn parse_config(path: &Path) -> Result<AppConfig, AssetIntelError> {
    if !path.exists() {
        return Err(AssetIntelError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(AssetIntelError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = parse_config_str(&content)?;
    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<AppConfig, AssetIntelError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(AppConfig::default());
    }

    validate_schema(&yaml)?;

    let config: AppConfig = serde_yaml::from_value(yaml)?;
    validate_settings(&config)?;
    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), AssetIntelError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| AssetIntelError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| AssetIntelError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        // Advisory only; the typed parse and validate_settings are authoritative.
        for error in errors {
            warn!(validation_error = %format!("{} at {}", error, error.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject settings the export driver cannot work with.
fn validate_settings(config: &AppConfig) -> Result<(), AssetIntelError> {
    if let Some(export) = &config.export {
        if export.chunk_size == Some(0) {
            return Err(AssetIntelError::Config("export.chunk_size must be positive".into()));
        }
        if export.poll_interval_secs == Some(0) {
            return Err(AssetIntelError::Config("export.poll_interval_secs must be positive".into()));
        }
        if export.timeout_secs == Some(0) {
            return Err(AssetIntelError::Config("export.timeout_secs must be positive".into()));
        }
        if let (Some(poll), Some(timeout)) = (export.poll_interval_secs, export.timeout_secs) {
            if poll > timeout {
                warn!(poll, timeout, "Export poll interval is longer than the export timeout");
            }
        }
    }

    if let Some(base_url) = config.platform.as_ref().and_then(|p| p.base_url.as_deref()) {
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(AssetIntelError::Config(format!(
                "platform.base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }
    }

    if let Some(store) = &config.store {
        if store.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(AssetIntelError::Config("store.path must not be empty".into()));
        }
    }

    Ok(())
}
