use tracing::debug;

use crate::client::tenable::DEFAULT_BASE_URL;
use crate::errors::AssetIntelError;
use super::types::{AppConfig, PlatformConfig, PlatformCredentials};

pub const ACCESS_KEY_VAR: &str = "TENABLE_ACCESS_KEY";
pub const SECRET_KEY_VAR: &str = "TENABLE_SECRET_KEY";
pub const BASE_URL_VAR: &str = "TENABLE_URL";

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Redact sensitive values in a string. Replaces known credential patterns
/// with [REDACTED].
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

/// Platform credentials from the process environment merged over the config
/// file.
pub fn platform_credentials(config: &AppConfig) -> Result<PlatformCredentials, AssetIntelError> {
    merge_credentials(config.platform.as_ref(), |name| std::env::var(name).ok())
}

/// Environment values win over file values; file values may themselves be
/// `$VAR` references.
pub fn merge_credentials<F>(
    file: Option<&PlatformConfig>,
    env: F,
) -> Result<PlatformCredentials, AssetIntelError>
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |var: &str, from_file: Option<&String>| -> Option<String> {
        env(var)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| from_file.map(|v| resolve_credential(v)))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && !v.starts_with('$'))
    };

    let access_key = pick(ACCESS_KEY_VAR, file.and_then(|p| p.access_key.as_ref()));
    let secret_key = pick(SECRET_KEY_VAR, file.and_then(|p| p.secret_key.as_ref()));
    let base_url = pick(BASE_URL_VAR, file.and_then(|p| p.base_url.as_ref()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    match (access_key, secret_key) {
        (Some(access_key), Some(secret_key)) => Ok(PlatformCredentials { base_url, access_key, secret_key }),
        _ => Err(AssetIntelError::Config(format!(
            "Tenable API keys are not configured: set {} and {} (or platform.access_key/secret_key in the config file)",
            ACCESS_KEY_VAR, SECRET_KEY_VAR
        ))),
    }
}
