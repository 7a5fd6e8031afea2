use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetIntelError {
    #[error("Malformed record: field '{field}' {reason}")]
    MalformedRecord { field: String, reason: String },

    #[error("Asset store unavailable at '{path}': {reason}")]
    StoreUnavailable { path: String, reason: String },

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Asset not found: {identifier}")]
    AssetNotFound { identifier: String },

    #[error("Plugin not found: {plugin_id}")]
    PluginNotFound { plugin_id: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission error: {0}")]
    Permission(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssetIntelError {
    pub fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { field: field.to_string(), reason: reason.into() }
    }

    pub fn store_unavailable(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable { path: path.display().to_string(), reason: reason.to_string() }
    }
}
