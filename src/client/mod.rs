pub mod tenable;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AssetIntelError;
use crate::models::ScanSummary;

pub use memory::InMemorySource;
pub use tenable::TenableClient;

/// Which assets an export job should include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExportFilter {
    All,
    Tag { category: String, value: String },
}

impl std::fmt::Display for ExportFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFilter::All => f.write_str("all assets"),
            ExportFilter::Tag { category, value } => write!(f, "tag {}:{}", category, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportJobState {
    Queued,
    Processing,
    Finished,
    Cancelled,
    Error,
    Other(String),
}

impl ExportJobState {
    pub fn from_upstream(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => ExportJobState::Queued,
            "PROCESSING" => ExportJobState::Processing,
            "FINISHED" => ExportJobState::Finished,
            "CANCELLED" => ExportJobState::Cancelled,
            "ERROR" => ExportJobState::Error,
            _ => ExportJobState::Other(status.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatus {
    pub state: ExportJobState,
    pub chunks_available: Vec<u64>,
}

/// Remote side of the pipeline: the vulnerability-management platform.
///
/// Record-returning calls hand back raw JSON; normalization happens in the
/// core so that every source gets the same permissive treatment.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Submit an asset export job and return its id.
    async fn start_export(&self, filter: &ExportFilter, chunk_size: u32) -> Result<String, AssetIntelError>;

    async fn export_status(&self, export_id: &str) -> Result<ExportStatus, AssetIntelError>;

    async fn export_chunk(&self, export_id: &str, chunk_id: u64) -> Result<Vec<Value>, AssetIntelError>;

    async fn cancel_export(&self, export_id: &str) -> Result<(), AssetIntelError>;

    async fn list_scans(&self) -> Result<Vec<ScanSummary>, AssetIntelError>;

    /// Single-shot, non-paginated asset listing.
    async fn list_assets(&self) -> Result<Vec<Value>, AssetIntelError>;

    /// Look an asset up by hostname, address or id. `None` when unknown.
    async fn find_asset(&self, identifier: &str) -> Result<Option<Value>, AssetIntelError>;

    async fn asset_vulnerabilities(&self, asset_id: &str) -> Result<Vec<Value>, AssetIntelError>;

    /// Plugin catalog entry. `None` when the plugin id is unknown.
    async fn plugin_details(&self, plugin_id: u32) -> Result<Option<Value>, AssetIntelError>;

    /// Assets currently affected by a plugin, with per-asset counts.
    async fn plugin_assets(&self, plugin_id: u32) -> Result<Vec<Value>, AssetIntelError>;

    /// Source name for logging
    fn source_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_state_parsing() {
        assert_eq!(ExportJobState::from_upstream("finished"), ExportJobState::Finished);
        assert_eq!(ExportJobState::from_upstream("PROCESSING"), ExportJobState::Processing);
        assert_eq!(
            ExportJobState::from_upstream("PAUSED"),
            ExportJobState::Other("PAUSED".to_string())
        );
    }

    #[test]
    fn test_filter_display() {
        let filter = ExportFilter::Tag { category: "Location".into(), value: "London".into() };
        assert_eq!(filter.to_string(), "tag Location:London");
        assert_eq!(ExportFilter::All.to_string(), "all assets");
    }
}
