use tracing::debug;
use crate::client::AssetSource;
use crate::errors::AssetIntelError;
use crate::models::ScanSummary;

/// Scans whose status is exactly `completed`; every other status is dropped.
pub async fn completed_scans(source: &dyn AssetSource) -> Result<Vec<ScanSummary>, AssetIntelError> {
    let scans = source.list_scans().await?;
    let total = scans.len();
    let completed: Vec<ScanSummary> = scans.into_iter().filter(ScanSummary::is_completed).collect();
    debug!(total, completed = completed.len(), "Filtered scan list");
    Ok(completed)
}
