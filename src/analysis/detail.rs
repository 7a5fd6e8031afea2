use std::cmp::Ordering;
use tracing::{debug, info};

use crate::client::AssetSource;
use crate::errors::AssetIntelError;
use crate::models::{AssetDetail, AssetRow, Limit, RowOrigin, SeveritySummary, VulnFinding};
use crate::normalize::normalize_record;
use super::resolver::ResolvedRows;

/// Resolve one asset and attach its current vulnerabilities.
///
/// The asset is looked up by hostname in `local` first and through the
/// platform otherwise. Vulnerabilities are always fetched live, exactly once.
pub async fn detail(
    identifier: &str,
    local: Option<&ResolvedRows>,
    vuln_limit: Limit,
    source: &dyn AssetSource,
) -> Result<AssetDetail, AssetIntelError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AssetIntelError::InvalidArgument("asset identifier must not be empty".into()));
    }

    let (asset, origin) = match find_local(identifier, local) {
        Some(found) => found,
        None => (find_remote(identifier, source).await?, RowOrigin::Live),
    };
    info!(identifier, asset_id = %asset.id, origin = %origin, "Resolved asset");

    let raw = source.asset_vulnerabilities(&asset.id).await?;
    let findings: Vec<VulnFinding> = raw.iter().filter_map(VulnFinding::from_value).collect();
    if findings.len() < raw.len() {
        debug!(skipped = raw.len() - findings.len(), "Skipped vulnerability records without plugin id");
    }

    let summary = SeveritySummary::from_findings(&findings);
    let vulnerabilities = vuln_limit.apply(order_findings(findings));

    Ok(AssetDetail { asset, origin, summary, vulnerabilities })
}

fn find_local(identifier: &str, local: Option<&ResolvedRows>) -> Option<(AssetRow, RowOrigin)> {
    let resolved = local?;
    let row = resolved
        .rows
        .iter()
        .find(|row| !row.hostname.is_empty() && row.hostname.eq_ignore_ascii_case(identifier))?;
    Some((row.clone(), resolved.origin.clone()))
}

async fn find_remote(identifier: &str, source: &dyn AssetSource) -> Result<AssetRow, AssetIntelError> {
    let not_found = || AssetIntelError::AssetNotFound { identifier: identifier.to_string() };
    let raw = source.find_asset(identifier).await?.ok_or_else(not_found)?;
    normalize_record(&raw).map_err(|e| {
        debug!(identifier, error = %e, "Live lookup returned an unusable record");
        not_found()
    })
}

/// Severity first (Critical .. Info), then VPR descending with unscored
/// findings last. Stable, so remaining ties keep the platform's order.
pub fn order_findings(mut findings: Vec<VulnFinding>) -> Vec<VulnFinding> {
    findings.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| match (a.vpr_score, b.vpr_score) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    findings
}
