use serde::Serialize;
use tracing::info;

use crate::client::AssetSource;
use crate::errors::AssetIntelError;
use crate::models::{AssetRow, RowOrigin};
use crate::store::AssetStore;
use super::resolver::resolve_rows;

/// Search result with the origin of the rows it was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub origin: RowOrigin,
    pub matches: Vec<AssetRow>,
}

/// Resolve rows (store first, live listing otherwise) and search them.
pub async fn search_assets(
    query: &str,
    store: Option<&AssetStore>,
    source: &dyn AssetSource,
) -> Result<SearchOutcome, AssetIntelError> {
    if query.trim().is_empty() {
        return Err(AssetIntelError::InvalidArgument("search query must not be empty".into()));
    }
    let resolved = resolve_rows(store, source).await?;
    let matches = search(query, &resolved.rows)?;
    info!(
        query,
        origin = %resolved.origin,
        scanned = resolved.rows.len(),
        matches = matches.len(),
        "Asset search complete"
    );
    Ok(SearchOutcome { query: query.to_string(), origin: resolved.origin, matches })
}

/// Case-insensitive substring search over hostname, IPv4 addresses and id.
///
/// Each matching row appears once. Hostname matches come first, then address
/// matches, then id matches; each group keeps load order.
pub fn search(query: &str, rows: &[AssetRow]) -> Result<Vec<AssetRow>, AssetIntelError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AssetIntelError::InvalidArgument("search query must not be empty".into()));
    }

    let mut by_hostname = Vec::new();
    let mut by_address = Vec::new();
    let mut by_id = Vec::new();

    for row in rows {
        if row.hostname.to_lowercase().contains(&needle) {
            by_hostname.push(row.clone());
        } else if row.ipv4.iter().any(|ip| ip.to_lowercase().contains(&needle)) {
            by_address.push(row.clone());
        } else if row.id.to_lowercase().contains(&needle) {
            by_id.push(row.clone());
        }
    }

    by_hostname.extend(by_address);
    by_hostname.extend(by_id);
    Ok(by_hostname)
}
