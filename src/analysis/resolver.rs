//! Two-step row resolution: the local asset store first, then a live listing.

use tracing::{info, warn};

use crate::client::AssetSource;
use crate::errors::AssetIntelError;
use crate::models::{AssetRow, RowOrigin};
use crate::normalize::normalize_batch;
use crate::store::AssetStore;

/// Rows plus where they came from.
#[derive(Debug, Clone)]
pub struct ResolvedRows {
    pub origin: RowOrigin,
    pub rows: Vec<AssetRow>,
    /// Live records dropped by normalization. Always zero for store rows.
    pub rejected: usize,
}

/// Step one: rows from the persisted store.
pub fn local_rows(store: &AssetStore) -> Result<ResolvedRows, AssetIntelError> {
    let rows = store.load()?;
    Ok(ResolvedRows {
        origin: RowOrigin::Store { path: store.path().to_path_buf() },
        rows,
        rejected: 0,
    })
}

/// Step two: one live, non-paginated listing normalized like an export.
pub async fn live_rows(source: &dyn AssetSource) -> Result<ResolvedRows, AssetIntelError> {
    let records = source.list_assets().await?;
    let outcome = normalize_batch(&records);
    if outcome.rejected > 0 {
        warn!(
            source = source.source_name(),
            rejected = outcome.rejected,
            "Live listing contained records without an id"
        );
    }
    Ok(ResolvedRows { origin: RowOrigin::Live, rows: outcome.rows, rejected: outcome.rejected })
}

/// Try the store, fall back to the live listing when no store was given or it
/// is unavailable. Any other failure, including a failing live listing, is
/// returned to the caller.
pub async fn resolve_rows(
    store: Option<&AssetStore>,
    source: &dyn AssetSource,
) -> Result<ResolvedRows, AssetIntelError> {
    match store {
        Some(store) => match local_rows(store) {
            Ok(resolved) => return Ok(resolved),
            Err(e @ AssetIntelError::StoreUnavailable { .. }) => {
                warn!(error = %e, "Asset store unavailable, falling back to live asset listing");
            }
            Err(e) => return Err(e),
        },
        None => info!("No asset store supplied, using live asset listing"),
    }
    live_rows(source).await
}

/// Store rows when the store loads; `None` (with a warning) when it does not.
pub fn optional_local_rows(store: Option<&AssetStore>) -> Option<ResolvedRows> {
    let store = store?;
    match local_rows(store) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            warn!(error = %e, "Asset store unavailable, resolving live");
            None
        }
    }
}
