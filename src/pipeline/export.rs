use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{AssetSource, ExportFilter, ExportJobState};
use crate::errors::{with_retry, AssetIntelError, RetryConfig};
use crate::normalize::normalize_batch;
use crate::store::AssetStore;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub chunk_size: u32,
    pub poll_interval: Duration,
    /// Upper bound for the whole job, from submission to the last chunk.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(3600),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub filter: ExportFilter,
    pub exported: usize,
    pub rejected: usize,
    /// False when the job returned no usable rows and nothing was written.
    pub written: bool,
}

enum Interrupted {
    Cancelled,
    TimedOut,
}

/// Export, normalize and persist. The store is only touched after the job
/// completed; an `ExportFailed` leaves any previous file in place.
pub async fn export_assets(
    source: &dyn AssetSource,
    filter: &ExportFilter,
    store: &AssetStore,
    options: &ExportOptions,
    cancel: &CancellationToken,
) -> Result<ExportSummary, AssetIntelError> {
    let records = run_export_job(source, filter, options, cancel).await?;
    let outcome = normalize_batch(&records);
    if outcome.rejected > 0 {
        warn!(rejected = outcome.rejected, "Export contained records without an id");
    }

    let mut summary = ExportSummary {
        path: store.path().to_path_buf(),
        filter: filter.clone(),
        exported: outcome.rows.len(),
        rejected: outcome.rejected,
        written: false,
    };

    if outcome.rows.is_empty() {
        warn!(filter = %filter, "No assets found, asset store not written");
        return Ok(summary);
    }

    store.save(&outcome.rows)?;
    summary.written = true;
    info!(
        filter = %filter,
        exported = summary.exported,
        rejected = summary.rejected,
        path = %summary.path.display(),
        "Asset export complete"
    );
    Ok(summary)
}

/// Submit an export job and block until every chunk is downloaded.
///
/// Job errors, platform-side cancellation, the overall timeout and `cancel`
/// all end in `ExportFailed`; timeout and local cancellation also ask the
/// platform to cancel the job.
pub async fn run_export_job(
    source: &dyn AssetSource,
    filter: &ExportFilter,
    options: &ExportOptions,
    cancel: &CancellationToken,
) -> Result<Vec<Value>, AssetIntelError> {
    if cancel.is_cancelled() {
        return Err(AssetIntelError::ExportFailed("cancelled before the job was submitted".into()));
    }

    let export_id = with_retry("start_export", &options.retry, || {
        source.start_export(filter, options.chunk_size)
    })
    .await
    .map_err(|e| AssetIntelError::ExportFailed(format!("could not start export job: {}", e)))?;
    info!(export_id = %export_id, filter = %filter, source = source.source_name(), "Export job submitted");

    let job = poll_until_complete(source, &export_id, options);
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        finished = tokio::time::timeout(options.timeout, job) => finished.map_err(|_| Interrupted::TimedOut),
    };

    match result {
        Ok(records) => records,
        Err(reason) => {
            if let Err(e) = source.cancel_export(&export_id).await {
                warn!(export_id = %export_id, error = %e, "Failed to cancel export job on the platform");
            }
            let message = match reason {
                Interrupted::Cancelled => format!("export job {} cancelled by user", export_id),
                Interrupted::TimedOut => format!(
                    "export job {} did not finish within {}s",
                    export_id,
                    options.timeout.as_secs()
                ),
            };
            Err(AssetIntelError::ExportFailed(message))
        }
    }
}

async fn poll_until_complete(
    source: &dyn AssetSource,
    export_id: &str,
    options: &ExportOptions,
) -> Result<Vec<Value>, AssetIntelError> {
    let failed = |e: AssetIntelError| AssetIntelError::ExportFailed(format!("export job {}: {}", export_id, e));
    let mut fetched: HashSet<u64> = HashSet::new();
    let mut records = Vec::new();

    loop {
        let status = with_retry("export_status", &options.retry, || source.export_status(export_id))
            .await
            .map_err(failed)?;

        for &chunk_id in &status.chunks_available {
            if !fetched.insert(chunk_id) {
                continue;
            }
            let chunk = with_retry("export_chunk", &options.retry, || source.export_chunk(export_id, chunk_id))
                .await
                .map_err(failed)?;
            debug!(export_id, chunk_id, records = chunk.len(), "Downloaded export chunk");
            records.extend(chunk);
        }

        match status.state {
            ExportJobState::Finished => {
                info!(export_id, chunks = fetched.len(), records = records.len(), "Export job finished");
                return Ok(records);
            }
            ExportJobState::Cancelled => {
                return Err(AssetIntelError::ExportFailed(format!(
                    "export job {} was cancelled on the platform",
                    export_id
                )));
            }
            ExportJobState::Error => {
                return Err(AssetIntelError::ExportFailed(format!(
                    "platform reported ERROR for export job {}",
                    export_id
                )));
            }
            ExportJobState::Queued | ExportJobState::Processing | ExportJobState::Other(_) => {
                debug!(export_id, state = ?status.state, "Export job still running");
            }
        }

        tokio::time::sleep(options.poll_interval).await;
    }
}
