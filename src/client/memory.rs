use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AssetIntelError;
use crate::models::ScanSummary;
use super::{AssetSource, ExportFilter, ExportJobState, ExportStatus};

/// Scripted, in-process [`AssetSource`].
///
/// Export polls walk through the scripted statuses and then repeat the last
/// one; with no script the job stays queued forever. Every remote operation is
/// counted so callers can assert how often the platform would have been hit.
#[derive(Default)]
pub struct InMemorySource {
    statuses: Mutex<VecDeque<ExportStatus>>,
    chunks: HashMap<u64, Vec<Value>>,
    scans: Vec<ScanSummary>,
    assets: Vec<Value>,
    lookups: HashMap<String, Value>,
    vulnerabilities: HashMap<String, Vec<Value>>,
    plugins: HashMap<u32, Value>,
    plugin_assets: HashMap<u32, Vec<Value>>,
    listing_error: Option<String>,
    last_filter: Mutex<Option<ExportFilter>>,
    calls: CallCounts,
}

#[derive(Default)]
struct CallCounts {
    exports_started: AtomicUsize,
    status_polls: AtomicUsize,
    chunk_fetches: AtomicUsize,
    cancels: AtomicUsize,
    listings: AtomicUsize,
    lookups: AtomicUsize,
    vulnerability_fetches: AtomicUsize,
    plugin_fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an export: the statuses successive polls return plus the chunk
    /// contents by chunk id.
    pub fn with_export(mut self, statuses: Vec<ExportStatus>, chunks: Vec<(u64, Vec<Value>)>) -> Self {
        self.statuses = Mutex::new(statuses.into());
        self.chunks = chunks.into_iter().collect();
        self
    }

    /// A job that finishes on the first poll with the given chunks.
    pub fn with_finished_export(self, chunks: Vec<Vec<Value>>) -> Self {
        let numbered: Vec<(u64, Vec<Value>)> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, records)| (i as u64 + 1, records))
            .collect();
        let status = ExportStatus {
            state: ExportJobState::Finished,
            chunks_available: numbered.iter().map(|(id, _)| *id).collect(),
        };
        self.with_export(vec![status], numbered)
    }

    pub fn with_scans(mut self, scans: Vec<ScanSummary>) -> Self {
        self.scans = scans;
        self
    }

    pub fn with_assets(mut self, assets: Vec<Value>) -> Self {
        self.assets = assets;
        self
    }

    /// Answer `find_asset(identifier)` (case-insensitive) with `asset`.
    pub fn with_lookup(mut self, identifier: &str, asset: Value) -> Self {
        self.lookups.insert(identifier.to_lowercase(), asset);
        self
    }

    pub fn with_vulnerabilities(mut self, asset_id: &str, vulnerabilities: Vec<Value>) -> Self {
        self.vulnerabilities.insert(asset_id.to_string(), vulnerabilities);
        self
    }

    pub fn with_plugin(mut self, plugin_id: u32, details: Value, assets: Vec<Value>) -> Self {
        self.plugins.insert(plugin_id, details);
        self.plugin_assets.insert(plugin_id, assets);
        self
    }

    /// Make the live asset listing fail with a network error.
    pub fn with_failing_listing(mut self, message: &str) -> Self {
        self.listing_error = Some(message.to_string());
        self
    }

    pub fn exports_started(&self) -> usize {
        self.calls.exports_started.load(Ordering::SeqCst)
    }

    pub fn status_polls(&self) -> usize {
        self.calls.status_polls.load(Ordering::SeqCst)
    }

    pub fn chunk_fetches(&self) -> usize {
        self.calls.chunk_fetches.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.calls.cancels.load(Ordering::SeqCst)
    }

    pub fn listings(&self) -> usize {
        self.calls.listings.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.calls.lookups.load(Ordering::SeqCst)
    }

    pub fn vulnerability_fetches(&self) -> usize {
        self.calls.vulnerability_fetches.load(Ordering::SeqCst)
    }

    pub fn plugin_fetches(&self) -> usize {
        self.calls.plugin_fetches.load(Ordering::SeqCst)
    }

    pub fn last_export_filter(&self) -> Option<ExportFilter> {
        self.last_filter.lock().ok().and_then(|f| f.clone())
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[async_trait]
impl AssetSource for InMemorySource {
    async fn start_export(&self, filter: &ExportFilter, _chunk_size: u32) -> Result<String, AssetIntelError> {
        bump(&self.calls.exports_started);
        if let Ok(mut last) = self.last_filter.lock() {
            *last = Some(filter.clone());
        }
        Ok("memory-export".to_string())
    }

    async fn export_status(&self, _export_id: &str) -> Result<ExportStatus, AssetIntelError> {
        bump(&self.calls.status_polls);
        let mut statuses = self
            .statuses
            .lock()
            .map_err(|_| AssetIntelError::Internal("status script poisoned".into()))?;
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        Ok(status.unwrap_or(ExportStatus {
            state: ExportJobState::Queued,
            chunks_available: Vec::new(),
        }))
    }

    async fn export_chunk(&self, _export_id: &str, chunk_id: u64) -> Result<Vec<Value>, AssetIntelError> {
        bump(&self.calls.chunk_fetches);
        self.chunks
            .get(&chunk_id)
            .cloned()
            .ok_or_else(|| AssetIntelError::Api(format!("chunk {} does not exist", chunk_id)))
    }

    async fn cancel_export(&self, _export_id: &str) -> Result<(), AssetIntelError> {
        bump(&self.calls.cancels);
        Ok(())
    }

    async fn list_scans(&self) -> Result<Vec<ScanSummary>, AssetIntelError> {
        Ok(self.scans.clone())
    }

    async fn list_assets(&self) -> Result<Vec<Value>, AssetIntelError> {
        bump(&self.calls.listings);
        match &self.listing_error {
            Some(message) => Err(AssetIntelError::Network(message.clone())),
            None => Ok(self.assets.clone()),
        }
    }

    async fn find_asset(&self, identifier: &str) -> Result<Option<Value>, AssetIntelError> {
        bump(&self.calls.lookups);
        Ok(self.lookups.get(&identifier.to_lowercase()).cloned())
    }

    async fn asset_vulnerabilities(&self, asset_id: &str) -> Result<Vec<Value>, AssetIntelError> {
        bump(&self.calls.vulnerability_fetches);
        Ok(self.vulnerabilities.get(asset_id).cloned().unwrap_or_default())
    }

    async fn plugin_details(&self, plugin_id: u32) -> Result<Option<Value>, AssetIntelError> {
        bump(&self.calls.plugin_fetches);
        Ok(self.plugins.get(&plugin_id).cloned())
    }

    async fn plugin_assets(&self, plugin_id: u32) -> Result<Vec<Value>, AssetIntelError> {
        Ok(self.plugin_assets.get(&plugin_id).cloned().unwrap_or_default())
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}
