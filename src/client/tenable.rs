use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::credentials::redact_credentials;
use crate::config::PlatformCredentials;
use crate::errors::AssetIntelError;
use crate::models::ScanSummary;
use super::{AssetSource, ExportFilter, ExportJobState, ExportStatus};

pub const DEFAULT_BASE_URL: &str = "https://cloud.tenable.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Tenable Vulnerability Management REST client.
pub struct TenableClient {
    client: Client,
    base_url: String,
    access_key: String,
    secret_key: String,
}

impl std::fmt::Debug for TenableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenableClient")
            .field("base_url", &self.base_url)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

impl TenableClient {
    pub fn new(credentials: &PlatformCredentials) -> Result<Self, AssetIntelError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|e| AssetIntelError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            access_key: credentials.access_key.clone(),
            secret_key: credentials.secret_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(
                "X-ApiKeys",
                format!("accessKey={};secretKey={}", self.access_key, self.secret_key),
            )
            .header("Accept", "application/json")
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, AssetIntelError> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AssetIntelError::Timeout(format!("{} timed out: {}", what, e))
            } else {
                AssetIntelError::Network(format!("{} failed: {}", what, e))
            }
        })
    }

    /// Map non-success statuses onto the error taxonomy. 404 is returned as
    /// `Ok(None)` so lookups can report a miss.
    async fn read_json(&self, resp: Response, what: &str) -> Result<Option<Value>, AssetIntelError> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(AssetIntelError::Authentication(
                "Invalid Tenable API keys (check TENABLE_ACCESS_KEY / TENABLE_SECRET_KEY)".into(),
            ));
        }
        if status == StatusCode::FORBIDDEN {
            return Err(AssetIntelError::Permission(format!("{}: access denied", what)));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AssetIntelError::RateLimit(format!("{}: Tenable rate limit", what)));
        }
        if status.is_server_error() {
            return Err(AssetIntelError::Network(format!("{}: server returned {}", what, status)));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = redact_credentials(&body, &[&self.access_key, &self.secret_key]);
            return Err(AssetIntelError::Api(format!("{}: {} {}", what, status, body.trim())));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| AssetIntelError::Api(format!("{}: invalid response body: {}", what, e)))?;
        Ok(Some(data))
    }

    async fn get(&self, path: &str, what: &str) -> Result<Option<Value>, AssetIntelError> {
        self.get_with_query(path, &[], what).await
    }

    async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<Option<Value>, AssetIntelError> {
        debug!(path, "GET");
        let resp = self.send(self.request(Method::GET, path).query(query), what).await?;
        self.read_json(resp, what).await
    }

    async fn get_required(&self, path: &str, what: &str) -> Result<Value, AssetIntelError> {
        self.get(path, what)
            .await?
            .ok_or_else(|| AssetIntelError::Api(format!("{}: endpoint returned 404", what)))
    }

    async fn post(&self, path: &str, body: &Value, what: &str) -> Result<Value, AssetIntelError> {
        debug!(path, "POST");
        let resp = self.send(self.request(Method::POST, path).json(body), what).await?;
        self.read_json(resp, what)
            .await?
            .ok_or_else(|| AssetIntelError::Api(format!("{}: endpoint returned 404", what)))
    }
}

fn user_agent() -> String {
    format!(
        "Integration/1.0 (asset-intel; asset-intel; Build/{}{})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_HASH").map(|h| format!("+{}", h)).unwrap_or_default(),
    )
}

fn array_field(data: &Value, key: &str) -> Vec<Value> {
    data.get(key).and_then(Value::as_array).cloned().unwrap_or_default()
}

fn export_body(filter: &ExportFilter, chunk_size: u32) -> Value {
    match filter {
        ExportFilter::All => json!({ "chunk_size": chunk_size }),
        ExportFilter::Tag { category, value } => {
            let mut filters = serde_json::Map::new();
            filters.insert(format!("tag.{}", category), json!([value]));
            json!({ "chunk_size": chunk_size, "filters": filters })
        }
    }
}

/// Workbench filter query: a single `filter.0` clause joined with `and`.
fn workbench_filter(filter: &str, quality: &str, value: String) -> Vec<(&'static str, String)> {
    vec![
        ("filter.0.filter", filter.to_string()),
        ("filter.0.quality", quality.to_string()),
        ("filter.0.value", value),
        ("filter.search_type", "and".to_string()),
    ]
}

fn scan_from_value(value: &Value) -> Option<ScanSummary> {
    Some(ScanSummary {
        scan_id: value.get("id")?.as_u64()?,
        status: value["status"].as_str().unwrap_or_default().to_string(),
        name: value["name"].as_str().unwrap_or_default().to_string(),
    })
}

/// The workbench `host.target` filter matches substrings; only a record that
/// actually names `identifier` counts as a hit.
fn pick_named_asset(assets: Vec<Value>, identifier: &str) -> Option<Value> {
    assets.into_iter().find(|a| names_host(a, identifier))
}

/// True when the workbench asset record names `identifier` as one of its hosts.
fn names_host(asset: &Value, identifier: &str) -> bool {
    ["hostname", "fqdn", "netbios_name", "ipv4"].iter().any(|key| match asset.get(*key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case(identifier)),
        Some(Value::String(s)) => s.eq_ignore_ascii_case(identifier),
        _ => false,
    })
}

#[async_trait]
impl AssetSource for TenableClient {
    async fn start_export(&self, filter: &ExportFilter, chunk_size: u32) -> Result<String, AssetIntelError> {
        let data = self.post("/assets/export", &export_body(filter, chunk_size), "Start asset export").await?;
        data["export_uuid"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AssetIntelError::Api("Export response carried no export_uuid".into()))
    }

    async fn export_status(&self, export_id: &str) -> Result<ExportStatus, AssetIntelError> {
        let data = self
            .get_required(&format!("/assets/export/{}/status", export_id), "Export status")
            .await?;
        Ok(ExportStatus {
            state: ExportJobState::from_upstream(data["status"].as_str().unwrap_or_default()),
            chunks_available: array_field(&data, "chunks_available")
                .iter()
                .filter_map(Value::as_u64)
                .collect(),
        })
    }

    async fn export_chunk(&self, export_id: &str, chunk_id: u64) -> Result<Vec<Value>, AssetIntelError> {
        let data = self
            .get_required(
                &format!("/assets/export/{}/chunks/{}", export_id, chunk_id),
                "Download export chunk",
            )
            .await?;
        match data {
            Value::Array(records) => Ok(records),
            _ => Err(AssetIntelError::Api(format!("Export chunk {} is not a JSON array", chunk_id))),
        }
    }

    async fn cancel_export(&self, export_id: &str) -> Result<(), AssetIntelError> {
        self.post(&format!("/assets/export/{}/cancel", export_id), &json!({}), "Cancel export")
            .await?;
        Ok(())
    }

    async fn list_scans(&self) -> Result<Vec<ScanSummary>, AssetIntelError> {
        let data = self.get_required("/scans", "List scans").await?;
        Ok(array_field(&data, "scans").iter().filter_map(scan_from_value).collect())
    }

    async fn list_assets(&self) -> Result<Vec<Value>, AssetIntelError> {
        let data = self.get_required("/assets", "List assets").await?;
        Ok(array_field(&data, "assets"))
    }

    async fn find_asset(&self, identifier: &str) -> Result<Option<Value>, AssetIntelError> {
        if uuid::Uuid::parse_str(identifier).is_ok() {
            return self.get(&format!("/assets/{}", identifier), "Asset lookup").await;
        }

        let query = workbench_filter("host.target", "match", identifier.to_string());
        let assets = match self.get_with_query("/workbenches/assets", &query, "Asset lookup").await? {
            Some(data) => array_field(&data, "assets"),
            None => return Ok(None),
        };
        Ok(pick_named_asset(assets, identifier))
    }

    async fn asset_vulnerabilities(&self, asset_id: &str) -> Result<Vec<Value>, AssetIntelError> {
        let data = self
            .get_required(
                &format!("/workbenches/assets/{}/vulnerabilities", asset_id),
                "Asset vulnerabilities",
            )
            .await?;
        Ok(array_field(&data, "vulnerabilities"))
    }

    async fn plugin_details(&self, plugin_id: u32) -> Result<Option<Value>, AssetIntelError> {
        self.get(&format!("/plugins/plugin/{}", plugin_id), "Plugin details").await
    }

    async fn plugin_assets(&self, plugin_id: u32) -> Result<Vec<Value>, AssetIntelError> {
        let query = workbench_filter("plugin.id", "eq", plugin_id.to_string());
        let data = self
            .get_with_query("/workbenches/assets/vulnerabilities", &query, "Plugin affected assets")
            .await?
            .ok_or_else(|| AssetIntelError::Api("Plugin affected assets: endpoint returned 404".into()))?;
        Ok(array_field(&data, "assets"))
    }

    fn source_name(&self) -> &str {
        "tenable"
    }
}
