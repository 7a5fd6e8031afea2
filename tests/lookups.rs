use serde_json::json;
use tempfile::TempDir;

use asset_intel::analysis::resolver::optional_local_rows;
use asset_intel::analysis::{completed_scans, detail, plugin_impact, search_assets};
use asset_intel::client::InMemorySource;
use asset_intel::errors::AssetIntelError;
use asset_intel::models::{AssetRow, Limit, RowOrigin, ScanSummary, Severity};
use asset_intel::store::AssetStore;

fn stored_row(id: &str, hostname: &str, ipv4: &str) -> AssetRow {
    let mut row = AssetRow::with_id(id);
    row.hostname = hostname.to_string();
    row.ipv4 = vec![ipv4.to_string()];
    row
}

#[tokio::test]
async fn test_search_without_store_goes_live() {
    let dir = TempDir::new().unwrap();
    let missing = AssetStore::new(dir.path().join("never-exported.csv")).unwrap();
    let source = InMemorySource::new().with_assets(vec![
        json!({"id": "live-1", "hostname": ["SE-DC1"], "ipv4": ["10.0.0.1"]}),
        json!({"id": "live-2", "hostname": ["mail"], "ipv4": ["10.0.0.2"]}),
    ]);

    let outcome = search_assets("dc", Some(&missing), &source).await.unwrap();
    assert_eq!(outcome.origin, RowOrigin::Live);
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].id, "live-1");
    assert_eq!(source.listings(), 1);
}

#[tokio::test]
async fn test_search_surfaces_remote_failure_when_no_store() {
    let source = InMemorySource::new().with_failing_listing("connection reset");
    let err = search_assets("dc", None, &source).await.unwrap_err();
    assert!(matches!(err, AssetIntelError::Network(_)));
}

#[tokio::test]
async fn test_detail_from_store_fetches_vulnerabilities_once() {
    let dir = TempDir::new().unwrap();
    let store = AssetStore::new(dir.path().join("assets.db")).unwrap();
    store
        .save(&[stored_row("a-1", "se-dc1", "10.0.0.1"), stored_row("a-2", "mail", "10.0.0.2")])
        .unwrap();
    let source = InMemorySource::new().with_vulnerabilities(
        "a-1",
        vec![
            json!({"plugin_id": 1, "plugin_name": "low", "severity": 1}),
            json!({"plugin_id": 2, "plugin_name": "crit-low-vpr", "severity": 4, "vpr_score": 6.7}),
            json!({"plugin_id": 3, "plugin_name": "crit-high-vpr", "severity": "critical", "vpr_score": 9.8}),
            json!({"plugin_name": "no plugin id"}),
        ],
    );

    let local = optional_local_rows(Some(&store));
    let asset = detail("SE-DC1", local.as_ref(), Limit::AtMost(2), &source).await.unwrap();

    assert_eq!(asset.asset.id, "a-1");
    assert!(matches!(asset.origin, RowOrigin::Store { .. }));
    assert_eq!(asset.summary.total, 3);
    assert_eq!(asset.summary.count(Severity::Critical), 2);
    let plugins: Vec<u32> = asset.vulnerabilities.iter().map(|v| v.plugin_id).collect();
    assert_eq!(plugins, [3, 2]);
    assert_eq!(source.vulnerability_fetches(), 1);
    assert_eq!(source.lookups(), 0);
}

#[tokio::test]
async fn test_detail_unknown_host() {
    let rows = optional_local_rows(None);
    let source = InMemorySource::new();

    let err = detail("unknown-host", rows.as_ref(), Limit::AtMost(10), &source)
        .await
        .unwrap_err();
    assert!(matches!(err, AssetIntelError::AssetNotFound { ref identifier } if identifier == "unknown-host"));
    assert_eq!(source.vulnerability_fetches(), 0);
}

#[tokio::test]
async fn test_plugin_impact_and_unknown_plugin() {
    let source = InMemorySource::new().with_plugin(
        19506,
        json!({"id": 19506, "name": "Nessus Scan Information", "family_name": "Settings", "attributes": []}),
        vec![
            json!({"id": "a-1", "hostname": ["se-dc1"], "ipv4": ["10.0.0.1"], "count": 1}),
            json!({"id": "a-2", "hostname": ["mail"], "ipv4": ["10.0.0.2"], "count": 1}),
        ],
    );

    let impact = plugin_impact(19506, Limit::AtMost(1), &source).await.unwrap();
    assert_eq!(impact.plugin.name, "Nessus Scan Information");
    assert_eq!(impact.affected_total, 2);
    assert_eq!(impact.affected_assets.len(), 1);

    let err = plugin_impact(1, Limit::Unbounded, &source).await.unwrap_err();
    assert!(matches!(err, AssetIntelError::PluginNotFound { plugin_id: 1 }));
}

#[tokio::test]
async fn test_only_completed_scans_are_listed() {
    let scan = |id: u64, status: &str| ScanSummary { scan_id: id, status: status.into(), name: format!("scan {}", id) };
    let source = InMemorySource::new().with_scans(vec![
        scan(1, "completed"),
        scan(2, "running"),
        scan(3, "Completed"),
        scan(4, "completed"),
    ]);

    let scans = completed_scans(&source).await.unwrap();
    let ids: Vec<u64> = scans.iter().map(|s| s.scan_id).collect();
    assert_eq!(ids, [1, 4]);
}
