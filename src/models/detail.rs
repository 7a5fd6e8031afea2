use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use super::asset::AssetRow;
use super::vulnerability::{Severity, VulnFinding};

/// Where an analytical view got its asset rows from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum RowOrigin {
    Store { path: PathBuf },
    Live,
}

impl std::fmt::Display for RowOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowOrigin::Store { path } => write!(f, "file '{}'", path.display()),
            RowOrigin::Live => f.write_str("live API"),
        }
    }
}

/// Finding counts per severity bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub total: usize,
}

impl SeveritySummary {
    pub fn from_findings(findings: &[VulnFinding]) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary.total = findings.len();
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }
}

/// One asset with its live vulnerability picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDetail {
    pub asset: AssetRow,
    pub origin: RowOrigin,
    pub summary: SeveritySummary,
    /// Severity-ordered, truncated to the requested limit.
    pub vulnerabilities: Vec<VulnFinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub plugin_id: u32,
    pub name: String,
    pub family: Option<String>,
    pub risk_factor: Option<String>,
    pub synopsis: Option<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
    pub cves: Vec<String>,
    pub cvss_base_score: Option<f64>,
    pub cvss3_base_score: Option<f64>,
    pub vpr_score: Option<f64>,
    pub exploit_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedAsset {
    pub id: String,
    pub hostname: String,
    pub ipv4: Option<String>,
    /// Findings for the plugin on this asset.
    pub finding_count: u64,
}

/// One plugin plus its blast radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDetail {
    pub plugin: PluginMetadata,
    pub affected_total: usize,
    pub affected_assets: Vec<AffectedAsset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> VulnFinding {
        VulnFinding {
            plugin_id: 1,
            plugin_name: "test".into(),
            plugin_family: None,
            severity,
            vpr_score: None,
            cvss_base_score: None,
            cvss3_base_score: None,
            exploit_available: false,
            count: 1,
            state: None,
        }
    }

    #[test]
    fn test_summary_buckets() {
        let findings = vec![
            finding(Severity::High),
            finding(Severity::Info),
            finding(Severity::High),
            finding(Severity::Critical),
        ];
        let summary = SeveritySummary::from_findings(&findings);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 2);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(Severity::High), 2);
    }

    #[test]
    fn test_row_origin_serializes_with_source_tag() {
        let value = serde_json::to_value(RowOrigin::Live).unwrap();
        assert_eq!(value["source"], "live");
        let value = serde_json::to_value(RowOrigin::Store { path: "assets.csv".into() }).unwrap();
        assert_eq!(value["source"], "store");
        assert_eq!(value["path"], "assets.csv");
    }
}
