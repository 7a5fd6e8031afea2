use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity level for a vulnerability finding, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3, Info = 4.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }

    /// Map an upstream label onto one of the five levels. Accepts level names
    /// in any case and the platform's numeric scale (4 = Critical .. 0 = Info).
    /// Anything unrecognized is `Info`.
    pub fn from_upstream(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_u64().or_else(|| integral(n.as_f64()?)) {
                Some(4) => Severity::Critical,
                Some(3) => Severity::High,
                Some(2) => Severity::Medium,
                Some(1) => Severity::Low,
                _ => Severity::Info,
            },
            Value::String(s) => Self::from_label(s),
            _ => Severity::Info,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" | "4" => Severity::Critical,
            "high" | "3" => Severity::High,
            "medium" | "2" => Severity::Medium,
            "low" | "1" => Severity::Low,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vulnerability observed on one asset. Fetched live, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnFinding {
    pub plugin_id: u32,
    pub plugin_name: String,
    pub plugin_family: Option<String>,
    pub severity: Severity,
    pub vpr_score: Option<f64>,
    pub cvss_base_score: Option<f64>,
    pub cvss3_base_score: Option<f64>,
    pub exploit_available: bool,
    /// Occurrences of this plugin on the asset.
    pub count: u64,
    pub state: Option<String>,
}

impl VulnFinding {
    /// Build a finding from a workbench vulnerability record. Returns `None`
    /// when the record has no usable plugin id.
    pub fn from_value(value: &Value) -> Option<Self> {
        let plugin_id = match value.get("plugin_id")? {
            Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };

        let severity = value
            .get("severity")
            .or_else(|| value.get("severity_index"))
            .map(Severity::from_upstream)
            .unwrap_or(Severity::Info);

        let exploit_available = match value.get("exploit_available") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        };

        Some(Self {
            plugin_id,
            plugin_name: value["plugin_name"].as_str().unwrap_or_default().to_string(),
            plugin_family: value["plugin_family"].as_str().map(str::to_string),
            severity,
            vpr_score: lenient_f64(value.get("vpr_score")),
            cvss_base_score: lenient_f64(value.get("cvss_base_score")),
            cvss3_base_score: lenient_f64(value.get("cvss3_base_score")),
            exploit_available,
            count: value["count"].as_u64().unwrap_or(1),
            state: value["vulnerability_state"].as_str().map(str::to_string),
        })
    }
}

/// `4.0` counts as `4`; fractional or negative values do not.
fn integral(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
}

/// Numbers and numeric strings become `f64`; anything else is `None`.
pub(crate) fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_from_numeric_scale() {
        assert_eq!(Severity::from_upstream(&json!(4)), Severity::Critical);
        assert_eq!(Severity::from_upstream(&json!(1)), Severity::Low);
        assert_eq!(Severity::from_upstream(&json!(0)), Severity::Info);
        assert_eq!(Severity::from_upstream(&json!(9)), Severity::Info);
    }

    #[test]
    fn test_severity_from_integral_float() {
        assert_eq!(Severity::from_upstream(&json!(4.0)), Severity::Critical);
        assert_eq!(Severity::from_upstream(&json!(3.0)), Severity::High);
        assert_eq!(Severity::from_upstream(&json!(2.5)), Severity::Info);
        assert_eq!(Severity::from_upstream(&json!(-1.0)), Severity::Info);
    }

    #[test]
    fn test_severity_from_labels() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label(" high "), Severity::High);
        assert_eq!(Severity::from_label("informational"), Severity::Info);
        assert_eq!(Severity::from_label("urgent"), Severity::Info);
    }

    #[test]
    fn test_finding_from_workbench_record() {
        let finding = VulnFinding::from_value(&json!({
            "plugin_id": 97833,
            "plugin_name": "MS17-010",
            "plugin_family": "Windows",
            "severity": 4,
            "vpr_score": "9.7",
            "cvss_base_score": 10.0,
            "count": 2,
            "vulnerability_state": "Active"
        })).unwrap();

        assert_eq!(finding.plugin_id, 97833);
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.vpr_score, Some(9.7));
        assert_eq!(finding.count, 2);
        assert!(!finding.exploit_available);
        assert_eq!(finding.state.as_deref(), Some("Active"));
    }

    #[test]
    fn test_finding_without_plugin_id_is_skipped() {
        assert!(VulnFinding::from_value(&json!({"plugin_name": "orphan"})).is_none());
        assert!(VulnFinding::from_value(&json!({"plugin_id": "n/a"})).is_none());
    }

    #[test]
    fn test_finding_unknown_severity_maps_to_info() {
        let finding = VulnFinding::from_value(&json!({"plugin_id": "19506", "severity": "bogus"})).unwrap();
        assert_eq!(finding.plugin_id, 19506);
        assert_eq!(finding.severity, Severity::Info);
        assert_eq!(finding.count, 1);
    }
}
