use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value stored for descriptive fields the platform did not report.
pub const EMPTY_MARKER: &str = "";

/// Upper bound of the Asset Exposure Score.
pub const MAX_EXPOSURE_SCORE: f64 = 1000.0;

/// Upper bound of the Asset Criticality Rating.
pub const MAX_ACR_SCORE: u8 = 10;

/// A single `(category, value)` tag attached to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub category: String,
    pub value: String,
}

impl Tag {
    pub fn new(category: &str, value: &str) -> Self {
        Self { category: category.to_string(), value: value.to_string() }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category, self.value)
    }
}

/// One normalized inventory item, the unit every analytical view reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRow {
    pub id: String,
    #[serde(default)]
    pub ipv4: Vec<String>,
    #[serde(default)]
    pub ipv6: Vec<String>,
    #[serde(default)]
    pub mac: Vec<String>,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub fqdn: String,
    #[serde(default)]
    pub os: String,
    pub exposure_score: Option<f64>,
    pub acr_score: Option<u8>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub last_scan: Option<DateTime<Utc>>,
}

impl AssetRow {
    /// A row carrying only its identifier; every other field empty or null.
    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ipv4: Vec::new(),
            ipv6: Vec::new(),
            mac: Vec::new(),
            hostname: EMPTY_MARKER.to_string(),
            fqdn: EMPTY_MARKER.to_string(),
            os: EMPTY_MARKER.to_string(),
            exposure_score: None,
            acr_score: None,
            tags: Vec::new(),
            first_seen: None,
            last_seen: None,
            last_scan: None,
        }
    }

    pub fn primary_ipv4(&self) -> Option<&str> {
        self.ipv4.first().map(String::as_str)
    }

    /// Hostname if reported, otherwise the FQDN.
    pub fn display_name(&self) -> &str {
        if self.hostname.is_empty() { &self.fqdn } else { &self.hostname }
    }
}
