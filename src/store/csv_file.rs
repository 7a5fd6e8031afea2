use std::io::{Read, Write};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AssetIntelError;
use crate::models::{AssetRow, Tag};
use crate::normalize::coerce;

const LIST_SEPARATOR: char = ';';

/// Flat text form of one row. Multi-valued columns are `;`-joined, tags are a
/// JSON array and timestamps RFC 3339.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    ipv4: String,
    #[serde(default)]
    ipv6: String,
    #[serde(default)]
    mac: String,
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    fqdn: String,
    #[serde(default)]
    os: String,
    #[serde(default)]
    exposure_score: String,
    #[serde(default)]
    acr_score: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    first_seen: String,
    #[serde(default)]
    last_seen: String,
    #[serde(default)]
    last_scan: String,
}

impl From<&AssetRow> for CsvRow {
    fn from(row: &AssetRow) -> Self {
        Self {
            id: row.id.clone(),
            ipv4: row.ipv4.join(";"),
            ipv6: row.ipv6.join(";"),
            mac: row.mac.join(";"),
            hostname: row.hostname.clone(),
            fqdn: row.fqdn.clone(),
            os: row.os.clone(),
            exposure_score: row.exposure_score.map(|s| s.to_string()).unwrap_or_default(),
            acr_score: row.acr_score.map(|s| s.to_string()).unwrap_or_default(),
            tags: serde_json::to_string(&row.tags).unwrap_or_else(|_| "[]".to_string()),
            first_seen: format_time(row.first_seen),
            last_seen: format_time(row.last_seen),
            last_scan: format_time(row.last_scan),
        }
    }
}

impl CsvRow {
    fn into_asset(self) -> AssetRow {
        AssetRow {
            id: self.id.trim().to_string(),
            ipv4: split_list(&self.ipv4),
            ipv6: split_list(&self.ipv6),
            mac: split_list(&self.mac),
            hostname: self.hostname,
            fqdn: self.fqdn,
            os: self.os,
            exposure_score: coerce::exposure_score(Some(&Value::String(self.exposure_score))),
            acr_score: coerce::acr_score(Some(&Value::String(self.acr_score))),
            tags: serde_json::from_str::<Vec<Tag>>(&self.tags).unwrap_or_default(),
            first_seen: parse_time(&self.first_seen),
            last_seen: parse_time(&self.last_seen),
            last_scan: parse_time(&self.last_scan),
        }
    }
}

pub fn write<W: Write>(writer: W, rows: &[AssetRow]) -> Result<(), AssetIntelError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(CsvRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read<R: Read>(reader: R) -> Result<Vec<AssetRow>, AssetIntelError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<CsvRow>() {
        rows.push(record?.into_asset());
    }
    Ok(rows)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn format_time(value: Option<DateTime<Utc>>) -> String {
    value.map(|t| t.to_rfc3339()).unwrap_or_default()
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim()).ok().map(|t| t.with_timezone(&Utc))
}
