//! Raw platform records to typed [`AssetRow`]s.
//!
//! The export and workbench endpoints disagree on key names, casing and
//! value types across asset classes. Only `id` is required; every other field
//! degrades to its empty or null form instead of failing the record.

pub mod coerce;
pub mod tags;

use serde_json::Value;
use tracing::debug;

use crate::errors::AssetIntelError;
use crate::models::AssetRow;
use coerce::{acr_score, exposure_score, field, first_string, scalar_string, string_list, timestamp};
use tags::flatten_tags;

const ID_KEYS: &[&str] = &["id", "asset_id", "uuid"];
const IPV4_KEYS: &[&str] = &["ipv4s", "ipv4", "ipv4_addresses"];
const IPV6_KEYS: &[&str] = &["ipv6s", "ipv6", "ipv6_addresses"];
const MAC_KEYS: &[&str] = &["mac_addresses", "mac_address", "mac"];
const HOSTNAME_KEYS: &[&str] = &["hostnames", "hostname", "netbios_names", "netbios_name"];
const FQDN_KEYS: &[&str] = &["fqdns", "fqdn"];
const OS_KEYS: &[&str] = &["operating_systems", "operating_system", "os"];
const EXPOSURE_KEYS: &[&str] = &["exposure_score", "aes", "aes_score"];
const ACR_KEYS: &[&str] = &["acr_score", "acr"];
const TAG_KEYS: &[&str] = &["tags"];
const FIRST_SEEN_KEYS: &[&str] = &["first_seen"];
const LAST_SEEN_KEYS: &[&str] = &["last_seen"];
const LAST_SCAN_KEYS: &[&str] = &["last_scan_time", "last_scan", "last_authenticated_scan_date"];

/// Rows that survived normalization plus the number of rejected records.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub rows: Vec<AssetRow>,
    pub rejected: usize,
}

/// Normalize one raw record. Fails only when the `id` is missing or empty.
pub fn normalize_record(raw: &Value) -> Result<AssetRow, AssetIntelError> {
    let record = raw
        .as_object()
        .ok_or_else(|| AssetIntelError::malformed("id", "cannot be read: record is not an object"))?;

    let id = match field(record, ID_KEYS) {
        None => return Err(AssetIntelError::malformed("id", "is missing")),
        Some(value) => scalar_string(value)
            .ok_or_else(|| AssetIntelError::malformed("id", "is empty or not a string"))?,
    };

    Ok(AssetRow {
        id,
        ipv4: string_list(field(record, IPV4_KEYS)),
        ipv6: string_list(field(record, IPV6_KEYS)),
        mac: string_list(field(record, MAC_KEYS)),
        hostname: first_string(field(record, HOSTNAME_KEYS)),
        fqdn: first_string(field(record, FQDN_KEYS)),
        os: first_string(field(record, OS_KEYS)),
        exposure_score: exposure_score(field(record, EXPOSURE_KEYS)),
        acr_score: acr_score(field(record, ACR_KEYS)),
        tags: flatten_tags(field(record, TAG_KEYS)),
        first_seen: timestamp(field(record, FIRST_SEEN_KEYS)),
        last_seen: timestamp(field(record, LAST_SEEN_KEYS)),
        last_scan: timestamp(field(record, LAST_SCAN_KEYS)),
    })
}

/// Normalize a record set, dropping and counting the records that fail.
pub fn normalize_batch<'a, I>(records: I) -> NormalizeOutcome
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut outcome = NormalizeOutcome::default();
    for (index, raw) in records.into_iter().enumerate() {
        match normalize_record(raw) {
            Ok(row) => outcome.rows.push(row),
            Err(e) => {
                debug!(index, error = %e, "Dropping malformed asset record");
                outcome.rejected += 1;
            }
        }
    }
    outcome
}
