use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::models::vulnerability::lenient_f64;
use crate::models::{MAX_ACR_SCORE, MAX_EXPOSURE_SCORE};

/// Look up the first non-null value stored under any of `aliases`, comparing
/// keys case-insensitively. Aliases are tried in order.
pub fn field<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        record
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(alias) && !value.is_null())
            .map(|(_, value)| value)
    })
}

/// Scalar to trimmed string. Numbers are rendered, everything else is `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// A single string or a list of strings; blanks and non-scalars are dropped.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// First entry of a string-or-list field, or the empty marker.
pub fn first_string(value: Option<&Value>) -> String {
    string_list(value).into_iter().next().unwrap_or_default()
}

/// Permissive numeric parse restricted to `[min, max]`.
pub fn bounded_number(value: Option<&Value>, min: f64, max: f64) -> Option<f64> {
    lenient_f64(value).filter(|n| (min..=max).contains(n))
}

/// Asset Exposure Score in `[0, MAX_EXPOSURE_SCORE]`; anything else is `None`.
pub fn exposure_score(value: Option<&Value>) -> Option<f64> {
    bounded_number(value, 0.0, MAX_EXPOSURE_SCORE)
}

/// Asset Criticality Rating in `[0, MAX_ACR_SCORE]`, rounded. Older stores
/// wrote integral ratings as floats ("9.0").
pub fn acr_score(value: Option<&Value>) -> Option<u8> {
    let score = bounded_number(value, 0.0, f64::from(MAX_ACR_SCORE))?.round();
    u8::try_from(score as i64).ok()
}

/// RFC 3339 strings or integer epoch seconds.
pub fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => Utc.timestamp_opt(n.as_i64()?, 0).single(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_field_is_case_insensitive_and_ordered() {
        let record = map(json!({"HostNames": ["a"], "hostname": "b"}));
        assert_eq!(field(&record, &["hostnames", "hostname"]), Some(&json!(["a"])));
        assert_eq!(field(&record, &["HOSTNAME"]), Some(&json!("b")));
        assert_eq!(field(&record, &["fqdn"]), None);
    }

    #[test]
    fn test_field_skips_null_alias() {
        let record = map(json!({"ipv4s": null, "ipv4": ["10.0.0.1"]}));
        assert_eq!(field(&record, &["ipv4s", "ipv4"]), Some(&json!(["10.0.0.1"])));
    }

    #[test]
    fn test_string_list_shapes() {
        assert_eq!(string_list(Some(&json!("10.0.0.1"))), vec!["10.0.0.1"]);
        assert_eq!(string_list(Some(&json!(["a", "", 7, {"x": 1}]))), vec!["a", "7"]);
        assert!(string_list(Some(&json!({"nested": true}))).is_empty());
        assert!(string_list(None).is_empty());
    }

    #[test]
    fn test_bounded_number() {
        assert_eq!(bounded_number(Some(&json!(773)), 0.0, 1000.0), Some(773.0));
        assert_eq!(bounded_number(Some(&json!("836.5")), 0.0, 1000.0), Some(836.5));
        assert_eq!(bounded_number(Some(&json!(1001)), 0.0, 1000.0), None);
        assert_eq!(bounded_number(Some(&json!(-1)), 0.0, 1000.0), None);
        assert_eq!(bounded_number(Some(&json!("high")), 0.0, 1000.0), None);
        assert_eq!(bounded_number(Some(&json!(true)), 0.0, 1000.0), None);
    }

    #[test]
    fn test_score_domains() {
        assert_eq!(exposure_score(Some(&json!("NaN"))), None);
        assert_eq!(exposure_score(Some(&json!("inf"))), None);
        assert_eq!(exposure_score(Some(&json!(5000))), None);
        assert_eq!(exposure_score(Some(&json!("900"))), Some(900.0));
        assert_eq!(acr_score(Some(&json!(300))), None);
        assert_eq!(acr_score(Some(&json!(-4))), None);
        assert_eq!(acr_score(Some(&json!("9.0"))), Some(9));
        assert_eq!(acr_score(Some(&json!(9.6))), Some(10));
    }

    #[test]
    fn test_timestamp_formats() {
        let parsed = timestamp(Some(&json!("2024-03-01T12:00:00.000Z"))).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        let epoch = timestamp(Some(&json!(0))).unwrap();
        assert_eq!(epoch.to_rfc3339(), "1970-01-01T00:00:00+00:00");
        assert!(timestamp(Some(&json!("yesterday"))).is_none());
    }
}
