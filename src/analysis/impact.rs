use serde_json::Value;
use tracing::info;

use crate::client::AssetSource;
use crate::errors::AssetIntelError;
use crate::models::vulnerability::lenient_f64;
use crate::models::{AffectedAsset, Limit, PluginDetail, PluginMetadata};
use crate::normalize::coerce::{field, first_string, scalar_string, string_list};

/// One plugin's catalog entry plus the assets it currently affects.
pub async fn plugin_impact(
    plugin_id: u32,
    limit: Limit,
    source: &dyn AssetSource,
) -> Result<PluginDetail, AssetIntelError> {
    let raw = source
        .plugin_details(plugin_id)
        .await?
        .ok_or(AssetIntelError::PluginNotFound { plugin_id })?;
    let plugin = plugin_metadata(plugin_id, &raw);

    let affected: Vec<AffectedAsset> = source
        .plugin_assets(plugin_id)
        .await?
        .iter()
        .filter_map(affected_asset)
        .collect();
    let affected_total = affected.len();

    info!(plugin_id, name = %plugin.name, affected = affected_total, "Resolved plugin impact");
    Ok(PluginDetail { plugin, affected_total, affected_assets: limit.apply(affected) })
}

/// The catalog endpoint returns `{name, family_name, attributes: [{attribute_name,
/// attribute_value}]}`; flattened top-level keys are accepted as well.
fn plugin_metadata(plugin_id: u32, raw: &Value) -> PluginMetadata {
    let attributes: Vec<(&str, &Value)> = raw
        .get("attributes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|a| Some((a.get("attribute_name")?.as_str()?, a.get("attribute_value")?)))
                .collect()
        })
        .unwrap_or_default();

    let attribute = |name: &str| lookup_attribute(&attributes, raw, name);
    let text = |name: &str| lookup_attribute(&attributes, raw, name).and_then(scalar_string);

    let mut cves: Vec<String> = attributes
        .iter()
        .filter(|(key, _)| *key == "cve")
        .filter_map(|(_, value)| scalar_string(value))
        .collect();
    if cves.is_empty() {
        cves = string_list(raw.get("cves").or_else(|| raw.get("cve")));
    }

    let exploit_available = match attribute("exploit_available") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    };

    PluginMetadata {
        plugin_id,
        name: text("name").or_else(|| text("plugin_name")).unwrap_or_default(),
        family: text("family_name").or_else(|| text("family")),
        risk_factor: text("risk_factor"),
        synopsis: text("synopsis"),
        description: text("description"),
        solution: text("solution"),
        cves,
        cvss_base_score: lenient_f64(attribute("cvss_base_score")),
        cvss3_base_score: lenient_f64(attribute("cvss3_base_score")),
        vpr_score: lenient_f64(attribute("vpr_score")),
        exploit_available,
    }
}

fn lookup_attribute<'a>(attributes: &[(&'a str, &'a Value)], raw: &'a Value, name: &str) -> Option<&'a Value> {
    attributes
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .or_else(|| raw.get(name).filter(|v| !v.is_null()))
}

fn affected_asset(raw: &Value) -> Option<AffectedAsset> {
    let record = raw.as_object()?;
    let id = field(record, &["id", "asset_id", "uuid"]).and_then(scalar_string)?;

    let finding_count = match record.get("severities").and_then(Value::as_array) {
        Some(levels) => levels.iter().filter_map(|l| l["count"].as_u64()).sum(),
        None => field(record, &["count", "total"]).and_then(Value::as_u64).unwrap_or(1),
    };

    Some(AffectedAsset {
        id,
        hostname: first_string(field(record, &["hostname", "hostnames", "fqdn", "netbios_name"])),
        ipv4: string_list(field(record, &["ipv4", "ipv4s"])).into_iter().next(),
        finding_count,
    })
}
