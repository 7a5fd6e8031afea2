use console::style;

use crate::models::{AssetDetail, AssetRow, PluginDetail, RowOrigin, ScanSummary, Severity, EMPTY_MARKER};
use crate::pipeline::ExportSummary;

const HOSTNAME_WIDTH: usize = 28;
const OS_WIDTH: usize = 24;

/// Placeholder for empty fields in tables.
fn cell(value: &str) -> &str {
    if value == EMPTY_MARKER { "-" } else { value }
}

/// Clip a cell to `width` characters, marking the cut with `~`.
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let clipped: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}~", clipped)
    }
}

fn score(value: Option<f64>) -> String {
    value.map(|s| format!("{:.0}", s)).unwrap_or_else(|| "-".to_string())
}

pub fn render_severity_badge(severity: Severity) -> String {
    match severity {
        Severity::Critical => style(" CRITICAL ").on_red().white().bold().to_string(),
        Severity::High => style(" HIGH ").red().bold().to_string(),
        Severity::Medium => style(" MEDIUM ").yellow().bold().to_string(),
        Severity::Low => style(" LOW ").blue().to_string(),
        Severity::Info => style(" INFO ").dim().to_string(),
    }
}

/// Render the completed-scan listing.
pub fn render_scans(scans: &[ScanSummary]) -> String {
    if scans.is_empty() {
        return format!("\n  {}\n", style("No completed scans found.").dim());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "\n{}\n\n",
        style(format!("Completed scans ({}):", scans.len())).white().bold(),
    ));
    out.push_str(&format!("  {}\n", style(format!("{:<10} {}", "ID", "NAME")).dim()));
    for scan in scans {
        out.push_str(&format!(
            "  {} {}\n",
            style(format!("{:<10}", scan.scan_id)).cyan(),
            scan.name,
        ));
    }
    out
}

/// Render an asset table; used by both `top` and `search`.
pub fn render_asset_table(title: &str, rows: &[AssetRow]) -> String {
    if rows.is_empty() {
        return format!("\n  {}\n", style("No matching assets.").dim());
    }

    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", style(title).white().bold()));
    out.push_str(&format!(
        "  {}\n",
        style(format!(
            "{:>3}  {:<hw$} {:<15} {:>8} {:>4}  {:<ow$} {}",
            "#", "HOSTNAME", "IPV4", "EXPOSURE", "ACR", "OS", "ID",
            hw = HOSTNAME_WIDTH,
            ow = OS_WIDTH,
        ))
        .dim(),
    ));

    for (i, row) in rows.iter().enumerate() {
        let acr = row.acr_score.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:>3}  {} {:<15} {} {:>4}  {:<ow$} {}\n",
            i + 1,
            style(format!("{:<hw$}", fit(cell(row.display_name()), HOSTNAME_WIDTH), hw = HOSTNAME_WIDTH))
                .white()
                .bold(),
            row.primary_ipv4().unwrap_or("-"),
            style(format!("{:>8}", score(row.exposure_score))).yellow(),
            acr,
            fit(cell(&row.os), OS_WIDTH),
            style(&row.id).dim(),
            ow = OS_WIDTH,
        ));
    }
    out
}

pub fn render_origin(origin: &RowOrigin) -> String {
    format!("  {} {}", style("Source:").dim(), style(origin.to_string()).dim())
}

pub fn render_export_summary(summary: &ExportSummary) -> String {
    if !summary.written {
        return format!(
            "{} No assets found for {}; {} was not written",
            style("!").yellow().bold(),
            summary.filter,
            summary.path.display(),
        );
    }

    let mut out = format!(
        "{} Exported {} assets ({}) to {}",
        style("✓").green(),
        style(summary.exported).white().bold(),
        summary.filter,
        style(summary.path.display()).cyan(),
    );
    if summary.rejected > 0 {
        out.push_str(&format!(
            "\n  {} {} records skipped (no asset id)",
            style("!").yellow(),
            summary.rejected,
        ));
    }
    out
}

/// Headline for asset-info: who the asset is and its severity breakdown.
pub fn render_detail_headline(detail: &AssetDetail) -> String {
    let mut out = format!(
        "{} {} {}\n",
        style("▶").green().bold(),
        style(cell(detail.asset.display_name())).white().bold(),
        style(format!("({})", detail.asset.id)).dim(),
    );
    let counts: Vec<String> = Severity::ALL
        .iter()
        .map(|s| format!("{} {}", render_severity_badge(*s), detail.summary.count(*s)))
        .collect();
    out.push_str(&format!("  {}   {} total\n", counts.join("  "), detail.summary.total));
    out.push_str(&render_origin(&detail.origin));
    out
}

/// Headline for plugin-info.
pub fn render_plugin_headline(detail: &PluginDetail) -> String {
    let risk = detail
        .plugin
        .risk_factor
        .as_deref()
        .map(|r| render_severity_badge(Severity::from_label(r)))
        .unwrap_or_default();
    format!(
        "{} Plugin {} {} {}\n  affects {} assets",
        style("▶").green().bold(),
        style(detail.plugin.plugin_id).cyan(),
        style(&detail.plugin.name).white().bold(),
        risk,
        style(detail.affected_total).white().bold(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ExportFilter;
    use std::path::PathBuf;

    fn plain() {
        console::set_colors_enabled(false);
    }

    #[test]
    fn test_asset_table_marks_empty_fields() {
        plain();
        let mut row = AssetRow::with_id("a-1");
        row.exposure_score = Some(836.0);
        let out = render_asset_table("Top assets", &[row]);
        assert!(out.contains("836"));
        assert!(out.contains(" - "));
        assert!(out.contains("a-1"));
    }

    #[test]
    fn test_long_hostname_is_clipped() {
        let clipped = fit(&"h".repeat(40), HOSTNAME_WIDTH);
        assert_eq!(clipped.chars().count(), HOSTNAME_WIDTH);
        assert!(clipped.ends_with('~'));
    }

    #[test]
    fn test_detail_headline_counts() {
        plain();
        let detail = AssetDetail {
            asset: AssetRow::with_id("a-1"),
            origin: RowOrigin::Live,
            summary: crate::models::SeveritySummary { critical: 2, info: 1, total: 3, ..Default::default() },
            vulnerabilities: Vec::new(),
        };
        let out = render_detail_headline(&detail);
        assert!(out.contains("CRITICAL  2"));
        assert!(out.contains("3 total"));
        assert!(out.contains("live API"));
    }

    #[test]
    fn test_empty_scan_listing() {
        plain();
        assert!(render_scans(&[]).contains("No completed scans"));
    }

    #[test]
    fn test_unwritten_export_summary() {
        plain();
        let summary = ExportSummary {
            path: PathBuf::from("assets.csv"),
            filter: ExportFilter::All,
            exported: 0,
            rejected: 0,
            written: false,
        };
        assert!(render_export_summary(&summary).contains("was not written"));
    }
}
