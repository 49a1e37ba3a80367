//! Output formatting for bundles, pages and reports.

use dex_builds_core::{BuildRecord, DexBundle, EvSpread, PageResult};

use crate::error::Result;
use crate::report::{ExtractionReport, ExtractionReportBundle};

/// Supported output formats. JSON is the canonical bundle format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a bundle in the requested output format.
pub fn format_bundle(bundle: &DexBundle, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(bundle)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(bundle)?),
        OutputFormat::Markdown => Ok(bundle
            .iter()
            .map(|(subject, builds)| builds_to_markdown(subject, builds))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Table => Ok(bundle
            .iter()
            .map(|(subject, builds)| builds_to_table(subject, builds))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Formats a single page's builds.
///
/// JSON and YAML emit the page as a one-subject mapping, the same shape a
/// bundle uses.
pub fn format_page(page: &PageResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let bundle = DexBundle::from_pages([page.clone()])?;
            format_bundle(&bundle, format)
        }
        OutputFormat::Markdown => Ok(builds_to_markdown(&page.subject, &page.builds)),
        OutputFormat::Table => Ok(builds_to_table(&page.subject, &page.builds)),
    }
}

/// Formats a per-page extraction report.
pub fn format_report(report: &ExtractionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats a batch report bundle.
pub fn format_report_bundle(
    bundle: &ExtractionReportBundle,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(bundle)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(bundle)?),
        OutputFormat::Markdown => {
            let mut out = format!("# Extraction Run ({})\n\n", bundle.generated_at);
            out.push_str(&format!(
                "- **Pages:** {}\n- **Failures:** {}\n\n",
                bundle.reports.len(),
                bundle.failures.len()
            ));
            out.push_str("| Subject | Strategy | Records | Status |\n");
            out.push_str("|---------|----------|---------|--------|\n");
            for report in &bundle.reports {
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    report.subject,
                    report.strategy.as_deref().unwrap_or("-"),
                    report.record_count,
                    status(report)
                ));
            }
            Ok(out)
        }
        OutputFormat::Table => Ok(bundle
            .reports
            .iter()
            .map(report_to_table)
            .collect::<Vec<_>>()
            .join("")),
    }
}

/// Compact spread such as `252 HP / 4 DEF / 252 SPA`, or `-` when empty.
fn spread_summary(evs: &EvSpread) -> String {
    let parts: Vec<String> = evs
        .iter()
        .filter(|(_, value)| *value > 0)
        .map(|(key, value)| format!("{value} {key}"))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" / ")
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn status(report: &ExtractionReport) -> String {
    match report.failure_code {
        Some(code) => code.to_string(),
        None if report.success => "ok".to_string(),
        None => "failed".to_string(),
    }
}

fn builds_to_markdown(subject: &str, builds: &[BuildRecord]) -> String {
    let mut out = format!("## {subject}\n\n");

    if builds.is_empty() {
        out.push_str("_No builds found._\n");
        return out;
    }

    out.push_str("| # | Name | Nature | Ability | Tera | Item | EVs | Moves |\n");
    out.push_str("|---|------|--------|---------|------|------|-----|-------|\n");
    for (index, build) in builds.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            index + 1,
            build.name.as_deref().unwrap_or("-"),
            or_dash(&build.nature),
            or_dash(&build.ability),
            or_dash(&build.tera_type),
            or_dash(&build.held_item),
            spread_summary(&build.evs),
            build.moveset.join(", ")
        ));
    }

    out
}

fn builds_to_table(subject: &str, builds: &[BuildRecord]) -> String {
    let mut out = format!("{subject}  Builds: {}\n", builds.len());

    for (index, build) in builds.iter().enumerate() {
        let title = build.name.as_deref().unwrap_or("(unnamed)");
        out.push_str(&format!("  {}. {title}\n", index + 1));

        let rows = [
            ("Nature", or_dash(&build.nature).to_string()),
            ("Ability", or_dash(&build.ability).to_string()),
            ("Tera", or_dash(&build.tera_type).to_string()),
            ("Item", or_dash(&build.held_item).to_string()),
            ("EVs", spread_summary(&build.evs)),
            ("Moves", build.moveset.join(", ")),
        ];
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(4);
        for (label, value) in rows {
            out.push_str(&format!("     {label:<width$}  {value}\n"));
        }
        if let Some(ref recommendation) = build.recommendation {
            out.push_str(&format!("     {:<width$}  {recommendation}\n", "Note"));
        }
    }

    out
}

fn report_to_markdown(report: &ExtractionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Extraction Report: {}\n\n", report.subject));
    out.push_str(&format!(
        "- **Success:** {}\n",
        if report.success { "yes" } else { "no" }
    ));
    out.push_str(&format!(
        "- **Strategy:** {}\n",
        report.strategy.as_deref().unwrap_or("none")
    ));
    out.push_str(&format!("- **Records:** {}\n", report.record_count));
    if !report.strategies_attempted.is_empty() {
        out.push_str(&format!(
            "- **Attempted:** {}\n",
            report.strategies_attempted.join(", ")
        ));
    }

    if let Some(ref code) = report.failure_code {
        out.push_str(&format!("- **Failure Code:** {code}\n"));
    }
    if let Some(ref detail) = report.failure_detail {
        out.push_str(&format!("- **Failure Detail:** {detail}\n"));
    }

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn report_to_table(report: &ExtractionReport) -> String {
    let mut out = format!(
        "{:<24} {:<20} {:>3}  {}\n",
        report.subject,
        report.strategy.as_deref().unwrap_or("-"),
        report.record_count,
        status(report)
    );
    for w in &report.warnings {
        out.push_str(&format!("  warning: {w}\n"));
    }
    out
}
