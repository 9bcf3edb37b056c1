//! Display formatting for CLI output
//!
//! Formatters return strings so commands decide where they go: the
//! inventory on stdout, warnings and summaries on stderr.

use clap::ValueEnum;
use console::style;
use kindscan_core::{InventoryReport, ResourceCandidate};
use kindscan_kube::ResolvedContext;

use crate::error::Result;

/// Inventory output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// One `plural.groupVersion` per line
    Name,
    /// Full report as JSON
    Json,
    /// Full report as YAML
    Yaml,
}

impl OutputFormat {
    /// Whether the format is meant for humans (and may carry decorations)
    pub fn is_human(self) -> bool {
        matches!(self, OutputFormat::Table)
    }
}

/// Column widths for a set of rows
fn widths<const N: usize>(header: [&str; N], rows: &[[String; N]]) -> [usize; N] {
    let mut widths = header.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render rows as columns; the last column is never padded
fn render_table<const N: usize>(header: [&str; N], rows: &[[String; N]]) -> String {
    let widths = widths(header, rows);
    let mut out = String::new();

    let mut line = Vec::with_capacity(N);
    for (i, h) in header.iter().enumerate() {
        if i + 1 == N {
            line.push(format!("{}", style(h).bold()));
        } else {
            line.push(format!("{:<w$}", style(h).bold(), w = widths[i]));
        }
    }
    out.push_str(&line.join("  "));
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i + 1 == N {
                    cell.clone()
                } else {
                    format!("{:<w$}", cell, w = widths[i])
                }
            })
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }

    out
}

/// `plural.groupVersion`, one per line
pub fn format_names(resources: &[ResourceCandidate]) -> String {
    resources
        .iter()
        .map(|c| format!("{}\n", c.qualified_name()))
        .collect()
}

/// Namespace banner shown above a table
pub fn format_target(target: &ResolvedContext) -> String {
    format!(
        "{} Namespace: {} (context: {})",
        style("→").blue().bold(),
        style(&target.namespace).cyan(),
        target.context
    )
}

/// Resource types holding objects, as a table
pub fn format_inventory_table(report: &InventoryReport) -> String {
    if report.resources.is_empty() {
        return format!(
            "No resources with objects found in namespace {}\n",
            report.namespace
        );
    }

    let rows: Vec<[String; 3]> = report
        .resources
        .iter()
        .map(|c| {
            [
                c.kind.clone(),
                c.plural_name.clone(),
                c.group_version.clone(),
            ]
        })
        .collect();

    render_table(["KIND", "NAME", "GROUP-VERSION"], &rows)
}

/// Candidates that a scan would probe, with their verbs
pub fn format_catalog_table(candidates: &[ResourceCandidate]) -> String {
    if candidates.is_empty() {
        return "No namespaced resource types discovered\n".to_string();
    }

    let rows: Vec<[String; 4]> = candidates
        .iter()
        .map(|c| {
            [
                c.kind.clone(),
                c.plural_name.clone(),
                c.group_version.clone(),
                c.verbs.iter().map(String::as_str).collect::<Vec<_>>().join(","),
            ]
        })
        .collect();

    render_table(["KIND", "NAME", "GROUP-VERSION", "VERBS"], &rows)
}

pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

pub fn format_yaml<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// Render the report in the requested format
pub fn format_report(report: &InventoryReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_inventory_table(report)),
        OutputFormat::Name => Ok(format_names(&report.resources)),
        OutputFormat::Json => format_json(report),
        OutputFormat::Yaml => format_yaml(report),
    }
}

/// Warnings, discovery errors and the run summary
///
/// Printed after the inventory so the operator can judge completeness.
pub fn format_footer(report: &InventoryReport) -> String {
    let mut out = String::new();

    if !report.warnings.is_empty() {
        out.push_str(&format!(
            "{} {} resource type(s) could not be probed, the inventory may be incomplete:\n",
            style("⚠").yellow().bold(),
            report.warnings.len()
        ));
        for warning in &report.warnings {
            out.push_str(&format!("  - {}\n", warning));
        }
    }

    if !report.discovery_errors.is_empty() {
        out.push_str(&format!(
            "{} Discovery was partial, some resource types were not considered:\n",
            style("⚠").yellow().bold()
        ));
        for failure in &report.discovery_errors {
            out.push_str(&format!("  - {}\n", failure));
        }
    }

    if report.cancelled {
        out.push_str(&format!(
            "{} Scan cancelled, the inventory above is partial\n",
            style("✗").red().bold()
        ));
    }

    let marker = if report.is_complete() {
        style("✓").green().bold()
    } else {
        style("→").blue().bold()
    };
    out.push_str(&format!("{} {}\n", marker, report.counts.summary()));

    out
}
