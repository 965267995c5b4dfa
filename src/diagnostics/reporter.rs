//! Formatting and reporting for binding check results

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::DiagnosticsReport;

/// Formats a diagnostics report as a pretty table
pub fn format_report(report: &DiagnosticsReport) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Check", "Status", "Findings", "Duration", "Message"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            result.findings.len().to_string(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = table.to_string();
    output.push('\n');
    output.push_str(&format_summary(report));
    output
}

/// Formats the summary section of the report
fn format_summary(report: &DiagnosticsReport) -> String {
    let mut lines = vec![
        format!("\n{}", "Summary".bold().underline()),
        format!("  Total checks: {}", report.total),
        format!("  {} Passed: {}", "✓".green(), report.passed),
    ];
    if report.warned > 0 {
        lines.push(format!("  {} Warned: {}", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} Failed: {}", "✗".red(), report.failed));
    }

    let overall = if !report.is_healthy() {
        "Overall: BROKEN BINDINGS".red().bold()
    } else if report.has_warnings() {
        "Overall: OK (with warnings)".yellow().bold()
    } else {
        "Overall: OK".green().bold()
    };
    lines.push(format!("\n  {}", overall));

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}

/// Prints a diagnostics report to stdout, followed by per-check findings
pub fn print_report(report: &DiagnosticsReport) {
    println!("{}", format_report(report));

    for (name, result) in &report.results {
        if let Some(details) = result.details() {
            println!("\n{} Details:", name.bold());
            println!("{}", details);
        }
    }
}
