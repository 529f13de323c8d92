//! Plain and table presentation of summaries and quota comparisons.

use pkg_aggregate::{ComparisonReport, MetricSummary};
use std::io::{self, Write};

/// Write the per-metric summary, either as plain lines (default) or as
/// a bordered table with `--output table`.
pub fn write_summary(w: &mut impl Write, rows: &[MetricSummary], format: &str) -> io::Result<()> {
    match format {
        "table" => {
            let line = "+----------------+---------------+---------------+---------------+";
            writeln!(w, "{}", line)?;
            writeln!(
                w,
                "| {:<14} | {:<13} | {:<13} | {:<13} |",
                "", "Static wrkld", "Jobs", "Sum"
            )?;
            writeln!(w, "{}", line)?;
            for row in rows {
                writeln!(
                    w,
                    "| {:<14} | {:>13} | {:>13} | {:>13} |",
                    row.metric.label(),
                    row.static_total.to_string(),
                    row.job_total.to_string(),
                    row.combined.to_string(),
                )?;
            }
            writeln!(w, "{}", line)
        }
        _ => {
            for row in rows {
                writeln!(
                    w,
                    "{} {} + {} (Jobs) = {}",
                    row.metric.label(),
                    row.static_total,
                    row.job_total,
                    row.combined
                )?;
            }
            Ok(())
        }
    }
}

/// Write the quota comparison table: totals, ceiling, and the
/// static-only and combined verdicts per metric.
pub fn write_comparison(w: &mut impl Write, report: &ComparisonReport) -> io::Result<()> {
    let line = "+----------------+---------------+---------------+---------------+---------------+---------------+------------+";
    writeln!(w, "{}", line)?;
    writeln!(
        w,
        "| {:<14} | {:<13} | {:<13} | {:<13} | {:<13} | {:<13} | {:<10} |",
        "", "Static wrkld", "Jobs", "Sum", "Quota", "Status static", "Status sum"
    )?;
    writeln!(w, "{}", line)?;
    for row in &report.metrics {
        writeln!(
            w,
            "| {:<14} | {:>13} | {:>13} | {:>13} | {:>13} | {:>13} | {:>10} |",
            row.metric.label(),
            row.static_total.to_string(),
            row.job_total.to_string(),
            row.combined.to_string(),
            row.hard.to_string(),
            row.static_within,
            row.combined_within,
        )?;
    }
    writeln!(w, "{}", line)
}
