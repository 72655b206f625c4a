use std::fmt::Write as _;

use crate::stats::{weekday_name, ActivityReport};
use crate::utils::format_number;

/// Width, in characters, of the longest weekday bar.
const BAR_WIDTH: u64 = 30;

/// Plain-text weekday report for the terminal.
pub fn format_report(report: &ActivityReport, tagline: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n--- {} Commit Weekdays ---", report.username);

    match &report.span {
        Some(span) => {
            let _ = writeln!(
                out,
                "Date range: {} to {} ({} days)",
                span.first.format("%B %-d, %Y"),
                span.last.format("%B %-d, %Y"),
                format_number(span.days_between.max(0) as u64)
            );
        }
        None => {
            let _ = writeln!(out, "Date range: no data available");
        }
    }

    let _ = writeln!(
        out,
        "Total contributions: {} over {} active days",
        format_number(report.counts.total()),
        format_number(report.active_days as u64)
    );

    out.push('\n');
    let max = u64::from(report.counts.max_count().max(1));
    for (day, count) in report.counts.iter() {
        let bar = "#".repeat((u64::from(count) * BAR_WIDTH / max) as usize);
        let _ = writeln!(
            out,
            "{:<10} {:>7}  {}",
            weekday_name(day),
            format_number(u64::from(count)),
            bar
        );
    }

    let _ = writeln!(
        out,
        "\nMost active day: {}",
        weekday_name(report.counts.most_active())
    );
    let _ = writeln!(
        out,
        "Least active day: {}",
        weekday_name(report.counts.least_active())
    );

    if let Some(tagline) = tagline {
        let _ = writeln!(out, "\n{}", tagline);
    }
    out
}

pub fn print_report(report: &ActivityReport, tagline: Option<&str>) {
    print!("{}", format_report(report, tagline));
}
