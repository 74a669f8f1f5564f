//! Run summary reporting

use crate::crawler::PipelineReport;

/// Formats a pipeline report for the terminal
pub fn format_report(report: &PipelineReport) -> String {
    let mut out = String::new();

    out.push_str("=== Harvest Summary ===\n\n");
    out.push_str(&format!("  Seed: {}\n", report.seed_url));
    out.push_str(&format!("  Links discovered: {}\n", report.links_discovered));
    out.push_str(&format!(
        "  Extractors: {} launched, {} completed\n",
        report.tasks_launched, report.tasks_completed
    ));
    out.push_str(&format!("  Records kept: {}\n", report.records_collected));
    out.push_str(&format!("  Empty pages dropped: {}\n", report.records_dropped));
    out.push_str(&format!("  Failed pages: {}\n", report.pages_failed));

    let yield_rate = if report.tasks_completed > 0 {
        (report.records_collected as f64 / report.tasks_completed as f64) * 100.0
    } else {
        0.0
    };
    out.push_str(&format!(
        "  Yield: {:.1}% in {:.2}s\n",
        yield_rate,
        report.elapsed.as_secs_f64()
    ));

    out
}

/// Prints a pipeline report to stdout
pub fn print_report(report: &PipelineReport) {
    print!("{}", format_report(report));
}
