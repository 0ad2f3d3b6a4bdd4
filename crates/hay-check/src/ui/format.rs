//! Formatting for durations and the run summary.

use super::messages::paint;
use crate::runner::{Outcome, RunSummary};
use console::Term;
use owo_colors::Style;
use std::time::Duration;

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use hay_check::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the per-check results table to stderr.
pub fn print_run_summary(summary: &RunSummary) {
    let width = usize::from(Term::stderr().size().1).min(80);

    eprintln!("\n{}", paint("Check Summary", Style::new().bold().underline()));
    eprintln!("{}", "─".repeat(width));

    for report in &summary.reports {
        let (glyph, detail) = match &report.outcome {
            Outcome::Passed => (paint("✓", Style::new().green().bold()), String::new()),
            Outcome::Failed(e) => (
                paint("✗", Style::new().red().bold()),
                format!("\n      {}", paint(&e.to_string(), Style::new().red())),
            ),
        };
        eprintln!(
            "  {glyph} {} {}{detail}",
            paint(&report.name, Style::new().bright_white().bold()),
            paint(
                &format!("({})", format_duration(report.duration)),
                Style::new().dimmed()
            ),
        );
    }

    eprintln!("{}", "─".repeat(width));

    let mut totals = format!("{} passed", summary.passed());
    if summary.failed() > 0 {
        totals.push_str(&format!(", {} failed", summary.failed()));
    }
    if summary.skipped > 0 {
        totals.push_str(&format!(", {} skipped", summary.skipped));
    }
    let style = if summary.is_success() {
        Style::new().green()
    } else {
        Style::new().red()
    };

    eprintln!(
        "  {} {} in {}",
        paint("Total:", Style::new().bold()),
        paint(&totals, style),
        format_duration(summary.duration())
    );
}
