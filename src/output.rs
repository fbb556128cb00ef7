//! Console summary formatting.
//!
//! Per-comic progress lines are printed where they happen (the fetcher); this
//! module only formats the end-of-run summary so `main` stays declarative.

use crate::pipeline::RunSummary;

/// One-or-two-line wrap-up printed after a run.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.reused {
        lines.push(format!(
            "Reused cached book for #{}-#{} → {}",
            summary.first,
            summary.last,
            summary.output.display()
        ));
    } else {
        lines.push(format!(
            "Built #{}-#{} ({} comics) → {}",
            summary.first,
            summary.last,
            summary.last - summary.first + 1,
            summary.output.display()
        ));
        if summary.degraded > 0 {
            lines.push(format!(
                "{} comic(s) degraded to placeholders",
                summary.degraded
            ));
        }
    }
    lines
}

pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn summary(reused: bool, degraded: u32) -> RunSummary {
        RunSummary {
            first: 2701,
            last: 3000,
            reused,
            degraded,
            output: PathBuf::from("xkcd.kepub.epub"),
        }
    }

    #[test]
    fn built_summary_shows_range_and_count() {
        let lines = format_run_summary(&summary(false, 0));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("#2701-#3000"));
        assert!(lines[0].contains("300 comics"));
    }

    #[test]
    fn degraded_count_gets_its_own_line() {
        let lines = format_run_summary(&summary(false, 4));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("4 comic(s) degraded"));
    }

    #[test]
    fn reused_summary_says_so() {
        let lines = format_run_summary(&summary(true, 0));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Reused cached book"));
    }
}
