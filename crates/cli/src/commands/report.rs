use chrono::Local;
use shelver_core::{BatchReport, WatchedRoot};
use shelver_watch::ReportSink;
use std::fmt::Write;
use std::sync::Arc;

/// Human-readable run summary for one batch
pub fn format_report(root: &WatchedRoot, report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n📂 {} → {}  ({})",
        root.input.display(),
        root.output.display(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "   ✓ Organized:   {}", report.organized);
    let _ = writeln!(out, "   ✓ Quarantined: {}", report.quarantined);
    let _ = writeln!(out, "   ✓ Unchanged:   {}", report.unchanged);

    if report.is_success() {
        let _ = writeln!(out, "\n✅ Finished successfully without errors.");
    } else {
        let _ = writeln!(out, "\nSummary of errors:");
        for error in &report.errors {
            let _ = writeln!(out, "   {}", error);
        }
    }

    out
}

/// Sink that prints every report as it arrives
pub fn printing_sink() -> ReportSink {
    Arc::new(|root: &WatchedRoot, report: &BatchReport| {
        print!("{}", format_report(root, report));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_success() {
        let report = BatchReport {
            organized: 3,
            quarantined: 1,
            ..Default::default()
        };
        let text = format_report(&WatchedRoot::new("in", "out"), &report);

        assert!(text.contains("in → out"));
        assert!(text.contains("Organized:   3"));
        assert!(text.contains("Quarantined: 1"));
        assert!(text.contains("Finished successfully without errors"));
        assert!(!text.contains("Summary of errors"));
    }

    #[test]
    fn test_format_lists_every_error() {
        let mut report = BatchReport::default();
        report.push_error("ERROR moving in/a.mp3: denied");
        report.push_error("ERROR: Missing metadata (title, artist or album) for: in/b.mp3");
        let text = format_report(&WatchedRoot::new("in", "out"), &report);

        assert!(text.contains("Summary of errors:"));
        assert!(text.contains("in/a.mp3: denied"));
        assert!(text.contains("in/b.mp3"));
        assert!(!text.contains("Finished successfully"));
    }
}
