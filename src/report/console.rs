// src/report/console.rs

//! Plain-text report

use crate::analyzer::{AnalysisReport, Verdict};
use std::io::{self, Write};
use std::time::Duration;

/// Write the human-readable report
pub fn write_console<W: Write>(out: &mut W, report: &AnalysisReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Analysis Summary")?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Total overrides:    {}", report.total)?;
    writeln!(out, "  Redundant:          {}", report.redundant)?;
    writeln!(out, "  Required:           {}", report.required)?;
    writeln!(out, "  Duration:           {}", format_duration(report.duration))?;
    writeln!(out)?;

    if report.redundant > 0 {
        writeln!(out, "Redundant overrides that can be removed:")?;
        writeln!(out)?;
        for result in report.with_verdict(Verdict::Redundant) {
            writeln!(out, "  • {}", result.name)?;
            writeln!(out, "    Override: {}", result.override_value)?;
            writeln!(out, "    Reason:   {}", result.reason)?;
            writeln!(out)?;
        }
    }

    // Required ones are only listed next to redundant ones
    if report.required > 0 && report.redundant > 0 {
        writeln!(out, "Required overrides (keep these):")?;
        writeln!(out)?;
        for result in report.with_verdict(Verdict::Required) {
            writeln!(out, "  • {}", result.name)?;
            writeln!(out, "    Reason: {}", result.reason)?;
            writeln!(out)?;
        }
    }

    if report.redundant > 0 {
        writeln!(
            out,
            "Run with --fix to automatically remove {} redundant override(s).",
            report.redundant
        )?;
    } else if report.total > 0 {
        writeln!(out, "All overrides are required. No cleanup needed.")?;
    }

    Ok(())
}

/// `850ms` below one second, `2.3s` above
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::OverrideResult;

    fn result(name: &str, verdict: Verdict, reason: &str) -> OverrideResult {
        OverrideResult {
            name: name.to_string(),
            override_value: "1.0.0".to_string(),
            before: None,
            after: None,
            verdict,
            reason: reason.to_string(),
        }
    }

    fn render(report: &AnalysisReport) -> String {
        let mut buf = Vec::new();
        write_console(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.0s");
        assert_eq!(format_duration(Duration::from_millis(2340)), "2.3s");
    }

    #[test]
    fn test_mixed_report() {
        let report = AnalysisReport::from_results(
            vec![
                result("lodash", Verdict::Redundant, "same"),
                result("undici", Verdict::Required, "older"),
            ],
            Duration::from_millis(1500),
        );
        let text = render(&report);

        assert!(text.contains("Total overrides:    2"));
        assert!(text.contains("Duration:           1.5s"));
        assert!(text.contains("• lodash"));
        assert!(text.contains("Required overrides (keep these):"));
        assert!(text.contains("• undici"));
        assert!(text.contains("Run with --fix to automatically remove 1 redundant override(s)."));
    }

    #[test]
    fn test_all_required_report() {
        let report = AnalysisReport::from_results(
            vec![result("undici", Verdict::Required, "older")],
            Duration::from_millis(10),
        );
        let text = render(&report);

        assert!(!text.contains("Required overrides (keep these):"));
        assert!(text.contains("All overrides are required. No cleanup needed."));
    }

    #[test]
    fn test_empty_report_has_no_final_line() {
        let text = render(&AnalysisReport::default());
        assert!(!text.contains("--fix"));
        assert!(!text.contains("No cleanup needed"));
    }
}
