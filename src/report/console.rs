use crate::fingerprint::ScanStatus;
use crate::report::report_model::ScanReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a scan report for terminal output.
///
/// Produces output like:
/// ```text
/// === Scan: #0 Window(50032) 'Main' (12 elements) ===
///
/// ✗ FAIL  #3 Button(50000) '': NameNotEmpty
///     The Name property of a focusable element must not be an empty string.
///     Fix: Provide a descriptive name.
/// ? OPEN  #5 ListItem(50007) 'Row': ListItemSiblingsUnique
///
/// === Results: 40 passed, 1 failed, 1 uncertain, 0 not supported ===
/// ```
pub fn format_console_report(report: &ScanReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Scan: {} ({} elements) ===\n",
        report.target, report.elements_captured
    ));
    if report.upper_bound_exceeded {
        out.push_str("    [WARN] element bound exceeded, results are partial\n");
    }
    out.push('\n');

    for finding in &report.findings {
        let marker = match finding.status {
            ScanStatus::Fail => "\u{2717} FAIL",
            ScanStatus::ScanNotSupported => "! NOTE",
            _ => "? OPEN",
        };
        let rule = finding.rule_id.map(|id| id.to_string()).unwrap_or_else(|| "unknown rule".to_string());
        out.push_str(&format!("{}  {}: {}\n", marker, finding.element, rule));

        if let Some(ref error) = finding.error_message {
            out.push_str(&format!("    [ERROR] {}\n", error));
        } else if finding.status == ScanStatus::Fail {
            out.push_str(&format!("    {}\n", finding.description));
            out.push_str(&format!("    Fix: {}\n", finding.how_to_fix));
        }
    }

    if !report.violations.is_empty() {
        out.push_str(&format!("\n{} distinct violations:\n", report.violations.len()));
        for group in &report.violations {
            out.push_str(&format!(
                "  {} {} ({} elements)\n",
                group.fingerprint,
                group.rule_id,
                group.element_ids.len()
            ));
        }
    }

    if let Some(history) = report.history {
        out.push_str(&format!(
            "\nSince last run: {} new, {} recurring, {} resolved\n",
            history.new, history.recurring, history.resolved
        ));
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} uncertain, {} not supported",
        report.passed, report.failed, report.uncertain, report.not_supported
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
