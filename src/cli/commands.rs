use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::cli::config::{OutputFormat, ScanSettings};
use crate::error::ScanError;
use crate::fingerprint::{ViolationHistory, group_failures};
use crate::report::console::format_console_report;
use crate::report::report_model::ScanReport;
use crate::rules::{RuleInfo, RuleOptions, RuleProvider, RuleRunner};
use crate::snapshot::{CancellationToken, MemoryProvider, ScanMode, SnapshotBuilder};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ScanTraceEvent;

// ============================================================================
// scan subcommand
// ============================================================================

/// Scan a fixture tree and return whether it is free of failures.
pub fn cmd_scan(settings: &ScanSettings) -> Result<bool, Box<dyn std::error::Error>> {
    let report = run_scan(settings)?;

    let output_content = match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
        OutputFormat::Console => format_console_report(&report),
    };

    // Write or print
    match settings.output.as_deref() {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(!report.has_failures())
}

/// Build, evaluate and report one scan without printing anything.
pub fn run_scan(settings: &ScanSettings) -> Result<ScanReport, ScanError> {
    let provider = Arc::new(MemoryProvider::load(&settings.tree)?);
    let target = match settings.target.as_deref() {
        Some(automation_id) => provider.find_by_automation_id(automation_id).ok_or_else(|| {
            ScanError::parameter("target", format!("no element with automation id '{}'", automation_id))
        })?,
        None => provider.root(),
    };

    let tracer = match settings.trace.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let runner = RuleRunner::with_options(RuleOptions {
        include_embedded_web_content: settings.include_web_content,
    });
    let token = CancellationToken::new();
    let start = Instant::now();

    info!("Scanning {} ({:?} mode, bound {})", settings.tree, settings.mode, settings.max_elements);
    let mut snapshot = SnapshotBuilder::new(Arc::clone(&provider))
        .with_max_elements(settings.max_elements)
        .with_mode(settings.mode)
        .with_disposal(settings.disposal)
        .build(target, &runner, &token)?;
    if snapshot.mode() == ScanMode::Live {
        snapshot.evaluate(&runner, &token)?;
    }
    tracer.log(&ScanTraceEvent::now("snapshot").with_elements(snapshot.len(), snapshot.upper_bound_exceeded()));

    if tracer.is_enabled() {
        for (_, results) in snapshot.evaluated() {
            for result in results.iter().filter(|r| r.evaluation_code.is_failure() || r.error_message.is_some()) {
                tracer.log(&ScanTraceEvent::now("result").with_result(result));
            }
        }
    }

    let violations = group_failures(snapshot.evaluated());
    let mut report = ScanReport::from_snapshot(&snapshot, &runner).with_violations(violations);

    if let Some(path) = settings.history.as_deref() {
        let mut history = ViolationHistory::load(path)?;
        let diff = history.record_run(report.violations.iter().map(|g| g.fingerprint.clone()));
        history.save(path)?;
        tracer.log(&ScanTraceEvent::now("history").with_message(format!(
            "{} new, {} recurring, {} resolved",
            diff.new.len(),
            diff.recurring.len(),
            diff.resolved.len()
        )));
        report = report.with_history(&diff);
    }

    drop(snapshot);
    let report = report.with_duration(start.elapsed().as_millis());
    tracer.log(&ScanTraceEvent::now("complete").with_message(format!("{} failed", report.failed)));
    Ok(report)
}

// ============================================================================
// rules subcommand
// ============================================================================

pub fn cmd_rules(format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let provider = RuleProvider::default();
    let infos: Vec<&RuleInfo> = provider.all().map(|r| r.info()).collect();

    match OutputFormat::parse(format)? {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&infos)?),
        OutputFormat::Console => print!("{}", format_rule_list(&infos)),
    }
    Ok(())
}

/// One block per rule: id, name, standard, description and condition.
pub fn format_rule_list(infos: &[&RuleInfo]) -> String {
    let mut out = String::new();
    for info in infos {
        out.push_str(&format!(
            "{:>3}  {} [{}]{}\n",
            info.id.as_u32(),
            info.id,
            info.standard.section(),
            if info.exclusionary { " (exclusionary)" } else { "" }
        ));
        out.push_str(&format!("     {}\n", info.description));
        out.push_str(&format!("     when: {}\n", info.condition));
    }
    out
}
