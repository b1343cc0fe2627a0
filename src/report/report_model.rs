use serde::Serialize;

use crate::element::identity::element_key;
use crate::fingerprint::{FingerprintDiff, ScanStatus, ViolationGroup};
use crate::rules::{EvaluationCode, RuleId, RuleRunner};
use crate::snapshot::{ElementProvider, Snapshot};

// ============================================================================
// Scan report: one snapshot's results, ready for output
// ============================================================================

/// One non-passing rule result.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub element_id: i32,
    /// Short element description, e.g. `#3 Button(50000) 'OK'`.
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<RuleId>,
    pub status: ScanStatus,
    pub evaluation_code: EvaluationCode,
    pub description: String,
    pub how_to_fix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Counts from comparing this run against the stored history.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistorySummary {
    pub new: usize,
    pub recurring: usize,
    pub resolved: usize,
}

/// Aggregated result of one scan.
///
/// Built from an evaluated snapshot via `from_snapshot()`. Consumed by the
/// console reporter and serialized as is for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Description of the scan target
    pub target: String,

    /// Elements captured, ancestors included
    pub elements_captured: usize,

    /// Elements rules ran on
    pub elements_evaluated: usize,

    /// Whether the element bound cut the capture short
    pub upper_bound_exceeded: bool,

    pub passed: usize,
    pub failed: usize,
    pub uncertain: usize,
    pub not_supported: usize,

    /// Every result that did not pass, in element order
    pub findings: Vec<Finding>,

    /// Failures grouped by fingerprint
    pub violations: Vec<ViolationGroup>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistorySummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl ScanReport {
    pub fn from_snapshot<P: ElementProvider>(snapshot: &Snapshot<P>, runner: &RuleRunner) -> Self {
        let mut report = Self {
            target: element_key(snapshot.target().data()),
            elements_captured: snapshot.len(),
            elements_evaluated: 0,
            upper_bound_exceeded: snapshot.upper_bound_exceeded(),
            passed: 0,
            failed: 0,
            uncertain: 0,
            not_supported: 0,
            findings: Vec::new(),
            violations: Vec::new(),
            history: None,
            duration_ms: None,
        };

        for (element, results) in snapshot.evaluated() {
            report.elements_evaluated += 1;
            for result in results {
                if result.evaluation_code == EvaluationCode::NotApplicable {
                    continue;
                }
                let status = ScanStatus::from(result.evaluation_code);
                match status {
                    ScanStatus::Pass => {
                        report.passed += 1;
                        continue;
                    }
                    ScanStatus::Fail => report.failed += 1,
                    ScanStatus::ScanNotSupported => report.not_supported += 1,
                    ScanStatus::Uncertain | ScanStatus::NoResult => report.uncertain += 1,
                }

                let info = result.rule_id.map(|id| runner.provider().rule(id).info());
                report.findings.push(Finding {
                    element_id: element.unique_id,
                    element: element_key(element.data()),
                    rule_id: result.rule_id,
                    status,
                    evaluation_code: result.evaluation_code,
                    description: info.map(|i| i.description.clone()).unwrap_or_default(),
                    how_to_fix: info.map(|i| i.how_to_fix.clone()).unwrap_or_default(),
                    error_message: result.error_message.clone(),
                });
            }
        }

        report
    }

    pub fn with_violations(mut self, violations: Vec<ViolationGroup>) -> Self {
        self.violations = violations;
        self
    }

    pub fn with_history(mut self, diff: &FingerprintDiff) -> Self {
        self.history = Some(HistorySummary {
            new: diff.new.len(),
            recurring: diff.recurring.len(),
            resolved: diff.resolved.len(),
        });
        self
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
