use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::rules::RunResult;

/// One line of the JSONL scan trace.
#[derive(Debug, Serialize)]
pub struct ScanTraceEvent {
    pub timestamp_ms: u128,
    pub phase: String,

    pub element_id: Option<i32>,
    pub rule_id: Option<String>,
    pub outcome: Option<String>,

    pub elements: Option<usize>,
    pub upper_bound_exceeded: Option<bool>,
    pub message: Option<String>,
}

impl ScanTraceEvent {
    pub fn now(phase: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            phase: phase.to_string(),
            element_id: None,
            rule_id: None,
            outcome: None,
            elements: None,
            upper_bound_exceeded: None,
            message: None,
        }
    }

    pub fn with_result(mut self, result: &RunResult) -> Self {
        self.element_id = Some(result.element_id);
        self.rule_id = result.rule_id.map(|id| id.to_string());
        self.outcome = Some(format!("{:?}", result.evaluation_code));
        self.message = result.error_message.clone();
        self
    }

    pub fn with_elements(mut self, elements: usize, upper_bound_exceeded: bool) -> Self {
        self.elements = Some(elements);
        self.upper_bound_exceeded = Some(upper_bound_exceeded);
        self
    }

    pub fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }
}
