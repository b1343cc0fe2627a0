use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::element::Element;
use crate::error::{EvaluationError, ScanError};
use crate::rules::registry::RuleProvider;
use crate::rules::rule_model::{EvaluationCode, Rule, RuleOptions, RunResult};
use crate::snapshot::cancel::CancellationToken;

/// Runs catalog rules against elements.
///
/// Whatever goes wrong inside a single rule, an `Err` from its condition or
/// test or a panic, ends up as a `RuleExecutionError` result for that
/// (rule, element) pair. Only cancellation stops a batch.
pub struct RuleRunner {
    provider: RuleProvider,
}

impl RuleRunner {
    pub fn new(provider: RuleProvider) -> Self {
        Self { provider }
    }

    pub fn with_options(options: RuleOptions) -> Self {
        Self::new(RuleProvider::new(options))
    }

    pub fn provider(&self) -> &RuleProvider {
        &self.provider
    }

    pub fn get_rule(&self, raw_id: u32) -> Option<&Rule> {
        self.provider.get_rule(raw_id)
    }

    pub fn run_rule_by_id(&self, raw_id: u32, e: Element<'_>) -> RunResult {
        match self.get_rule(raw_id) {
            Some(rule) => self.run_rule(rule, e),
            None => RunResult::execution_error(None, e.unique_id, format!("no rule matching id {}", raw_id)),
        }
    }

    pub fn run_rule(&self, rule: &Rule, e: Element<'_>) -> RunResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| evaluate(rule, e)));
        let message = match outcome {
            Ok(Ok(code)) => return RunResult::new(Some(rule.id()), e.unique_id, code),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload),
        };
        warn!("Rule {} failed on element {}: {}", rule.id(), e.unique_id, message);
        RunResult::execution_error(Some(rule.id()), e.unique_id, message)
    }

    /// Runs the given rules in order, checking for cancellation before each one.
    pub fn run_rules<'r, I>(&self, rules: I, e: Element<'_>, token: &CancellationToken) -> Result<Vec<RunResult>, ScanError>
    where
        I: IntoIterator<Item = &'r Rule>,
    {
        let mut results = Vec::new();
        for rule in rules {
            token.check()?;
            results.push(self.run_rule(rule, e));
        }
        Ok(results)
    }

    pub fn run_all(&self, e: Element<'_>, token: &CancellationToken) -> Result<Vec<RunResult>, ScanError> {
        self.run_rules(self.provider.all(), e, token)
    }

    pub fn run_exclusion_rules(&self, e: Element<'_>, token: &CancellationToken) -> Result<Vec<RunResult>, ScanError> {
        self.run_rules(self.provider.all().filter(|r| r.info().exclusionary), e, token)
    }

    pub fn run_inclusion_rules(&self, e: Element<'_>, token: &CancellationToken) -> Result<Vec<RunResult>, ScanError> {
        self.run_rules(self.provider.all().filter(|r| !r.info().exclusionary), e, token)
    }

    /// An element is excluded from the remaining rules when any exclusionary
    /// rule reported it as an error.
    pub fn exclude_from_run(results: &[RunResult]) -> bool {
        results.iter().any(|r| r.evaluation_code == EvaluationCode::Error)
    }

    /// Exclusion rules first; inclusion rules only when nothing excluded the
    /// element.
    pub fn run_for_element(&self, e: Element<'_>, token: &CancellationToken) -> Result<Vec<RunResult>, ScanError> {
        let mut results = self.run_exclusion_rules(e, token)?;
        if Self::exclude_from_run(&results) {
            debug!("Element {} excluded from inclusion rules", e.unique_id);
        } else {
            results.extend(self.run_inclusion_rules(e, token)?);
        }
        Ok(results)
    }
}

impl Default for RuleRunner {
    fn default() -> Self {
        Self::new(RuleProvider::default())
    }
}

fn evaluate(rule: &Rule, e: Element<'_>) -> Result<EvaluationCode, EvaluationError> {
    if !rule.condition().matches(e)? {
        return Ok(EvaluationCode::NotApplicable);
    }
    Ok(if rule.passes_test(e)? { EvaluationCode::Pass } else { rule.info().error_code })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(7_u8)), "rule panicked");
    }
}
