use crate::condition::Condition;
use crate::condition::properties::{direct_ui, document, edit, is_keyboard_focusable, progress_bar, win32};
use crate::element::PropertyValue;
use crate::element::ids::pattern;
use crate::error::EvaluationError;
use crate::rules::rule_model::{A11yCriteria, RuleDefinition, RuleId};

pub fn control_should_support_text_pattern() -> RuleDefinition {
    let win32_edit = edit() & win32();
    let unfocusable_direct_ui_edit = edit() & !is_keyboard_focusable() & direct_ui();
    let condition = document() | (edit() & !win32_edit & !unfocusable_direct_ui_edit);
    RuleDefinition::new(RuleId::ControlShouldSupportTextPattern, condition, |e| {
        Condition::pattern(pattern::TEXT).matches(e)
    })
    .with_text(
        "Documents and edit controls must support the Text pattern.",
        "Implement the Text pattern so assistive technology can read and navigate the content.",
    )
    .with_standard(A11yCriteria::AvailableActions)
}

pub fn progress_bar_range_value() -> RuleDefinition {
    let condition = progress_bar() & Condition::pattern(pattern::RANGE_VALUE);
    RuleDefinition::new(RuleId::ProgressBarRangeValue, condition, |e| {
        let range = e
            .pattern(pattern::RANGE_VALUE)
            .ok_or_else(|| EvaluationError::missing_property(e.unique_id, "RangeValuePattern"))?;
        let number = |name: &str| range.get(name).and_then(PropertyValue::as_double);
        let max_above_min = match (number("Maximum"), number("Minimum")) {
            (Some(max), Some(min)) => max > min,
            _ => false,
        };
        let read_only = range.get("IsReadOnly").and_then(PropertyValue::as_bool) == Some(true);
        Ok(max_above_min && read_only)
    })
    .with_text(
        "A progress bar's RangeValue pattern must be read-only with Maximum above Minimum.",
        "Set IsReadOnly to true and give the range a Maximum greater than its Minimum.",
    )
}
