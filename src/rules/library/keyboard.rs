use crate::condition::properties::{
    expected_to_be_focusable, is_enabled, is_keyboard_focusable, is_not_enabled,
    is_not_keyboard_focusable, is_not_off_screen, list_item,
};
use crate::condition::relationships::any_child;
use crate::element::ids::property;
use crate::rules::rule_model::{A11yCriteria, EvaluationCode, RuleDefinition, RuleId};

pub fn is_keyboard_focusable_should_be_true() -> RuleDefinition {
    // A list item whose child takes focus is reachable through that child.
    let condition = is_enabled()
        & is_not_off_screen()
        & !(list_item() & any_child(is_keyboard_focusable()))
        & expected_to_be_focusable();
    RuleDefinition::new(RuleId::IsKeyboardFocusableShouldBeTrue, condition, |e| {
        is_keyboard_focusable().matches(e)
    })
    .with_text(
        "An enabled, on-screen interactive element should be keyboard focusable.",
        "Make the element focusable so keyboard users can reach it.",
    )
    .with_standard(A11yCriteria::Keyboard)
    .with_property(property::IS_KEYBOARD_FOCUSABLE)
    .with_error_code(EvaluationCode::Warning)
}

pub fn is_keyboard_focusable_false_but_disabled() -> RuleDefinition {
    let condition = is_not_keyboard_focusable() & is_not_enabled() & is_not_off_screen() & expected_to_be_focusable();
    RuleDefinition::new(RuleId::IsKeyboardFocusableFalseButDisabled, condition, |_| Ok(false))
        .with_text(
            "The element is not keyboard focusable, but it is disabled.",
            "Verify the element should be disabled; disabled elements are not expected to take focus.",
        )
        .with_standard(A11yCriteria::Keyboard)
        .with_property(property::IS_KEYBOARD_FOCUSABLE)
        .with_error_code(EvaluationCode::Note)
}
