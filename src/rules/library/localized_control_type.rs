use crate::condition::properties::is_keyboard_focusable;
use crate::condition::string_property::LOCALIZED_CONTROL_TYPE;
use crate::element::ids::property;
use crate::rules::rule_model::{RuleDefinition, RuleId};

pub fn localized_control_type_not_null() -> RuleDefinition {
    RuleDefinition::new(RuleId::LocalizedControlTypeNotNull, is_keyboard_focusable(), |e| {
        Ok(e.localized_control_type.is_some())
    })
    .with_text(
        "The LocalizedControlType property of a focusable element must not be null.",
        "Provide a localized control type that describes the element's role.",
    )
    .with_property(property::LOCALIZED_CONTROL_TYPE)
}

pub fn localized_control_type_not_empty() -> RuleDefinition {
    let condition = is_keyboard_focusable() & LOCALIZED_CONTROL_TYPE.not_null();
    RuleDefinition::new(RuleId::LocalizedControlTypeNotEmpty, condition, |e| {
        LOCALIZED_CONTROL_TYPE.not_empty().matches(e)
    })
    .with_text(
        "The LocalizedControlType property of a focusable element must not be empty.",
        "Provide a non-empty localized control type.",
    )
    .with_property(property::LOCALIZED_CONTROL_TYPE)
}

pub fn localized_control_type_not_white_space() -> RuleDefinition {
    RuleDefinition::new(
        RuleId::LocalizedControlTypeNotWhiteSpace,
        LOCALIZED_CONTROL_TYPE.not_null_or_empty(),
        |e| LOCALIZED_CONTROL_TYPE.not_white_space().matches(e),
    )
    .with_text(
        "The LocalizedControlType property must not contain only whitespace.",
        "Provide a localized control type with visible characters.",
    )
    .with_property(property::LOCALIZED_CONTROL_TYPE)
}
