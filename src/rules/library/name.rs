use regex::RegexBuilder;

use crate::condition::properties::{
    allow_same_name_and_control_type, bounding_rectangle_valid, is_keyboard_focusable,
    is_not_keyboard_focusable, name_required, progress_bar, text,
};
use crate::condition::string_property::{LOCALIZED_CONTROL_TYPE, NAME};
use crate::element::Element;
use crate::element::control_type::control_type_name;
use crate::element::ids::property;
use crate::error::EvaluationError;
use crate::rules::rule_model::{EvaluationCode, RuleDefinition, RuleId};

const REASONABLE_LENGTH: usize = 512;

fn name_or_err(e: Element<'_>) -> Result<&str, EvaluationError> {
    e.data()
        .name
        .as_deref()
        .ok_or_else(|| EvaluationError::missing_property(e.unique_id, "Name"))
}

/// True when `word` appears in `haystack` as a whole word, ignoring case.
fn contains_word(haystack: &str, word: &str) -> Result<bool, EvaluationError> {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| EvaluationError::Regex { pattern, message: e.to_string() })?;
    Ok(regex.is_match(haystack))
}

pub fn name_not_null() -> RuleDefinition {
    // Progress bars need a name whether or not they take focus.
    let condition = (is_keyboard_focusable() | progress_bar()) & bounding_rectangle_valid() & name_required();
    RuleDefinition::new(RuleId::NameNotNull, condition, |e| Ok(e.name.is_some()))
        .with_text(
            "The Name property of a focusable element must not be null.",
            "Provide a name for the element, using the label or the visible text that identifies it.",
        )
        .with_property(property::NAME)
}

pub fn name_not_empty() -> RuleDefinition {
    let condition = (is_keyboard_focusable() | progress_bar())
        & NAME.not_null()
        & bounding_rectangle_valid()
        & name_required();
    RuleDefinition::new(RuleId::NameNotEmpty, condition, |e| Ok(!name_or_err(e)?.is_empty()))
        .with_text(
            "The Name property of a focusable element must not be empty.",
            "Provide a non-empty name that identifies the element's purpose.",
        )
        .with_property(property::NAME)
}

pub fn name_not_white_space() -> RuleDefinition {
    let condition = (is_keyboard_focusable() | progress_bar())
        & NAME.not_null_or_empty()
        & bounding_rectangle_valid()
        & name_required();
    RuleDefinition::new(RuleId::NameNotWhiteSpace, condition, |e| Ok(!name_or_err(e)?.trim().is_empty()))
        .with_text(
            "The Name property must not contain only whitespace.",
            "Provide a name with visible characters.",
        )
        .with_property(property::NAME)
}

pub fn name_reasonable_length() -> RuleDefinition {
    let condition = NAME.not_null_or_empty() & !text();
    RuleDefinition::new(RuleId::NameReasonableLength, condition, |e| {
        Ok(name_or_err(e)?.chars().count() <= REASONABLE_LENGTH)
    })
    .with_text(
        "The Name property must not be longer than 512 characters.",
        "Shorten the name; move longer explanations into HelpText.",
    )
    .with_property(property::NAME)
}

pub fn name_excludes_control_type() -> RuleDefinition {
    let condition = !allow_same_name_and_control_type() & NAME.not_null_or_empty() & NAME.not_white_space();
    RuleDefinition::new(RuleId::NameExcludesControlType, condition, |e| {
        let name = name_or_err(e)?;
        let type_name = control_type_name(e.control_type_id).ok_or_else(|| {
            EvaluationError::rule(format!("no control type entry for {}", e.control_type_id))
        })?;
        Ok(!contains_word(name, type_name)?)
    })
    .with_text(
        "The Name property must not include the element's control type.",
        "Remove the control type word from the name; screen readers already announce it.",
    )
    .with_property(property::NAME)
}

pub fn name_excludes_localized_control_type() -> RuleDefinition {
    let condition = !allow_same_name_and_control_type()
        & NAME.not_null_or_empty()
        & NAME.not_white_space()
        & LOCALIZED_CONTROL_TYPE.not_null_or_empty()
        & LOCALIZED_CONTROL_TYPE.not_white_space();
    RuleDefinition::new(RuleId::NameExcludesLocalizedControlType, condition, |e| {
        let name = name_or_err(e)?;
        let lct = e
            .localized_control_type
            .as_deref()
            .ok_or_else(|| EvaluationError::missing_property(e.unique_id, "LocalizedControlType"))?;
        Ok(!contains_word(name, lct)?)
    })
    .with_text(
        "The Name property must not include the element's localized control type.",
        "Remove the localized control type from the name.",
    )
    .with_property(property::NAME)
}

pub fn name_excludes_private_unicode_characters() -> RuleDefinition {
    RuleDefinition::new(RuleId::NameExcludesPrivateUnicodeCharacters, NAME.not_null_or_white_space(), |e| {
        NAME.excludes_private_unicode_characters().matches(e)
    })
    .with_text(
        "The Name property must not include private unicode characters.",
        "Replace icon-font glyphs in the name with words.",
    )
    .with_property(property::NAME)
}

pub fn name_empty_but_element_not_keyboard_focusable() -> RuleDefinition {
    // Progress bars are reported by NameNotEmpty regardless of focus.
    let condition = is_not_keyboard_focusable()
        & !progress_bar()
        & NAME.not_null()
        & bounding_rectangle_valid()
        & name_required();
    RuleDefinition::new(RuleId::NameEmptyButElementNotKeyboardFocusable, condition, |e| {
        NAME.not_empty().matches(e)
    })
    .with_text(
        "The Name of a non-focusable element is empty; check whether it conveys information.",
        "If the element conveys information, give it a name. Otherwise hide it from the control view.",
    )
    .with_property(property::NAME)
    .with_error_code(EvaluationCode::Open)
}

