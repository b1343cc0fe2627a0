use crate::condition::properties::{
    self as props, bounding_rectangle_valid, is_content_element_exists, is_control_element,
    is_control_element_exists, text, tool_tip, wpf_button, xaml_text_in_edit,
};
use crate::element::ids::property;
use crate::rules::rule_model::{RuleDefinition, RuleId};

pub fn is_control_element_property_exists() -> RuleDefinition {
    RuleDefinition::new(RuleId::IsControlElementPropertyExists, props::is_control_element_true_required(), |e| {
        is_control_element_exists().matches(e)
    })
    .with_text(
        "The IsControlElement property must exist.",
        "Expose IsControlElement for the element.",
    )
    .with_property(property::IS_CONTROL_ELEMENT)
}

pub fn is_control_element_true_required() -> RuleDefinition {
    let condition = bounding_rectangle_valid()
        & props::is_control_element_true_required()
        & !xaml_text_in_edit()
        & !wpf_button();
    RuleDefinition::new(RuleId::IsControlElementTrueRequired, condition, |e| is_control_element().matches(e))
        .with_text(
            "The IsControlElement property must be true for interactive control types.",
            "Set IsControlElement to true so the element appears in the control view.",
        )
        .with_property(property::IS_CONTROL_ELEMENT)
}

pub fn is_content_element_property_exists() -> RuleDefinition {
    let condition = bounding_rectangle_valid() & (tool_tip() | text());
    RuleDefinition::new(RuleId::IsContentElementPropertyExists, condition, |e| {
        is_content_element_exists().matches(e)
    })
    .with_text(
        "The IsContentElement property must exist.",
        "Expose IsContentElement for the element.",
    )
    .with_property(property::IS_CONTENT_ELEMENT)
}
