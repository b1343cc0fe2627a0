use crate::condition::Condition;
use crate::condition::properties::{
    self as props, bounding_rectangle_valid, button, edge, is_not_keyboard_focusable,
    is_not_off_screen, light_dismiss_button, pane, system_menu_bar, system_menu_item, window, wpf,
};
use crate::condition::relationships::{parent, parent_exists};
use crate::condition::string_property::CLASS_NAME;
use crate::element::control_type::{GROUP, SCROLL_BAR, SLIDER};
use crate::element::ids::property;
use crate::rules::rule_model::{RuleDefinition, RuleId};

const DESKTOP_CLASS_NAME: &str = "#32769";
const DIALOG_CLASS_NAME: &str = "#32770";

pub fn bounding_rectangle_not_null() -> RuleDefinition {
    // Windows leaves the system menu bar and its item without a rectangle.
    // WPF scroll bar page buttons and unfocusable slider buttons collapse to
    // nothing at either end of their range.
    let edge_group = Condition::control_type(GROUP) & edge();
    let wpf_page_button = button() & wpf() & parent(Condition::control_type(SCROLL_BAR));
    let slider_button = button() & is_not_keyboard_focusable() & parent(Condition::control_type(SLIDER));
    let condition = is_not_off_screen()
        & !wpf_page_button
        & !slider_button
        & !edge_group
        & !system_menu_bar()
        & !system_menu_item();
    RuleDefinition::new(RuleId::BoundingRectangleNotNull, condition, |e| {
        props::bounding_rectangle_not_null().matches(e)
    })
    .with_text(
        "An on-screen element must have a BoundingRectangle.",
        "Report the element's screen location through BoundingRectangle.",
    )
    .with_property(property::BOUNDING_RECTANGLE)
}

pub fn bounding_rectangle_completely_obscures_container() -> RuleDefinition {
    // Windows and dialogs may be any size regardless of their parent.
    let dialog = pane() & CLASS_NAME.is(DIALOG_CLASS_NAME);
    let desktop = pane() & CLASS_NAME.is(DESKTOP_CLASS_NAME);
    let condition = !window()
        & !dialog
        & is_not_off_screen()
        & bounding_rectangle_valid()
        & parent_exists()
        & !parent(desktop)
        & parent(bounding_rectangle_valid())
        & !light_dismiss_button();
    RuleDefinition::new(RuleId::BoundingRectangleCompletelyObscuresContainer, condition, |e| {
        Ok(!props::bounding_rectangle_completely_obscures_container().matches(e)?)
    })
    .with_text(
        "An element's BoundingRectangle must not completely cover its container.",
        "Make sure the element's rectangle lies within its parent's rectangle.",
    )
    .with_property(property::BOUNDING_RECTANGLE)
}
