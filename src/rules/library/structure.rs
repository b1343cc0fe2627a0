use crate::condition::properties::{
    bounding_rectangle_valid, custom, data_item, grid_item_pattern, heading_level, hyperlink,
    image, is_content_or_control_element, is_keyboard_focusable, is_not_keyboard_focusable,
    list_item, name_required, pane, wpf,
};
use crate::condition::relationships::{any_ancestor, any_of, no_child, not_parent, parent_exists, sibling_count};
use crate::condition::string_property::{LOCALIZED_CONTROL_TYPE, NAME};
use crate::condition::{Condition, ConditionContext};
use crate::element::Element;
use crate::element::control_type::{SCROLL_BAR, THUMB, TREE_ITEM};
use crate::element::ids::{heading, property};
use crate::error::EvaluationError;
use crate::rules::rule_model::{A11yCriteria, EvaluationCode, RuleDefinition, RuleId};

fn require_parent(e: Element<'_>) -> Result<Element<'_>, EvaluationError> {
    e.parent()
        .ok_or_else(|| EvaluationError::rule(format!("element {} has no parent", e.unique_id)))
}

fn text_of<'e>(e: &'e Element<'_>, value: Option<&'e str>, label: &str) -> Result<&'e str, EvaluationError> {
    value.ok_or_else(|| EvaluationError::missing_property(e.unique_id, label))
}

/// Siblings (the element included) matching `c`. The element itself always
/// matches, so anything below one means the tree is inconsistent.
fn unique_among_siblings(e: Element<'_>, c: Condition, rule: RuleId) -> Result<bool, EvaluationError> {
    require_parent(e)?;
    let count = sibling_count(c).value(e, &mut ConditionContext::new())?;
    if count < 1 {
        return Err(EvaluationError::rule(format!("{}: no matching element found", rule)));
    }
    Ok(count == 1)
}

pub fn list_item_siblings_unique() -> RuleDefinition {
    let condition = list_item()
        & is_content_or_control_element()
        & parent_exists()
        & NAME.not_null_or_empty()
        & LOCALIZED_CONTROL_TYPE.not_null_or_empty()
        & bounding_rectangle_valid();
    RuleDefinition::new(RuleId::ListItemSiblingsUnique, condition, |e| {
        let name = text_of(&e, e.data().name.as_deref(), "Name")?;
        let lct = text_of(&e, e.data().localized_control_type.as_deref(), "LocalizedControlType")?;
        let focus = if e.is_keyboard_focusable == Some(true) {
            is_keyboard_focusable()
        } else {
            is_not_keyboard_focusable()
        };
        let same = Condition::control_type(e.control_type_id) & focus & NAME.is(name) & LOCALIZED_CONTROL_TYPE.is(lct);
        unique_among_siblings(e, same, RuleId::ListItemSiblingsUnique)
    })
    .with_text(
        "List items with the same parent should not share both name and localized control type.",
        "Give each list item a distinct name.",
    )
    .with_standard(A11yCriteria::NameRoleValue)
    .with_error_code(EvaluationCode::Warning)
}

fn eligible_focusable_sibling() -> Condition {
    let excluded = any_of(vec![
        data_item(),
        image(),
        pane(),
        Condition::control_type(SCROLL_BAR),
        Condition::control_type(THUMB),
        Condition::control_type(TREE_ITEM),
        list_item(),
        hyperlink(),
    ]);
    is_keyboard_focusable()
        & is_content_or_control_element()
        & !excluded
        & !grid_item_pattern()
        & parent_exists()
        & NAME.not_null_or_empty()
        & LOCALIZED_CONTROL_TYPE.not_null_or_empty()
        & bounding_rectangle_valid()
}

pub fn sibling_unique_and_focusable() -> RuleDefinition {
    let wpf_data_item = data_item() & wpf() & no_child(custom() | NAME.null_or_empty());
    let condition = eligible_focusable_sibling() & not_parent(wpf_data_item);
    RuleDefinition::new(RuleId::SiblingUniqueAndFocusable, condition, |e| {
        let name = text_of(&e, e.data().name.as_deref(), "Name")?;
        let lct = text_of(&e, e.data().localized_control_type.as_deref(), "LocalizedControlType")?;
        let same = eligible_focusable_sibling() & NAME.is(name) & LOCALIZED_CONTROL_TYPE.is(lct);
        unique_among_siblings(e, same, RuleId::SiblingUniqueAndFocusable)
    })
    .with_text(
        "Focusable sibling elements must not share both name and localized control type.",
        "Give each focusable sibling a distinct name.",
    )
    .with_standard(A11yCriteria::NameRoleValue)
}

fn eligible_hyperlink() -> Condition {
    hyperlink() & is_content_or_control_element() & parent_exists() & NAME.not_null_or_empty() & bounding_rectangle_valid()
}

pub fn hyperlink_name_should_be_unique() -> RuleDefinition {
    RuleDefinition::new(RuleId::HyperlinkNameShouldBeUnique, eligible_hyperlink(), |e| {
        require_parent(e)?;
        let name = text_of(&e, e.data().name.as_deref(), "Name")?;
        sibling_count(eligible_hyperlink() & NAME.is(name)).le(1).matches(e)
    })
    .with_text(
        "Hyperlinks with the same parent should have distinct names.",
        "Make each link name describe its own destination.",
    )
    .with_standard(A11yCriteria::NameRoleValue)
    .with_error_code(EvaluationCode::Warning)
}

pub fn parent_child_should_not_have_same_name_and_localized_control_type() -> RuleDefinition {
    let condition = is_keyboard_focusable() & bounding_rectangle_valid() & name_required();
    RuleDefinition::new(RuleId::ParentChildShouldNotHaveSameNameAndLocalizedControlType, condition, |e| {
        let parent = require_parent(e)?;
        Ok(e.name != parent.name || e.localized_control_type != parent.localized_control_type)
    })
    .with_text(
        "A focusable element must not have the same name and localized control type as its parent.",
        "Rename the child or the parent, or remove the redundant element from the control view.",
    )
    .with_property(property::NAME)
}

pub fn heading_level_descends_when_nested() -> RuleDefinition {
    let condition = heading_level().ge(heading::HEADING_LEVEL_1) & heading_level().le(heading::HEADING_LEVEL_9);
    RuleDefinition::new(RuleId::HeadingLevelDescendsWhenNested, condition, |e| {
        let deeper_ancestor = any_ancestor(heading_level().gt(e.heading_level()));
        Ok(!deeper_ancestor.matches(e)?)
    })
    .with_text(
        "A heading nested inside another heading must have a higher heading level.",
        "Adjust heading levels so they descend as headings nest.",
    )
    .with_standard(A11yCriteria::InfoAndRelationships)
    .with_property(property::HEADING_LEVEL)
}
