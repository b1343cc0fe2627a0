use std::sync::OnceLock;

use crate::rules::library::{
    bounding_rectangle, element_flags, embedded_content, keyboard, localized_control_type, name,
    patterns, structure,
};
use crate::rules::rule_model::{Rule, RuleDefinition, RuleId, RuleOptions};

/// Factory for every rule id. Adding a `RuleId` variant without an arm here
/// is a compile error.
pub fn definition(id: RuleId) -> RuleDefinition {
    match id {
        RuleId::NameNotNull => name::name_not_null(),
        RuleId::NameNotEmpty => name::name_not_empty(),
        RuleId::NameNotWhiteSpace => name::name_not_white_space(),
        RuleId::NameReasonableLength => name::name_reasonable_length(),
        RuleId::NameExcludesControlType => name::name_excludes_control_type(),
        RuleId::NameExcludesLocalizedControlType => name::name_excludes_localized_control_type(),
        RuleId::NameExcludesPrivateUnicodeCharacters => name::name_excludes_private_unicode_characters(),
        RuleId::NameEmptyButElementNotKeyboardFocusable => {
            name::name_empty_but_element_not_keyboard_focusable()
        }
        RuleId::LocalizedControlTypeNotNull => localized_control_type::localized_control_type_not_null(),
        RuleId::LocalizedControlTypeNotEmpty => localized_control_type::localized_control_type_not_empty(),
        RuleId::LocalizedControlTypeNotWhiteSpace => {
            localized_control_type::localized_control_type_not_white_space()
        }
        RuleId::IsControlElementPropertyExists => element_flags::is_control_element_property_exists(),
        RuleId::IsControlElementTrueRequired => element_flags::is_control_element_true_required(),
        RuleId::IsContentElementPropertyExists => element_flags::is_content_element_property_exists(),
        RuleId::IsKeyboardFocusableShouldBeTrue => keyboard::is_keyboard_focusable_should_be_true(),
        RuleId::IsKeyboardFocusableFalseButDisabled => keyboard::is_keyboard_focusable_false_but_disabled(),
        RuleId::ListItemSiblingsUnique => structure::list_item_siblings_unique(),
        RuleId::SiblingUniqueAndFocusable => structure::sibling_unique_and_focusable(),
        RuleId::HyperlinkNameShouldBeUnique => structure::hyperlink_name_should_be_unique(),
        RuleId::ParentChildShouldNotHaveSameNameAndLocalizedControlType => {
            structure::parent_child_should_not_have_same_name_and_localized_control_type()
        }
        RuleId::HeadingLevelDescendsWhenNested => structure::heading_level_descends_when_nested(),
        RuleId::BoundingRectangleNotNull => bounding_rectangle::bounding_rectangle_not_null(),
        RuleId::BoundingRectangleCompletelyObscuresContainer => {
            bounding_rectangle::bounding_rectangle_completely_obscures_container()
        }
        RuleId::ControlShouldSupportTextPattern => patterns::control_should_support_text_pattern(),
        RuleId::ProgressBarRangeValue => patterns::progress_bar_range_value(),
        RuleId::FrameworkDoesNotSupportUIAutomation => {
            embedded_content::framework_does_not_support_ui_automation()
        }
        RuleId::ChromiumComponentsShouldUseWebScanner => {
            embedded_content::chromium_components_should_use_web_scanner()
        }
    }
}

/// Lazily constructed rule singletons, one slot per rule id.
///
/// Each slot is built at most once even when several scan threads ask for the
/// same rule at the same time.
pub struct RuleProvider {
    slots: Vec<OnceLock<Rule>>,
    options: RuleOptions,
}

impl RuleProvider {
    pub fn new(options: RuleOptions) -> Self {
        Self {
            slots: RuleId::ALL.iter().map(|_| OnceLock::new()).collect(),
            options,
        }
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        self.slots[id.slot()].get_or_init(|| Rule::new(definition(id), &self.options))
    }

    /// Resolves a raw rule id. Unknown ids yield `None`.
    pub fn get_rule(&self, raw: u32) -> Option<&Rule> {
        RuleId::try_from(raw).ok().map(|id| self.rule(id))
    }

    /// Every rule, in id order.
    pub fn all(&self) -> impl Iterator<Item = &Rule> {
        RuleId::ALL.iter().map(move |id| self.rule(*id))
    }
}

impl Default for RuleProvider {
    fn default() -> Self {
        Self::new(RuleOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_definition_carries_its_own_id() {
        for id in RuleId::ALL {
            assert_eq!(definition(id).id, id);
        }
    }

    #[test]
    fn rules_are_built_once() {
        let provider = RuleProvider::default();
        let first = provider.rule(RuleId::NameNotNull) as *const Rule;
        let second = provider.rule(RuleId::NameNotNull) as *const Rule;
        assert_eq!(first, second);
    }

    #[test]
    fn only_the_web_scanner_rule_is_exclusionary() {
        let provider = RuleProvider::default();
        let exclusionary: Vec<RuleId> =
            provider.all().filter(|r| r.info().exclusionary).map(Rule::id).collect();
        assert_eq!(exclusionary, vec![RuleId::ChromiumComponentsShouldUseWebScanner]);
    }

    #[test]
    fn unknown_raw_id_has_no_rule() {
        let provider = RuleProvider::default();
        assert!(provider.get_rule(0).is_none());
        assert!(provider.get_rule(12).is_some());
    }
}
