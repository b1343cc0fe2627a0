use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::condition::properties::is_chromium_content;
use crate::element::Element;
use crate::error::EvaluationError;

// ============================================================================
// Rule ids
// ============================================================================

/// Stable rule identifiers. Discriminants are persisted in reports and
/// fingerprint histories, so existing values never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum RuleId {
    NameNotNull = 1,
    NameNotEmpty = 2,
    NameNotWhiteSpace = 3,
    NameReasonableLength = 4,
    NameExcludesControlType = 5,
    NameExcludesLocalizedControlType = 6,
    NameExcludesPrivateUnicodeCharacters = 7,
    NameEmptyButElementNotKeyboardFocusable = 8,
    LocalizedControlTypeNotNull = 9,
    LocalizedControlTypeNotEmpty = 10,
    LocalizedControlTypeNotWhiteSpace = 11,
    IsControlElementPropertyExists = 12,
    IsControlElementTrueRequired = 13,
    IsContentElementPropertyExists = 14,
    IsKeyboardFocusableShouldBeTrue = 15,
    IsKeyboardFocusableFalseButDisabled = 16,
    ListItemSiblingsUnique = 17,
    SiblingUniqueAndFocusable = 18,
    HyperlinkNameShouldBeUnique = 19,
    ParentChildShouldNotHaveSameNameAndLocalizedControlType = 20,
    HeadingLevelDescendsWhenNested = 21,
    BoundingRectangleNotNull = 22,
    BoundingRectangleCompletelyObscuresContainer = 23,
    ControlShouldSupportTextPattern = 24,
    ProgressBarRangeValue = 25,
    FrameworkDoesNotSupportUIAutomation = 26,
    ChromiumComponentsShouldUseWebScanner = 27,
}

impl RuleId {
    pub const ALL: [RuleId; 27] = [
        RuleId::NameNotNull,
        RuleId::NameNotEmpty,
        RuleId::NameNotWhiteSpace,
        RuleId::NameReasonableLength,
        RuleId::NameExcludesControlType,
        RuleId::NameExcludesLocalizedControlType,
        RuleId::NameExcludesPrivateUnicodeCharacters,
        RuleId::NameEmptyButElementNotKeyboardFocusable,
        RuleId::LocalizedControlTypeNotNull,
        RuleId::LocalizedControlTypeNotEmpty,
        RuleId::LocalizedControlTypeNotWhiteSpace,
        RuleId::IsControlElementPropertyExists,
        RuleId::IsControlElementTrueRequired,
        RuleId::IsContentElementPropertyExists,
        RuleId::IsKeyboardFocusableShouldBeTrue,
        RuleId::IsKeyboardFocusableFalseButDisabled,
        RuleId::ListItemSiblingsUnique,
        RuleId::SiblingUniqueAndFocusable,
        RuleId::HyperlinkNameShouldBeUnique,
        RuleId::ParentChildShouldNotHaveSameNameAndLocalizedControlType,
        RuleId::HeadingLevelDescendsWhenNested,
        RuleId::BoundingRectangleNotNull,
        RuleId::BoundingRectangleCompletelyObscuresContainer,
        RuleId::ControlShouldSupportTextPattern,
        RuleId::ProgressBarRangeValue,
        RuleId::FrameworkDoesNotSupportUIAutomation,
        RuleId::ChromiumComponentsShouldUseWebScanner,
    ];

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Slot of this id in [`RuleId::ALL`].
    pub(crate) fn slot(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u32> for RuleId {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, u32> {
        RuleId::ALL.iter().copied().find(|id| id.as_u32() == raw).ok_or(raw)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// Outcomes and metadata
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationCode {
    NotApplicable,
    Pass,
    Note,
    Open,
    Warning,
    NeedsReview,
    Error,
    RuleExecutionError,
}

impl EvaluationCode {
    pub fn is_failure(self) -> bool {
        matches!(self, EvaluationCode::Error)
    }
}

/// Accessibility standard a rule enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum A11yCriteria {
    InfoAndRelationships,
    Keyboard,
    NameRoleValue,
    ObjectInformation,
    AvailableActions,
}

impl A11yCriteria {
    pub fn section(self) -> &'static str {
        match self {
            A11yCriteria::InfoAndRelationships => "WCAG 1.3.1",
            A11yCriteria::Keyboard => "WCAG 2.1.1",
            A11yCriteria::NameRoleValue => "WCAG 4.1.2",
            A11yCriteria::ObjectInformation => "Section 508 502.3.1",
            A11yCriteria::AvailableActions => "Section 508 502.3.10",
        }
    }
}

/// Immutable description of a rule, as reported to users.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub id: RuleId,
    pub description: String,
    pub how_to_fix: String,
    pub standard: A11yCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<i32>,
    pub error_code: EvaluationCode,
    pub exclusionary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_issue_link: Option<String>,
    /// Rendered applicability condition.
    pub condition: String,
}

/// Per-(rule, element) outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// `None` when the requested rule id is unknown.
    pub rule_id: Option<RuleId>,
    pub element_id: i32,
    pub evaluation_code: EvaluationCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RunResult {
    pub fn new(rule_id: Option<RuleId>, element_id: i32, evaluation_code: EvaluationCode) -> Self {
        Self { rule_id, element_id, evaluation_code, error_message: None }
    }

    pub fn execution_error(rule_id: Option<RuleId>, element_id: i32, message: String) -> Self {
        Self {
            rule_id,
            element_id,
            evaluation_code: EvaluationCode::RuleExecutionError,
            error_message: Some(message),
        }
    }
}

// ============================================================================
// Rule definitions
// ============================================================================

pub type TestFn = fn(Element<'_>) -> Result<bool, EvaluationError>;

/// Global switches applied when rules are constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOptions {
    /// Evaluate elements inside embedded Chromium content too.
    #[serde(default)]
    pub include_embedded_web_content: bool,
}

/// What a library module declares for one rule.
pub struct RuleDefinition {
    pub id: RuleId,
    pub description: &'static str,
    pub how_to_fix: &'static str,
    pub standard: A11yCriteria,
    pub property_id: Option<i32>,
    pub error_code: EvaluationCode,
    pub exclusionary: bool,
    pub framework_issue_link: Option<&'static str>,
    pub condition: Condition,
    pub test: TestFn,
}

impl RuleDefinition {
    pub fn new(id: RuleId, condition: Condition, test: TestFn) -> Self {
        Self {
            id,
            description: "",
            how_to_fix: "",
            standard: A11yCriteria::ObjectInformation,
            property_id: None,
            error_code: EvaluationCode::Error,
            exclusionary: false,
            framework_issue_link: None,
            condition,
            test,
        }
    }

    pub fn with_text(mut self, description: &'static str, how_to_fix: &'static str) -> Self {
        self.description = description;
        self.how_to_fix = how_to_fix;
        self
    }

    pub fn with_standard(mut self, standard: A11yCriteria) -> Self {
        self.standard = standard;
        self
    }

    pub fn with_property(mut self, property_id: i32) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn with_error_code(mut self, code: EvaluationCode) -> Self {
        self.error_code = code;
        self
    }

    pub fn with_framework_issue_link(mut self, link: &'static str) -> Self {
        self.framework_issue_link = Some(link);
        self
    }

    pub fn exclusionary(mut self) -> Self {
        self.exclusionary = true;
        self
    }
}

/// A constructed rule: metadata, applicability condition and test.
pub struct Rule {
    info: RuleInfo,
    condition: Condition,
    test: TestFn,
}

impl Rule {
    /// Embedded web content is subtracted from every non-exclusionary rule
    /// here, once, unless `options` asks to include it. Including it also
    /// switches the exclusionary rules off, so nothing keeps that content
    /// away from the inclusion rules.
    pub fn new(definition: RuleDefinition, options: &RuleOptions) -> Self {
        let condition = match (definition.exclusionary, options.include_embedded_web_content) {
            (true, true) => Condition::never().described("Never (embedded web content included)"),
            (false, false) => definition.condition & !is_chromium_content(),
            _ => definition.condition,
        };

        let info = RuleInfo {
            id: definition.id,
            description: definition.description.to_string(),
            how_to_fix: definition.how_to_fix.to_string(),
            standard: definition.standard,
            property_id: definition.property_id,
            error_code: definition.error_code,
            exclusionary: definition.exclusionary,
            framework_issue_link: definition.framework_issue_link.map(str::to_string),
            condition: condition.to_string(),
        };

        Self { info, condition, test: definition.test }
    }

    pub fn id(&self) -> RuleId {
        self.info.id
    }

    pub fn info(&self) -> &RuleInfo {
        &self.info
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn passes_test(&self, e: Element<'_>) -> Result<bool, EvaluationError> {
        (self.test)(e)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.info.id).field("condition", &self.info.condition).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_id_round_trips_through_raw_value() {
        for id in RuleId::ALL {
            assert_eq!(RuleId::try_from(id.as_u32()), Ok(id));
        }
        assert_eq!(RuleId::try_from(0), Err(0));
        assert_eq!(RuleId::try_from(9999), Err(9999));
    }

    #[test]
    fn slots_are_dense() {
        for (i, id) in RuleId::ALL.iter().enumerate() {
            assert_eq!(id.slot(), i);
        }
    }

    #[test]
    fn display_is_variant_name() {
        assert_eq!(RuleId::NameNotEmpty.to_string(), "NameNotEmpty");
    }
}
