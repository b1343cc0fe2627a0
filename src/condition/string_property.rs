use regex::RegexBuilder;

use crate::condition::condition::Condition;
use crate::condition::value::ValueCondition;
use crate::element::ElementData;
use crate::error::{EvaluationError, ScanError};

type Getter = fn(&ElementData) -> Option<&str>;

/// A string attribute of an element, with the conditions commonly asked of it.
///
/// Null (attribute absent) and empty (present, zero length) are distinct
/// states. The combined forms are unions of the two basic checks.
#[derive(Clone, Copy)]
pub struct StringProperty {
    label: &'static str,
    getter: Getter,
}

fn name_of(e: &ElementData) -> Option<&str> {
    e.name.as_deref()
}

fn class_name_of(e: &ElementData) -> Option<&str> {
    e.class_name.as_deref()
}

fn localized_control_type_of(e: &ElementData) -> Option<&str> {
    e.localized_control_type.as_deref()
}

fn framework_id_of(e: &ElementData) -> Option<&str> {
    e.framework_id.as_deref()
}

fn automation_id_of(e: &ElementData) -> Option<&str> {
    e.automation_id()
}

fn help_text_of(e: &ElementData) -> Option<&str> {
    e.help_text()
}

fn localized_landmark_type_of(e: &ElementData) -> Option<&str> {
    e.localized_landmark_type()
}

pub const NAME: StringProperty = StringProperty { label: "Name", getter: name_of };
pub const CLASS_NAME: StringProperty = StringProperty { label: "ClassName", getter: class_name_of };
pub const LOCALIZED_CONTROL_TYPE: StringProperty =
    StringProperty { label: "LocalizedControlType", getter: localized_control_type_of };
pub const FRAMEWORK_ID: StringProperty = StringProperty { label: "FrameworkId", getter: framework_id_of };
pub const AUTOMATION_ID: StringProperty = StringProperty { label: "AutomationId", getter: automation_id_of };
pub const HELP_TEXT: StringProperty = StringProperty { label: "HelpText", getter: help_text_of };
pub const LOCALIZED_LANDMARK_TYPE: StringProperty =
    StringProperty { label: "LocalizedLandmarkType", getter: localized_landmark_type_of };

/// Private use area of the basic multilingual plane.
pub fn is_private_unicode_char(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

impl StringProperty {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn get<'e>(&self, e: &'e ElementData) -> Option<&'e str> {
        (self.getter)(e)
    }

    fn condition<F>(&self, suffix: &str, f: F) -> Condition
    where
        F: Fn(Option<&str>) -> bool + Send + Sync + 'static,
    {
        let getter = self.getter;
        Condition::from_fn(move |e| f(getter(e.data()))).described(&format!("{}.{}", self.label, suffix))
    }

    pub fn null(&self) -> Condition {
        self.condition("Null", |v| v.is_none())
    }

    pub fn not_null(&self) -> Condition {
        (!self.null()).described(&format!("{}.NotNull", self.label))
    }

    /// Present and zero length. An absent value is not empty.
    pub fn empty(&self) -> Condition {
        self.condition("Empty", |v| v.is_some_and(str::is_empty))
    }

    pub fn not_empty(&self) -> Condition {
        (!self.empty()).described(&format!("{}.NotEmpty", self.label))
    }

    pub fn null_or_empty(&self) -> Condition {
        (self.null() | self.empty()).described(&format!("{}.NullOrEmpty", self.label))
    }

    pub fn not_null_or_empty(&self) -> Condition {
        (self.not_null() & self.not_empty()).described(&format!("{}.NotNullOrEmpty", self.label))
    }

    /// Present and nothing but whitespace (the empty string included).
    pub fn white_space(&self) -> Condition {
        self.condition("WhiteSpace", |v| v.is_some_and(|s| s.trim().is_empty()))
    }

    pub fn not_white_space(&self) -> Condition {
        (!self.white_space()).described(&format!("{}.NotWhiteSpace", self.label))
    }

    pub fn null_or_white_space(&self) -> Condition {
        (self.null_or_empty() | self.white_space()).described(&format!("{}.NullOrWhiteSpace", self.label))
    }

    pub fn not_null_or_white_space(&self) -> Condition {
        (!self.null_or_white_space()).described(&format!("{}.NotNullOrWhiteSpace", self.label))
    }

    /// Errors on a null or blank value; pair it with `not_null_or_white_space`.
    pub fn includes_private_unicode_characters(&self) -> Condition {
        let getter = self.getter;
        let label = self.label;
        Condition::create(move |e| match getter(e.data()) {
            Some(s) if !s.trim().is_empty() => Ok(s.chars().any(is_private_unicode_char)),
            _ => Err(EvaluationError::missing_property(e.unique_id, label)),
        })
        .described(&format!("{}.IncludesPrivateUnicodeCharacters", self.label))
    }

    pub fn excludes_private_unicode_characters(&self) -> Condition {
        (!self.includes_private_unicode_characters())
            .described(&format!("{}.ExcludesPrivateUnicodeCharacters", self.label))
    }

    /// Character count; 0 when absent.
    pub fn length(&self) -> ValueCondition {
        let getter = self.getter;
        ValueCondition::new(&format!("{}.Length", self.label), move |e| {
            getter(e.data()).map_or(0, |s| s.chars().count() as i32)
        })
    }

    pub fn is(&self, expected: &str) -> Condition {
        let expected = expected.to_string();
        self.condition(&format!("Is({})", expected), move |v| v == Some(expected.as_str()))
    }

    pub fn is_no_case(&self, expected: &str) -> Condition {
        let expected = expected.to_lowercase();
        self.condition(&format!("IsNoCase({})", expected), move |v| {
            v.is_some_and(|s| s.to_lowercase() == expected)
        })
    }

    /// Case-insensitive comparison of two properties on the same element.
    /// Blank values never compare equal.
    pub fn is_equal_to(&self, other: StringProperty) -> Condition {
        let a = self.getter;
        let b = other.getter;
        Condition::from_fn(move |e| match (a(e.data()), b(e.data())) {
            (Some(x), Some(y)) if !x.trim().is_empty() && !y.trim().is_empty() => {
                x.to_lowercase() == y.to_lowercase()
            }
            _ => false,
        })
        .described(&format!("{}.IsEqualTo({})", self.label, other.label))
    }

    pub fn is_not_equal_to(&self, other: StringProperty) -> Condition {
        !self.is_equal_to(other)
    }

    /// The pattern is compiled here, so an invalid one fails immediately
    /// instead of on every evaluation. Absent values never match.
    pub fn matches_regex(&self, pattern: &str) -> Result<Condition, ScanError> {
        self.build_regex(pattern, false)
    }

    pub fn matches_regex_no_case(&self, pattern: &str) -> Result<Condition, ScanError> {
        self.build_regex(pattern, true)
    }

    fn build_regex(&self, pattern: &str, case_insensitive: bool) -> Result<Condition, ScanError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| ScanError::parameter("pattern", e.to_string()))?;
        Ok(self.condition(&format!("MatchesRegex({})", pattern), move |v| {
            v.is_some_and(|s| regex.is_match(s))
        }))
    }
}
