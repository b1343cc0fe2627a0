use regex::Regex;

use crate::condition::properties::{chrome, document, win32, window};
use crate::rules::rule_model::{RuleDefinition, RuleId};

/// Window classes of toolkits that expose nothing through UI Automation.
const KNOWN_PROBLEMATIC_CLASSES: [&str; 1] = [r"^\s*SunAwt.*$"];

pub fn framework_does_not_support_ui_automation() -> RuleDefinition {
    RuleDefinition::new(RuleId::FrameworkDoesNotSupportUIAutomation, win32() & window(), |e| {
        let class_name = e.class_name.as_deref().unwrap_or_default();
        for pattern in KNOWN_PROBLEMATIC_CLASSES {
            let regex = Regex::new(pattern)
                .map_err(|err| crate::error::EvaluationError::Regex {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                })?;
            if regex.is_match(class_name) {
                return Ok(false);
            }
        }
        Ok(true)
    })
    .with_text(
        "The window belongs to a UI framework that does not support UI Automation.",
        "Enable the framework's accessibility bridge, or scan with a tool built for that framework.",
    )
    .with_framework_issue_link("https://go.microsoft.com/fwlink/?linkid=2214160")
}

/// Reports the root of embedded Chromium content and keeps every other
/// rule off it; web content is better served by a web scanner.
pub fn chromium_components_should_use_web_scanner() -> RuleDefinition {
    RuleDefinition::new(RuleId::ChromiumComponentsShouldUseWebScanner, chrome() & document(), |_| Ok(false))
        .with_text(
            "Chromium content was found; its rules are not evaluated by this scanner.",
            "Scan the web content with a web accessibility scanner.",
        )
        .exclusionary()
}
