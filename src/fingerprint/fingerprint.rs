use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::element::control_type::display_name;
use crate::element::Element;
use crate::rules::{EvaluationCode, RuleId};

// ============================================================================
// Scan status
// ============================================================================

/// Outcome of a rule on an element, as far as deduplication cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    Pass,
    Uncertain,
    Fail,
    ScanNotSupported,
    NoResult,
}

impl ScanStatus {
    /// Severity label recorded in the fingerprint.
    pub fn level(self) -> &'static str {
        match self {
            ScanStatus::Fail => "error",
            ScanStatus::Pass => "pass",
            ScanStatus::ScanNotSupported => "note",
            ScanStatus::Uncertain | ScanStatus::NoResult => "open",
        }
    }
}

impl From<EvaluationCode> for ScanStatus {
    fn from(code: EvaluationCode) -> Self {
        match code {
            EvaluationCode::RuleExecutionError => ScanStatus::ScanNotSupported,
            EvaluationCode::Error => ScanStatus::Fail,
            EvaluationCode::Warning | EvaluationCode::NeedsReview | EvaluationCode::Open | EvaluationCode::Note => {
                ScanStatus::Uncertain
            }
            EvaluationCode::NotApplicable | EvaluationCode::Pass => ScanStatus::Pass,
        }
    }
}

// ============================================================================
// Contributions
// ============================================================================

/// One `key = value` pair of a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FingerprintContribution {
    pub key: String,
    pub value: String,
}

impl FingerprintContribution {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Hash of the key XOR hash of the value. Stable across processes.
    pub fn stable_hash(&self) -> u64 {
        stable_hash(&self.key) ^ stable_hash(&self.value)
    }
}

fn stable_hash(text: &str) -> u64 {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

// ============================================================================
// Fingerprint
// ============================================================================

/// Value identity of a (rule, outcome, element and ancestry) result.
///
/// The hash is the XOR of the contribution hashes, so it ignores contribution
/// order and different fingerprints can share it. Equality always compares
/// the contributions themselves. [`Fingerprint::compare_to`] orders by
/// contribution count and then hash only; `Ord` breaks its ties on the
/// contributions so sorted containers agree with `Eq`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "Vec<FingerprintContribution>", into = "Vec<FingerprintContribution>")]
pub struct Fingerprint {
    /// Sorted by key; keys are unique.
    contributions: Vec<FingerprintContribution>,
    hash: u64,
}

impl Fingerprint {
    pub fn new(e: Element<'_>, rule_id: RuleId, status: ScanStatus) -> Self {
        let mut map = BTreeMap::new();
        map.insert("RuleId".to_string(), rule_id.to_string());
        map.insert("Level".to_string(), status.level().to_string());

        let flag = |value: Option<bool>| if value == Some(true) { "True" } else { "False" };
        match rule_id {
            RuleId::IsControlElementPropertyExists | RuleId::IsControlElementTrueRequired => {
                map.insert("IsControlElement".to_string(), flag(e.is_control_element).to_string());
            }
            RuleId::IsContentElementPropertyExists => {
                map.insert("IsContentElement".to_string(), flag(e.is_content_element).to_string());
            }
            RuleId::IsKeyboardFocusableShouldBeTrue | RuleId::IsKeyboardFocusableFalseButDisabled => {
                map.insert("IsKeyboardFocusable".to_string(), flag(e.is_keyboard_focusable).to_string());
            }
            _ => {}
        }

        add_ancestry(&mut map, e);
        Self::from_contributions(map.into_iter().map(|(key, value)| FingerprintContribution { key, value }))
    }

    pub fn from_contributions<I: IntoIterator<Item = FingerprintContribution>>(contributions: I) -> Self {
        let mut contributions: Vec<FingerprintContribution> = contributions.into_iter().collect();
        contributions.sort();
        contributions.dedup_by(|a, b| a.key == b.key);
        let hash = contributions.iter().fold(0, |acc, c| acc ^ c.stable_hash());
        Self { contributions, hash }
    }

    /// Contributions in key order.
    pub fn contributions(&self) -> &[FingerprintContribution] {
        &self.contributions
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.contributions
            .binary_search_by(|c| c.key.as_str().cmp(key))
            .ok()
            .map(|i| self.contributions[i].value.as_str())
    }

    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Count, then hash. `Equal` does not mean the fingerprints are equal.
    pub fn compare_to(&self, other: &Fingerprint) -> Ordering {
        self.contributions
            .len()
            .cmp(&other.contributions.len())
            .then(self.hash.cmp(&other.hash))
    }
}

/// One level per element from `e` upward. Level 0 uses bare keys, level N
/// uses `AncestorN.` keys. The tree root is left out, as is the name of the
/// ancestor directly below it; the walk also ends at a level that adds
/// nothing.
fn add_ancestry(map: &mut BTreeMap<String, String>, e: Element<'_>) {
    let mut current = Some(e);
    let mut level = 0;

    while let Some(node) = current {
        let parent = node.parent();
        if level > 0 && parent.is_none() {
            break;
        }
        let prefix = if level == 0 { String::new() } else { format!("Ancestor{}.", level) };
        let below_root = level > 0 && parent.is_some_and(|p| p.parent().is_none());

        let control_type = (level == 0 || node.control_type_id != 0).then(|| display_name(node.control_type_id));
        let attributes: [(&str, Option<&str>); 9] = [
            ("Name", if below_root { None } else { node.name.as_deref() }),
            ("ClassName", node.class_name.as_deref()),
            ("ControlType", control_type.as_deref()),
            ("LocalizedControlType", node.localized_control_type.as_deref()),
            ("FrameworkId", node.framework_id.as_deref()),
            ("AcceleratorKey", node.accelerator_key()),
            ("AccessKey", node.access_key()),
            ("AutomationId", node.automation_id()),
            ("Culture", node.culture()),
        ];

        let mut added = 0;
        for (key, value) in attributes {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                map.insert(format!("{}{}", prefix, key), value.to_string());
                added += 1;
            }
        }
        if added == 0 {
            break;
        }

        current = parent;
        level += 1;
    }
}

impl From<Vec<FingerprintContribution>> for Fingerprint {
    fn from(contributions: Vec<FingerprintContribution>) -> Self {
        Self::from_contributions(contributions)
    }
}

impl From<Fingerprint> for Vec<FingerprintContribution> {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.contributions
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.contributions == other.contributions
    }
}

impl Eq for Fingerprint {}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialOrd for Fingerprint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fingerprint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other).then_with(|| self.contributions.cmp(&other.contributions))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("hash", &format_args!("{:016x}", self.hash))
            .field("contributions", &self.contributions)
            .finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_hash_is_stable() {
        let a = FingerprintContribution::new("Name", "OK");
        let b = FingerprintContribution::new("Name", "OK");
        assert_eq!(a.stable_hash(), b.stable_hash());
        assert_ne!(a.stable_hash(), FingerprintContribution::new("Name", "Cancel").stable_hash());
    }

    #[test]
    fn duplicate_keys_keep_one_entry() {
        let fp = Fingerprint::from_contributions(vec![
            FingerprintContribution::new("Name", "a"),
            FingerprintContribution::new("Name", "a"),
        ]);
        assert_eq!(fp.contributions().len(), 1);
    }

    #[test]
    fn status_levels() {
        assert_eq!(ScanStatus::from(EvaluationCode::Error).level(), "error");
        assert_eq!(ScanStatus::from(EvaluationCode::Pass).level(), "pass");
        assert_eq!(ScanStatus::from(EvaluationCode::RuleExecutionError).level(), "note");
        assert_eq!(ScanStatus::from(EvaluationCode::Warning).level(), "open");
        assert_eq!(ScanStatus::NoResult.level(), "open");
    }
}
