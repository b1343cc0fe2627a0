use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::Element;
use crate::error::ScanError;
use crate::fingerprint::fingerprint::{Fingerprint, ScanStatus};
use crate::rules::{RuleId, RunResult};

/// Failing results that share one fingerprint.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationGroup {
    pub fingerprint: Fingerprint,
    pub rule_id: RuleId,
    pub element_ids: Vec<i32>,
}

/// Group every `Fail` result by fingerprint, in fingerprint order.
pub fn group_failures<'a, I>(evaluated: I) -> Vec<ViolationGroup>
where
    I: IntoIterator<Item = (Element<'a>, &'a [RunResult])>,
{
    let mut groups: BTreeMap<Fingerprint, ViolationGroup> = BTreeMap::new();

    for (element, results) in evaluated {
        for result in results {
            let status = ScanStatus::from(result.evaluation_code);
            let Some(rule_id) = result.rule_id.filter(|_| status == ScanStatus::Fail) else {
                continue;
            };
            let fingerprint = Fingerprint::new(element, rule_id, status);
            groups
                .entry(fingerprint.clone())
                .or_insert_with(|| ViolationGroup { fingerprint, rule_id, element_ids: Vec::new() })
                .element_ids
                .push(element.unique_id);
        }
    }

    groups.into_values().collect()
}

// ============================================================================
// History across runs
// ============================================================================

#[derive(Debug, Default)]
pub struct FingerprintDiff {
    pub new: Vec<Fingerprint>,
    pub recurring: Vec<Fingerprint>,
    pub resolved: Vec<Fingerprint>,
}

/// Fingerprints seen by the previous run, persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationHistory {
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub fingerprints: BTreeSet<Fingerprint>,
}

impl ViolationHistory {
    /// A missing file is an empty history.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No violation history at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScanError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprints.contains(fingerprint)
    }

    /// Diff `current` against the stored run, then make `current` the stored run.
    pub fn record_run<I: IntoIterator<Item = Fingerprint>>(&mut self, current: I) -> FingerprintDiff {
        let before: HashSet<Fingerprint> = self.fingerprints.iter().cloned().collect();
        let after: HashSet<Fingerprint> = current.into_iter().collect();

        let mut diff = FingerprintDiff {
            new: after.difference(&before).cloned().collect(),
            recurring: after.intersection(&before).cloned().collect(),
            resolved: before.difference(&after).cloned().collect(),
        };
        diff.new.sort();
        diff.recurring.sort();
        diff.resolved.sort();

        self.fingerprints = after.into_iter().collect();
        self.runs += 1;
        diff
    }
}
