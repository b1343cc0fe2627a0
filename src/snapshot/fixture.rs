use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::element::control_type::control_type_from_name;
use crate::element::ids::property;
use crate::element::{ElementData, PatternData, PropertyValue, Rect};
use crate::error::{ProviderError, ScanError};
use crate::snapshot::provider::ElementProvider;

/// One node of a JSON tree fixture.
///
/// ```json
/// { "control_type": "Window", "name": "Main", "children": [
///     { "control_type": "Button", "name": "OK", "automation_id": "ok" }
/// ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureNode {
    pub control_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub localized_control_type: Option<String>,
    #[serde(default)]
    pub framework_id: Option<String>,
    #[serde(default)]
    pub automation_id: Option<String>,
    #[serde(default)]
    pub runtime_id: Option<String>,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub is_control_element: Option<bool>,
    #[serde(default)]
    pub is_content_element: Option<bool>,
    #[serde(default)]
    pub is_keyboard_focusable: Option<bool>,
    /// Extra properties by numeric UI Automation property id.
    #[serde(default)]
    pub properties: BTreeMap<i32, PropertyValue>,
    #[serde(default)]
    pub patterns: Vec<PatternData>,
    /// Number of full property reads that fail before one succeeds.
    #[serde(default)]
    pub populate_failures: u32,
    #[serde(default)]
    pub children: Vec<FixtureNode>,
}

impl FixtureNode {
    pub fn new(control_type: &str) -> Self {
        Self { control_type: control_type.to_string(), ..Self::default() }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_automation_id(mut self, automation_id: &str) -> Self {
        self.automation_id = Some(automation_id.to_string());
        self
    }

    pub fn with_child(mut self, child: FixtureNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_populate_failures(mut self, failures: u32) -> Self {
        self.populate_failures = failures;
        self
    }
}

/// Handle into a [`MemoryProvider`]. Not `Clone`: every handle is acquired
/// from the provider and must go back through `release`.
#[derive(Debug, PartialEq, Eq)]
pub struct FixtureHandle(usize);

impl FixtureHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

struct FixtureEntry {
    data: ElementData,
    parent: Option<usize>,
    children: Vec<usize>,
    failures_left: AtomicU32,
}

/// In-memory [`ElementProvider`] over a fixture tree.
///
/// Counts every handle it gives out and takes back, per node, so callers can
/// check that each one was released exactly once.
pub struct MemoryProvider {
    entries: Vec<FixtureEntry>,
    acquired: Vec<AtomicUsize>,
    released: Vec<AtomicUsize>,
    self_referencing_root: bool,
    concurrent_release: bool,
    unavailable: AtomicBool,
}

impl MemoryProvider {
    pub fn from_root(root: FixtureNode) -> Result<Self, ScanError> {
        let mut entries = Vec::new();
        flatten(root, None, &mut entries)?;
        let count = entries.len();
        Ok(Self {
            entries,
            acquired: (0..count).map(|_| AtomicUsize::new(0)).collect(),
            released: (0..count).map(|_| AtomicUsize::new(0)).collect(),
            self_referencing_root: false,
            concurrent_release: true,
            unavailable: AtomicBool::new(false),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        Self::from_root(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Make the root report itself as its own parent.
    pub fn with_self_referencing_root(mut self) -> Self {
        self.self_referencing_root = true;
        self
    }

    pub fn with_sequential_release(mut self) -> Self {
        self.concurrent_release = false;
        self
    }

    /// Every later call fails with a fatal error.
    pub fn make_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn root(&self) -> FixtureHandle {
        self.acquire(0)
    }

    pub fn find_by_automation_id(&self, automation_id: &str) -> Option<FixtureHandle> {
        self.find(|data| data.automation_id() == Some(automation_id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<FixtureHandle> {
        self.find(|data| data.name.as_deref() == Some(name))
    }

    pub fn acquired(&self, index: usize) -> usize {
        self.acquired[index].load(Ordering::SeqCst)
    }

    pub fn released(&self, index: usize) -> usize {
        self.released[index].load(Ordering::SeqCst)
    }

    /// Handles given out and not yet returned, over all nodes.
    pub fn live_handles(&self) -> usize {
        (0..self.len()).map(|i| self.acquired(i) - self.released(i).min(self.acquired(i))).sum()
    }

    /// True when no node was released more often than it was acquired.
    pub fn no_double_release(&self) -> bool {
        (0..self.len()).all(|i| self.released(i) <= self.acquired(i))
    }

    fn find<F: Fn(&ElementData) -> bool>(&self, predicate: F) -> Option<FixtureHandle> {
        let index = self.entries.iter().position(|entry| predicate(&entry.data))?;
        Some(self.acquire(index))
    }

    fn acquire(&self, index: usize) -> FixtureHandle {
        self.acquired[index].fetch_add(1, Ordering::SeqCst);
        FixtureHandle(index)
    }

    fn check_available(&self) -> Result<(), ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("fixture provider is unavailable"));
        }
        Ok(())
    }
}

impl ElementProvider for MemoryProvider {
    type Handle = FixtureHandle;

    fn parent(&self, node: &FixtureHandle) -> Result<Option<FixtureHandle>, ProviderError> {
        self.check_available()?;
        match self.entries[node.0].parent {
            Some(parent) => Ok(Some(self.acquire(parent))),
            None if self.self_referencing_root => Ok(Some(self.acquire(node.0))),
            None => Ok(None),
        }
    }

    fn first_child(&self, node: &FixtureHandle) -> Result<Option<FixtureHandle>, ProviderError> {
        self.check_available()?;
        Ok(self.entries[node.0].children.first().map(|&c| self.acquire(c)))
    }

    fn next_sibling(&self, node: &FixtureHandle) -> Result<Option<FixtureHandle>, ProviderError> {
        self.check_available()?;
        let Some(parent) = self.entries[node.0].parent else {
            return Ok(None);
        };
        let siblings = &self.entries[parent].children;
        let next = siblings.iter().position(|&s| s == node.0).and_then(|p| siblings.get(p + 1));
        Ok(next.map(|&s| self.acquire(s)))
    }

    fn populate_properties(&self, node: &FixtureHandle, data: &mut ElementData) -> Result<(), ProviderError> {
        self.check_available()?;
        let source = &self.entries[node.0].data;
        data.runtime_id = source.runtime_id.clone();
        data.control_type_id = source.control_type_id;
        data.name = source.name.clone();
        data.class_name = source.class_name.clone();
        data.bounding_rectangle = source.bounding_rectangle;
        Ok(())
    }

    fn populate_all_properties_with_live_data(
        &self,
        node: &FixtureHandle,
        data: &mut ElementData,
    ) -> Result<(), ProviderError> {
        self.check_available()?;
        let entry = &self.entries[node.0];
        let failing = entry
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ProviderError::failed(format!("transient failure reading node {}", node.0)));
        }

        let unique_id = data.unique_id;
        *data = entry.data.clone();
        data.unique_id = unique_id;
        Ok(())
    }

    fn release(&self, node: FixtureHandle) {
        self.released[node.0].fetch_add(1, Ordering::SeqCst);
    }

    fn supports_concurrent_release(&self) -> bool {
        self.concurrent_release
    }
}

fn flatten(node: FixtureNode, parent: Option<usize>, entries: &mut Vec<FixtureEntry>) -> Result<usize, ScanError> {
    let control_type_id = control_type_from_name(&node.control_type)
        .ok_or_else(|| ScanError::Config(format!("unknown control type '{}'", node.control_type)))?;
    let index = entries.len();

    let mut properties = node.properties;
    if let Some(automation_id) = node.automation_id {
        properties.insert(property::AUTOMATION_ID, PropertyValue::Text(automation_id));
    }

    let data = ElementData {
        unique_id: 0,
        runtime_id: Some(node.runtime_id.unwrap_or_else(|| format!("42.{}", index))),
        control_type_id,
        name: node.name,
        class_name: node.class_name,
        localized_control_type: node.localized_control_type,
        framework_id: node.framework_id,
        bounding_rectangle: node.rect,
        is_control_element: node.is_control_element,
        is_content_element: node.is_content_element,
        is_keyboard_focusable: node.is_keyboard_focusable,
        properties: Some(properties),
        patterns: node.patterns,
    };
    entries.push(FixtureEntry {
        data,
        parent,
        children: Vec::new(),
        failures_left: AtomicU32::new(node.populate_failures),
    });

    for child in node.children {
        let child_index = flatten(child, Some(index), entries)?;
        entries[index].children.push(child_index);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryProvider {
        let root = FixtureNode::new("Window")
            .with_name("root")
            .with_child(FixtureNode::new("Button").with_name("a"))
            .with_child(FixtureNode::new("Button").with_name("b"));
        MemoryProvider::from_root(root).unwrap()
    }

    #[test]
    fn navigation_follows_fixture_order() {
        let provider = sample();
        let root = provider.root();
        let a = provider.first_child(&root).unwrap().unwrap();
        let b = provider.next_sibling(&a).unwrap().unwrap();
        assert_eq!(b.index(), 2);
        assert!(provider.next_sibling(&b).unwrap().is_none());
        assert!(provider.parent(&root).unwrap().is_none());
        for h in [root, a, b] {
            provider.release(h);
        }
        assert_eq!(provider.live_handles(), 0);
    }

    #[test]
    fn unknown_control_type_is_rejected() {
        let err = MemoryProvider::from_json(r#"{ "control_type": "Gizmo" }"#).err().unwrap();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn populate_failures_run_out() {
        let provider = MemoryProvider::from_root(FixtureNode::new("Pane").with_populate_failures(1)).unwrap();
        let root = provider.root();
        let mut data = ElementData::default();
        assert!(provider.populate_all_properties_with_live_data(&root, &mut data).is_err());
        assert!(provider.populate_all_properties_with_live_data(&root, &mut data).is_ok());
        assert!(data.has_full_properties());
        provider.release(root);
    }
}
