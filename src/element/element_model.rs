use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::element::control_type;
use crate::element::ids::{heading, property};

// ============================================================================
// Property values
// ============================================================================

/// Screen rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    pub fn contains(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

/// Typed value stored in the sparse property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Double(f64),
    Text(String),
    IntArray(Vec<i32>),
    Rect(Rect),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(d) => Some(*d),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            PropertyValue::Rect(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Double(d) => write!(f, "{}", d),
            PropertyValue::Text(s) => write!(f, "{}", s),
            PropertyValue::IntArray(v) => {
                let parts: Vec<String> = v.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", parts.join(","))
            }
            PropertyValue::Rect(r) => {
                write!(f, "[l={},t={},r={},b={}]", r.left, r.top, r.right(), r.bottom())
            }
        }
    }
}

/// A control pattern supported by an element, with its named properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternData {
    pub id: i32,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl PatternData {
    pub fn new(id: i32) -> Self {
        Self { id, properties: BTreeMap::new() }
    }

    pub fn with(mut self, name: &str, value: PropertyValue) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

// ============================================================================
// Element data
// ============================================================================

/// Attributes of one captured UI element.
///
/// The commonly used attributes are typed fields. Everything else sits in the
/// sparse `properties` bag, which stays `None` until full population succeeds.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Process-scoped id: 0 for the scan target, negative for ancestors,
    /// positive for descendants.
    pub unique_id: i32,
    pub runtime_id: Option<String>,
    pub control_type_id: i32,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub localized_control_type: Option<String>,
    pub framework_id: Option<String>,
    pub bounding_rectangle: Option<Rect>,
    pub is_control_element: Option<bool>,
    pub is_content_element: Option<bool>,
    pub is_keyboard_focusable: Option<bool>,
    pub properties: Option<BTreeMap<i32, PropertyValue>>,
    pub patterns: Vec<PatternData>,
}

impl ElementData {
    pub fn new(control_type_id: i32) -> Self {
        Self { control_type_id, ..Self::default() }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_class_name(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn with_localized_control_type(mut self, lct: &str) -> Self {
        self.localized_control_type = Some(lct.to_string());
        self
    }

    pub fn with_framework(mut self, framework_id: &str) -> Self {
        self.framework_id = Some(framework_id.to_string());
        self
    }

    pub fn with_runtime_id(mut self, runtime_id: &str) -> Self {
        self.runtime_id = Some(runtime_id.to_string());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.bounding_rectangle = Some(rect);
        self
    }

    pub fn with_keyboard_focusable(mut self, focusable: bool) -> Self {
        self.is_keyboard_focusable = Some(focusable);
        self
    }

    pub fn with_control_element(mut self, value: bool) -> Self {
        self.is_control_element = Some(value);
        self
    }

    pub fn with_content_element(mut self, value: bool) -> Self {
        self.is_content_element = Some(value);
        self
    }

    pub fn with_automation_id(self, automation_id: &str) -> Self {
        self.with_property(property::AUTOMATION_ID, PropertyValue::Text(automation_id.to_string()))
    }

    pub fn with_property(mut self, id: i32, value: PropertyValue) -> Self {
        self.set_property(id, value);
        self
    }

    pub fn with_pattern(mut self, pattern: PatternData) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn set_property(&mut self, id: i32, value: PropertyValue) {
        self.properties.get_or_insert_with(BTreeMap::new).insert(id, value);
    }

    pub fn property(&self, id: i32) -> Option<&PropertyValue> {
        self.properties.as_ref().and_then(|p| p.get(&id))
    }

    pub fn has_full_properties(&self) -> bool {
        self.properties.is_some()
    }

    fn text_property(&self, id: i32) -> Option<&str> {
        self.property(id).and_then(PropertyValue::as_text)
    }

    pub fn automation_id(&self) -> Option<&str> {
        self.text_property(property::AUTOMATION_ID)
    }

    pub fn accelerator_key(&self) -> Option<&str> {
        self.text_property(property::ACCELERATOR_KEY)
    }

    pub fn access_key(&self) -> Option<&str> {
        self.text_property(property::ACCESS_KEY)
    }

    pub fn culture(&self) -> Option<&str> {
        self.text_property(property::CULTURE)
    }

    pub fn help_text(&self) -> Option<&str> {
        self.text_property(property::HELP_TEXT)
    }

    pub fn localized_landmark_type(&self) -> Option<&str> {
        self.text_property(property::LOCALIZED_LANDMARK_TYPE)
    }

    /// Missing means enabled.
    pub fn is_enabled(&self) -> bool {
        self.property(property::IS_ENABLED)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(true)
    }

    pub fn is_offscreen(&self) -> bool {
        self.property(property::IS_OFFSCREEN)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }

    pub fn heading_level(&self) -> i32 {
        self.property(property::HEADING_LEVEL)
            .and_then(PropertyValue::as_int)
            .unwrap_or(heading::HEADING_LEVEL_NONE)
    }

    pub fn pattern(&self, id: i32) -> Option<&PatternData> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn is_framework(&self, framework_id: &str) -> bool {
        self.framework_id.as_deref() == Some(framework_id)
    }

    pub fn control_type_name(&self) -> String {
        control_type::display_name(self.control_type_id)
    }
}

// ============================================================================
// Element tree arena
// ============================================================================

pub type NodeIndex = usize;

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub data: ElementData,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

/// Arena owning every captured element of one scan.
///
/// Children are owned through index lists and parents are plain back
/// references, so `attach` is the only way a parent/child link is formed.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<ElementNode>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node.
    pub fn push(&mut self, data: ElementData) -> NodeIndex {
        self.nodes.push(ElementNode { data, parent: None, children: Vec::new() });
        self.nodes.len() - 1
    }

    /// Add `data` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, data: ElementData) -> NodeIndex {
        let index = self.push(data);
        self.attach(parent, index);
        index
    }

    /// Link an existing detached node under `parent`.
    pub fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let Some(old) = self.nodes[child].parent.take() {
            self.nodes[old].children.retain(|c| *c != child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn element(&self, index: NodeIndex) -> Element<'_> {
        Element { tree: self, index }
    }

    pub fn get(&self, index: NodeIndex) -> Option<Element<'_>> {
        (index < self.nodes.len()).then(|| self.element(index))
    }

    pub fn data_mut(&mut self, index: NodeIndex) -> &mut ElementData {
        &mut self.nodes[index].data
    }

    pub fn nodes_mut(&mut self) -> &mut [ElementNode] {
        &mut self.nodes
    }

    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> {
        (0..self.nodes.len()).map(move |i| self.element(i))
    }

    pub fn find_by_unique_id(&self, unique_id: i32) -> Option<Element<'_>> {
        self.elements().find(|e| e.unique_id == unique_id)
    }
}

// ============================================================================
// Element handle
// ============================================================================

/// Borrowed view of one node that can navigate the tree.
#[derive(Clone, Copy)]
pub struct Element<'a> {
    tree: &'a ElementTree,
    index: NodeIndex,
}

impl<'a> Element<'a> {
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn tree(&self) -> &'a ElementTree {
        self.tree
    }

    pub fn data(&self) -> &'a ElementData {
        &self.tree.nodes[self.index].data
    }

    pub fn parent(&self) -> Option<Element<'a>> {
        self.tree.nodes[self.index].parent.map(|p| self.tree.element(p))
    }

    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        let tree = self.tree;
        tree.nodes[self.index].children.iter().map(move |c| tree.element(*c))
    }

    pub fn child_count(&self) -> usize {
        self.tree.nodes[self.index].children.len()
    }

    pub fn first_child(&self) -> Option<Element<'a>> {
        self.children().next()
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        std::iter::successors(self.parent(), |e| e.parent())
    }

    /// Every node below this one, pre-order.
    pub fn descendants(&self) -> Vec<Element<'a>> {
        let mut out = Vec::new();
        let mut stack: Vec<Element<'a>> = self.children().collect();
        stack.reverse();
        while let Some(e) = stack.pop() {
            out.push(e);
            let mut kids: Vec<Element<'a>> = e.children().collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }
}

impl<'a> Deref for Element<'a> {
    type Target = ElementData;

    fn deref(&self) -> &ElementData {
        self.data()
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for Element<'_> {}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("unique_id", &self.unique_id)
            .field("control_type", &self.control_type_name())
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::control_type::{BUTTON, PANE};

    #[test]
    fn attach_sets_parent_back_reference() {
        let mut tree = ElementTree::new();
        let root = tree.push(ElementData::new(PANE));
        let child = tree.add_child(root, ElementData::new(BUTTON));

        let c = tree.element(child);
        assert_eq!(c.parent().map(|p| p.index()), Some(root));
        assert_eq!(tree.element(root).child_count(), 1);
    }

    #[test]
    fn reattach_moves_child() {
        let mut tree = ElementTree::new();
        let a = tree.push(ElementData::new(PANE));
        let b = tree.push(ElementData::new(PANE));
        let c = tree.add_child(a, ElementData::new(BUTTON));
        tree.attach(b, c);

        assert_eq!(tree.element(a).child_count(), 0);
        assert_eq!(tree.element(c).parent().map(|p| p.index()), Some(b));
    }

    #[test]
    fn property_bag_starts_unpopulated() {
        let mut data = ElementData::new(BUTTON);
        assert!(!data.has_full_properties());
        assert!(data.is_enabled());
        data.set_property(property::IS_ENABLED, PropertyValue::Bool(false));
        assert!(data.has_full_properties());
        assert!(!data.is_enabled());
    }

    #[test]
    fn rect_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Rect::new(90.0, 90.0, 20.0, 20.0)));
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }
}
