#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use a11y_scan::element::control_type::{BUTTON, PANE, WINDOW};
use a11y_scan::element::{ElementData, ElementTree, NodeIndex, Rect};
use a11y_scan::snapshot::{FixtureNode, MemoryProvider};

/// `window <- pane <- button`, returned as (tree, [window, pane, button]).
pub fn chain() -> (ElementTree, [NodeIndex; 3]) {
    let mut tree = ElementTree::new();
    let root = tree.push(ElementData::new(WINDOW).with_name("Main"));
    let pane = tree.add_child(root, ElementData::new(PANE).with_name("Body"));
    let button = tree.add_child(pane, ElementData::new(BUTTON).with_name("OK"));
    (tree, [root, pane, button])
}

pub fn rect(left: f64, top: f64, width: f64, height: f64) -> Option<Rect> {
    Some(Rect::new(left, top, width, height))
}

/// Focusable, on-screen control element with a name and localized type.
pub fn focusable(control_type: i32, name: &str, lct: &str) -> ElementData {
    ElementData::new(control_type)
        .with_name(name)
        .with_localized_control_type(lct)
        .with_rect(Rect::new(10.0, 10.0, 80.0, 20.0))
        .with_keyboard_focusable(true)
        .with_control_element(true)
        .with_content_element(true)
}

/// `root -> {A, B}`, `A -> {C}`, each node carrying its letter as name
/// and automation id.
pub fn sample_fixture() -> FixtureNode {
    FixtureNode::new("Window")
        .with_name("root")
        .with_automation_id("root")
        .with_child(
            FixtureNode::new("Pane")
                .with_name("A")
                .with_automation_id("A")
                .with_child(FixtureNode::new("Button").with_name("C").with_automation_id("C")),
        )
        .with_child(FixtureNode::new("Button").with_name("B").with_automation_id("B"))
}

/// Pane with `count` button children named `b0`, `b1`, ...
pub fn wide_fixture(count: usize) -> FixtureNode {
    (0..count).fold(FixtureNode::new("Pane").with_name("list").with_automation_id("list"), |node, i| {
        node.with_child(FixtureNode::new("Button").with_name(&format!("b{}", i)))
    })
}

pub fn provider(root: FixtureNode) -> Arc<MemoryProvider> {
    Arc::new(MemoryProvider::from_root(root).unwrap())
}

/// Fresh path under the system temp dir, unique per test process and name.
pub fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("a11y-scan-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path
}
