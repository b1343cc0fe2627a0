use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use a11y_scan::element::control_type::{BUTTON, PANE, TOOL_BAR, WINDOW};
use a11y_scan::element::{ElementData, ElementTree};
use a11y_scan::fingerprint::{
    Fingerprint, FingerprintContribution, ScanStatus, ViolationHistory, group_failures,
};
use a11y_scan::rules::{RuleId, RuleRunner};
use a11y_scan::snapshot::{CancellationToken, FixtureNode, SnapshotBuilder};

mod common;

fn lone(data: ElementData) -> ElementTree {
    let mut tree = ElementTree::new();
    tree.push(data);
    tree
}

fn fingerprint_of(data: ElementData, rule: RuleId) -> Fingerprint {
    let tree = lone(data);
    Fingerprint::new(tree.element(0), rule, ScanStatus::Fail)
}

// ============================================================================
// Contributions
// ============================================================================

#[test]
fn lone_element_contributes_its_own_attributes() {
    let fp = fingerprint_of(
        ElementData::new(BUTTON).with_name("OK").with_class_name("Btn").with_automation_id("ok"),
        RuleId::NameNotNull,
    );

    assert_eq!(fp.get("RuleId"), Some("NameNotNull"));
    assert_eq!(fp.get("Level"), Some("error"));
    assert_eq!(fp.get("Name"), Some("OK"));
    assert_eq!(fp.get("ClassName"), Some("Btn"));
    assert_eq!(fp.get("ControlType"), Some("Button(50000)"));
    assert_eq!(fp.get("AutomationId"), Some("ok"));
    assert_eq!(fp.contributions().len(), 6);
}

#[test]
fn unknown_control_type_still_contributes_at_level_zero() {
    let fp = fingerprint_of(ElementData::default(), RuleId::NameNotNull);
    assert_eq!(fp.get("ControlType"), Some("Unknown(0)"));
    assert_eq!(fp.contributions().len(), 3);
}

#[test]
fn contributions_are_sorted_by_key() {
    let fp = fingerprint_of(ElementData::new(BUTTON).with_name("OK"), RuleId::NameNotNull);
    let keys: Vec<&str> = fp.contributions().iter().map(|c| c.key.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn flag_contributions_follow_the_rule() {
    let data = ElementData::new(BUTTON)
        .with_control_element(true)
        .with_content_element(false)
        .with_keyboard_focusable(true);

    let control = fingerprint_of(data.clone(), RuleId::IsControlElementPropertyExists);
    assert_eq!(control.get("IsControlElement"), Some("True"));
    assert_eq!(control.get("IsContentElement"), None);

    let content = fingerprint_of(data.clone(), RuleId::IsContentElementPropertyExists);
    assert_eq!(content.get("IsContentElement"), Some("False"));

    let keyboard = fingerprint_of(data.clone(), RuleId::IsKeyboardFocusableFalseButDisabled);
    assert_eq!(keyboard.get("IsKeyboardFocusable"), Some("True"));

    let unrelated = fingerprint_of(data, RuleId::NameNotNull);
    assert_eq!(unrelated.get("IsControlElement"), None);
    assert_eq!(unrelated.get("IsKeyboardFocusable"), None);
}

#[test]
fn missing_flag_counts_as_false() {
    let fp = fingerprint_of(ElementData::new(BUTTON), RuleId::IsControlElementTrueRequired);
    assert_eq!(fp.get("IsControlElement"), Some("False"));
}

#[test]
fn docked_pane_ancestry() {
    // Desktop > Word window > dock pane > tool bar > navigation pane
    let mut tree = ElementTree::new();
    let desktop = tree.push(ElementData::new(PANE).with_name("Desktop 1").with_localized_control_type("pane"));
    let window = tree.add_child(
        desktop,
        ElementData::new(WINDOW).with_name("Document 1 - Word").with_localized_control_type("window"),
    );
    let dock = tree.add_child(window, ElementData::new(PANE).with_name("MsoDockLeft").with_localized_control_type("pane"));
    let tool_bar = tree.add_child(dock, ElementData::new(TOOL_BAR).with_localized_control_type("tool bar"));
    let navigation =
        tree.add_child(tool_bar, ElementData::new(PANE).with_name("Navigation").with_localized_control_type("pane"));

    let fp = Fingerprint::new(tree.element(navigation), RuleId::NameNotNull, ScanStatus::Fail);

    let expected: Vec<(&str, &str)> = vec![
        ("Ancestor1.ControlType", "ToolBar(50021)"),
        ("Ancestor1.LocalizedControlType", "tool bar"),
        ("Ancestor2.ControlType", "Pane(50033)"),
        ("Ancestor2.LocalizedControlType", "pane"),
        ("Ancestor2.Name", "MsoDockLeft"),
        ("Ancestor3.ControlType", "Window(50032)"),
        ("Ancestor3.LocalizedControlType", "window"),
        ("ControlType", "Pane(50033)"),
        ("Level", "error"),
        ("LocalizedControlType", "pane"),
        ("Name", "Navigation"),
        ("RuleId", "NameNotNull"),
    ];
    let actual: Vec<(&str, &str)> =
        fp.contributions().iter().map(|c| (c.key.as_str(), c.value.as_str())).collect();
    assert_eq!(actual, expected);
}

#[test]
fn ancestor_without_attributes_ends_the_walk() {
    let mut tree = ElementTree::new();
    let root = tree.push(ElementData::new(WINDOW).with_name("Top"));
    let unnamed = tree.add_child(root, ElementData::default());
    let middle = tree.add_child(unnamed, ElementData::new(PANE).with_name("Middle"));
    let empty = tree.add_child(middle, ElementData::default());
    let leaf = tree.add_child(empty, ElementData::new(BUTTON).with_name("Leaf"));

    let fp = Fingerprint::new(tree.element(leaf), RuleId::NameNotNull, ScanStatus::Fail);
    assert!(fp.contributions().iter().all(|c| !c.key.starts_with("Ancestor2.")));
    assert_eq!(fp.get("Name"), Some("Leaf"));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn equivalent_elements_have_equal_fingerprints() {
    let make = || ElementData::new(TOOL_BAR).with_name("Format").with_automation_id("fmt");
    let a = fingerprint_of(make(), RuleId::NameNotNull);
    let b = fingerprint_of(make(), RuleId::NameNotNull);

    assert_eq!(a, b);
    assert_eq!(a.hash_value(), b.hash_value());
    assert_eq!(a.compare_to(&b), std::cmp::Ordering::Equal);
}

#[test]
fn rule_id_changes_the_hash() {
    let make = || ElementData::new(BUTTON).with_name("OK");
    let a = fingerprint_of(make(), RuleId::NameNotNull);
    let b = fingerprint_of(make(), RuleId::NameNotEmpty);
    assert_ne!(a.hash_value(), b.hash_value());
    assert_ne!(a, b);
}

#[test]
fn status_changes_the_hash() {
    let tree = lone(ElementData::new(BUTTON).with_name("OK"));
    let fail = Fingerprint::new(tree.element(0), RuleId::NameNotNull, ScanStatus::Fail);
    let pass = Fingerprint::new(tree.element(0), RuleId::NameNotNull, ScanStatus::Pass);
    assert_ne!(fail.hash_value(), pass.hash_value());
}

#[test]
fn case_difference_is_not_equal() {
    let a = fingerprint_of(ElementData::new(BUTTON).with_name("a"), RuleId::NameNotNull);
    let b = fingerprint_of(ElementData::new(BUTTON).with_name("A"), RuleId::NameNotNull);
    assert_eq!(a.contributions().len(), b.contributions().len());
    assert_ne!(a, b);
}

#[test]
fn swapped_values_collide_but_are_not_equal() {
    let a = fingerprint_of(ElementData::new(BUTTON).with_name("Alpha").with_class_name("Beta"), RuleId::NameNotNull);
    let b = fingerprint_of(ElementData::new(BUTTON).with_name("Beta").with_class_name("Alpha"), RuleId::NameNotNull);

    assert_eq!(a.hash_value(), b.hash_value());
    assert_eq!(a.compare_to(&b), std::cmp::Ordering::Equal);
    assert_eq!(b.compare_to(&a), std::cmp::Ordering::Equal);
    assert_ne!(a, b);
    assert_ne!(a.cmp(&b), std::cmp::Ordering::Equal);
}

#[test]
fn compare_to_orders_by_count_first() {
    let fewer = fingerprint_of(ElementData::new(BUTTON), RuleId::NameNotNull);
    let more = fingerprint_of(ElementData::new(BUTTON).with_name("OK"), RuleId::NameNotNull);
    assert_eq!(fewer.compare_to(&more), std::cmp::Ordering::Less);
    assert_eq!(more.compare_to(&fewer), std::cmp::Ordering::Greater);
}

#[test]
fn hash_ignores_contribution_order() {
    let forward = Fingerprint::from_contributions(vec![
        FingerprintContribution::new("RuleId", "NameNotNull"),
        FingerprintContribution::new("Name", "OK"),
        FingerprintContribution::new("Level", "error"),
    ]);
    let backward = Fingerprint::from_contributions(vec![
        FingerprintContribution::new("Level", "error"),
        FingerprintContribution::new("Name", "OK"),
        FingerprintContribution::new("RuleId", "NameNotNull"),
    ]);
    assert_eq!(forward.hash_value(), backward.hash_value());
    assert_eq!(forward, backward);
}

#[test]
fn colliding_fingerprints_are_distinct_map_keys() {
    let a = fingerprint_of(ElementData::new(BUTTON).with_name("Alpha").with_class_name("Beta"), RuleId::NameNotNull);
    let b = fingerprint_of(ElementData::new(BUTTON).with_name("Beta").with_class_name("Alpha"), RuleId::NameNotNull);

    let mut store: HashMap<Fingerprint, i32> = HashMap::new();
    store.insert(a.clone(), 1);
    assert_eq!(store.get(&b), None);
    store.insert(b.clone(), 2);
    assert_eq!(store.len(), 2);
    assert_eq!(store[&a], 1);
    assert_eq!(store[&b], 2);

    let sorted: BTreeSet<Fingerprint> = [a, b].into_iter().collect();
    assert_eq!(sorted.len(), 2);
}

#[test]
fn equal_fingerprints_share_a_map_entry() {
    let make = || fingerprint_of(ElementData::new(BUTTON).with_name("OK"), RuleId::NameNotNull);
    let mut store: HashMap<Fingerprint, i32> = HashMap::new();
    *store.entry(make()).or_default() += 1;
    *store.entry(make()).or_default() += 2;
    assert_eq!(store.len(), 1);
    assert_eq!(store[&make()], 3);
}

#[test]
fn fingerprint_survives_json() {
    let fp = fingerprint_of(ElementData::new(BUTTON).with_name("OK"), RuleId::NameNotNull);
    let json = serde_json::to_string(&fp).unwrap();
    let back: Fingerprint = serde_json::from_str(&json).unwrap();
    assert_eq!(fp, back);
    assert_eq!(fp.hash_value(), back.hash_value());
}

// ============================================================================
// Grouping and history
// ============================================================================

fn unnamed_buttons(count: usize) -> FixtureNode {
    (0..count).fold(FixtureNode::new("Window").with_name("Main"), |node, _| {
        let mut button = FixtureNode::new("Button");
        button.is_keyboard_focusable = Some(true);
        button.is_control_element = Some(true);
        button.rect = common::rect(0.0, 0.0, 40.0, 20.0);
        node.with_child(button)
    })
}

#[test]
fn identical_failures_share_a_group() {
    let provider = common::provider(unnamed_buttons(3));
    let root = provider.root();
    let runner = RuleRunner::default();
    let token = CancellationToken::new();
    let mut snapshot = SnapshotBuilder::new(Arc::clone(&provider)).build(root, &runner, &token).unwrap();
    snapshot.evaluate(&runner, &token).unwrap();

    let groups = group_failures(snapshot.evaluated());
    let name_group = groups.iter().find(|g| g.rule_id == RuleId::NameNotNull).unwrap();
    assert_eq!(name_group.element_ids, vec![1, 2, 3]);
    assert!(groups.iter().all(|g| g.fingerprint.get("Level") == Some("error")));
}

#[test]
fn history_diff_tracks_new_recurring_and_resolved() {
    let fa = fingerprint_of(ElementData::new(BUTTON).with_name("a"), RuleId::NameNotNull);
    let fb = fingerprint_of(ElementData::new(BUTTON).with_name("b"), RuleId::NameNotNull);
    let fc = fingerprint_of(ElementData::new(BUTTON).with_name("c"), RuleId::NameNotNull);

    let mut history = ViolationHistory::default();
    let first = history.record_run(vec![fa.clone(), fb.clone()]);
    assert_eq!(first.new.len(), 2);
    assert!(first.recurring.is_empty());

    let second = history.record_run(vec![fb.clone(), fc.clone()]);
    assert_eq!(second.new, vec![fc.clone()]);
    assert_eq!(second.recurring, vec![fb.clone()]);
    assert_eq!(second.resolved, vec![fa]);
    assert_eq!(history.runs, 2);
    assert!(history.contains(&fc));
}

#[test]
fn history_round_trips_through_disk() {
    let path = common::temp_path("history.json");
    let loaded = ViolationHistory::load(&path).unwrap();
    assert!(loaded.is_empty());

    let mut history = ViolationHistory::default();
    let fp = fingerprint_of(ElementData::new(BUTTON).with_name("OK"), RuleId::NameNotNull);
    history.record_run(vec![fp.clone()]);
    history.save(&path).unwrap();

    let reloaded = ViolationHistory::load(&path).unwrap();
    assert_eq!(reloaded.runs, 1);
    assert!(reloaded.contains(&fp));
    let _ = std::fs::remove_file(&path);
}
