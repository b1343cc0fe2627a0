use a11y_scan::EvaluationError;
use a11y_scan::condition::relationships::{
    all_ancestors, all_children, ancestor, any_ancestor, any_ancestor_until, any_child, any_descendant,
    child_count, descendant_count, has_same_type, no_ancestor, no_child, parent, second_child, sibling_count,
    siblings_of_same_type,
};
use a11y_scan::condition::string_property::{CLASS_NAME, LOCALIZED_CONTROL_TYPE, NAME};
use a11y_scan::condition::{Condition, ConditionContext, fixed_point};
use a11y_scan::element::control_type::{BUTTON, CHECK_BOX, PANE, TEXT, WINDOW};
use a11y_scan::element::ids::pattern;
use a11y_scan::element::{ElementData, ElementTree, PatternData, PropertyValue};

mod common;

// ============================================================================
// Boolean combinators
// ============================================================================

#[test]
fn and_or_not_follow_boolean_logic() {
    let (tree, [_, _, button]) = common::chain();
    let e = tree.element(button);
    let yes = Condition::control_type(BUTTON);
    let no = Condition::control_type(PANE);

    assert!((yes.clone() & yes.clone()).matches(e).unwrap());
    assert!(!(yes.clone() & no.clone()).matches(e).unwrap());
    assert!((yes.clone() | no.clone()).matches(e).unwrap());
    assert!(!(no.clone() | no.clone()).matches(e).unwrap());
    assert!((!no).matches(e).unwrap());
    assert!(!(!yes).matches(e).unwrap());
}

#[test]
fn and_short_circuits_before_a_failing_predicate() {
    let (tree, [_, _, button]) = common::chain();
    let failing = Condition::create(|_| Err(EvaluationError::rule("should not run")));

    let guarded = Condition::never() & failing.clone();
    assert!(!guarded.matches(tree.element(button)).unwrap());

    let unguarded = Condition::always() & failing;
    assert!(unguarded.matches(tree.element(button)).is_err());
}

#[test]
fn described_condition_displays_its_description() {
    let c = Condition::control_type(BUTTON).described("IsButton");
    assert_eq!(c.to_string(), "IsButton");
    assert_eq!(c.description(), Some("IsButton"));
}

// ============================================================================
// Ancestors
// ============================================================================

#[test]
fn any_ancestor_finds_match_at_root() {
    let (tree, [root, pane, button]) = common::chain();
    let is_window = Condition::control_type(WINDOW);

    assert!(any_ancestor(is_window.clone()).matches(tree.element(button)).unwrap());
    assert!(any_ancestor(is_window.clone()).matches(tree.element(pane)).unwrap());
    assert!(!no_ancestor(is_window.clone()).matches(tree.element(button)).unwrap());
    assert!(!any_ancestor(is_window.clone()).matches(tree.element(root)).unwrap());
    assert!(no_ancestor(is_window).matches(tree.element(root)).unwrap());
}

#[test]
fn any_ancestor_does_not_match_the_element_itself() {
    let (tree, [_, _, button]) = common::chain();
    assert!(!any_ancestor(Condition::control_type(BUTTON)).matches(tree.element(button)).unwrap());
}

#[test]
fn any_ancestor_until_stops_at_boundary() {
    let (tree, [_, _, button]) = common::chain();
    let is_window = Condition::control_type(WINDOW);
    let at_pane = Condition::control_type(PANE);

    let bounded = any_ancestor_until(is_window, at_pane);
    assert!(!bounded.matches(tree.element(button)).unwrap());
}

#[test]
fn all_ancestors_requires_every_level() {
    let (tree, [root, _, button]) = common::chain();
    let not_button = !Condition::control_type(BUTTON);

    assert!(all_ancestors(not_button.clone()).matches(tree.element(button)).unwrap());
    assert!(!all_ancestors(Condition::control_type(PANE)).matches(tree.element(button)).unwrap());
    // A root has no ancestors to satisfy the condition.
    assert!(!all_ancestors(not_button).matches(tree.element(root)).unwrap());
}

#[test]
fn ancestor_index_counts_up_from_the_element() {
    let (tree, [_, _, button]) = common::chain();
    let e = tree.element(button);

    assert!(ancestor(0, Condition::control_type(BUTTON)).matches(e).unwrap());
    assert!(ancestor(1, Condition::control_type(PANE)).matches(e).unwrap());
    assert!(ancestor(2, Condition::control_type(WINDOW)).matches(e).unwrap());
    assert!(!ancestor(3, Condition::always()).matches(e).unwrap());
}

#[test]
fn ancestor_search_over_a_deep_chain() {
    let mut tree = ElementTree::new();
    let mut current = tree.push(ElementData::new(WINDOW));
    for _ in 0..500 {
        current = tree.add_child(current, ElementData::new(PANE));
    }
    let leaf = tree.element(current);

    assert!(any_ancestor(Condition::control_type(WINDOW)).matches(leaf).unwrap());
    assert!(!any_ancestor(Condition::control_type(BUTTON)).matches(leaf).unwrap());
}

// ============================================================================
// Children and reference elements
// ============================================================================

#[test]
fn any_child_has_same_type() {
    let mut tree = ElementTree::new();
    let parent_index = tree.push(ElementData::new(PANE));
    tree.add_child(parent_index, ElementData::new(BUTTON));
    let same_type = any_child(has_same_type());

    assert!(!same_type.matches(tree.element(parent_index)).unwrap());

    tree.add_child(parent_index, ElementData::new(PANE));
    assert!(same_type.matches(tree.element(parent_index)).unwrap());
}

#[test]
fn has_same_type_outside_any_child_fails() {
    let (tree, [_, _, button]) = common::chain();
    let err = has_same_type().matches(tree.element(button)).unwrap_err();
    assert!(matches!(err, EvaluationError::MissingContext));
}

#[test]
fn context_is_restored_after_inner_error() {
    let (tree, [root, _, _]) = common::chain();
    let failing = Condition::create(|_| Err(EvaluationError::rule("boom")));
    let nested = any_child(any_child(failing));

    let mut ctx = ConditionContext::new();
    assert!(nested.evaluate(tree.element(root), &mut ctx).is_err());
    assert!(ctx.is_empty());

    // The same context is usable afterwards.
    let ok = any_child(has_same_type() | Condition::always());
    assert!(ok.evaluate(tree.element(root), &mut ctx).unwrap());
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn nested_any_child_compares_against_innermost_reference() {
    // pane -> button -> button: the inner any_child sees the middle button.
    let mut tree = ElementTree::new();
    let pane = tree.push(ElementData::new(PANE));
    let middle = tree.add_child(pane, ElementData::new(BUTTON));
    tree.add_child(middle, ElementData::new(BUTTON));

    let grandchild_matches_child = any_child(any_child(has_same_type()));
    assert!(grandchild_matches_child.matches(tree.element(pane)).unwrap());
}

#[test]
fn child_predicates() {
    let mut tree = ElementTree::new();
    let pane = tree.push(ElementData::new(PANE));
    let first = tree.add_child(pane, ElementData::new(BUTTON));
    let second = tree.add_child(pane, ElementData::new(BUTTON));
    tree.add_child(pane, ElementData::new(TEXT));
    let e = tree.element(pane);

    assert!(no_child(Condition::control_type(CHECK_BOX)).matches(e).unwrap());
    assert!(!all_children(Condition::control_type(BUTTON)).matches(e).unwrap());
    assert!(child_count(Condition::control_type(BUTTON)).eq(2).matches(e).unwrap());
    assert!(descendant_count(Condition::always()).eq(3).matches(e).unwrap());
    assert!(sibling_count(Condition::control_type(BUTTON)).eq(2).matches(tree.element(first)).unwrap());
    assert!(second_child().matches(tree.element(second)).unwrap());
    assert!(!second_child().matches(tree.element(first)).unwrap());
    assert!(siblings_of_same_type().matches(tree.element(first)).unwrap());
}

#[test]
fn all_children_of_childless_element_is_false() {
    let (tree, [_, _, button]) = common::chain();
    assert!(!all_children(Condition::always()).matches(tree.element(button)).unwrap());
}

#[test]
fn sibling_count_of_root_is_negative() {
    let (tree, [root, _, _]) = common::chain();
    let mut ctx = ConditionContext::new();
    let count = sibling_count(Condition::always()).value(tree.element(root), &mut ctx).unwrap();
    assert_eq!(count, -1);
}

#[test]
fn value_conditions_compare_with_each_other() {
    let mut tree = ElementTree::new();
    let pane = tree.push(ElementData::new(PANE));
    tree.add_child(pane, ElementData::new(BUTTON));
    tree.add_child(pane, ElementData::new(BUTTON));
    tree.add_child(pane, ElementData::new(TEXT));
    let e = tree.element(pane);

    let buttons = child_count(Condition::control_type(BUTTON));
    let texts = child_count(Condition::control_type(TEXT));
    assert!(buttons.gt(texts.clone()).matches(e).unwrap());
    assert!(texts.le(1).matches(e).unwrap());
}

// ============================================================================
// Fixed points
// ============================================================================

#[test]
fn fixed_point_searches_descendants() {
    let (tree, [root, pane, button]) = common::chain();
    let has_button_below = fixed_point(|recurse| any_child(Condition::control_type(BUTTON) | recurse));

    assert!(has_button_below.matches(tree.element(root)).unwrap());
    assert!(has_button_below.matches(tree.element(pane)).unwrap());
    assert!(!has_button_below.matches(tree.element(button)).unwrap());
    assert_eq!(
        has_button_below.matches(tree.element(root)).unwrap(),
        any_descendant(Condition::control_type(BUTTON)).matches(tree.element(root)).unwrap()
    );
}

#[test]
fn fixed_point_survives_clone_and_drop_of_original() {
    let (tree, [_, _, button]) = common::chain();
    let copy = {
        let original = fixed_point(|recurse| parent(Condition::control_type(WINDOW) | recurse));
        original.clone()
    };
    assert!(copy.matches(tree.element(button)).unwrap());
}

// ============================================================================
// String properties
// ============================================================================

#[test]
fn string_property_null_empty_and_whitespace() {
    let mut tree = ElementTree::new();
    let absent = tree.push(ElementData::new(BUTTON));
    let empty = tree.push(ElementData::new(BUTTON).with_name(""));
    let blank = tree.push(ElementData::new(BUTTON).with_name("   "));
    let named = tree.push(ElementData::new(BUTTON).with_name("OK"));

    let check = |c: Condition, index| c.matches(tree.element(index)).unwrap();

    assert!(check(NAME.null(), absent));
    assert!(!check(NAME.empty(), absent));
    assert!(check(NAME.null_or_empty(), absent));
    assert!(check(NAME.empty(), empty));
    assert!(check(NAME.white_space(), blank));
    assert!(!check(NAME.null_or_empty(), blank));
    assert!(check(NAME.null_or_white_space(), blank));
    assert!(check(NAME.not_null_or_white_space(), named));
    assert!(!check(NAME.white_space(), named));
}

#[test]
fn string_property_equality_and_length() {
    let mut tree = ElementTree::new();
    let index = tree.push(
        ElementData::new(BUTTON)
            .with_name("Submit")
            .with_localized_control_type("button")
            .with_class_name("SUBMIT"),
    );
    let e = tree.element(index);

    assert!(NAME.is("Submit").matches(e).unwrap());
    assert!(!NAME.is("submit").matches(e).unwrap());
    assert!(NAME.is_no_case("SUBMIT").matches(e).unwrap());
    assert!(NAME.is_equal_to(CLASS_NAME).matches(e).unwrap());
    assert!(NAME.is_not_equal_to(LOCALIZED_CONTROL_TYPE).matches(e).unwrap());
    assert!(NAME.length().eq(6).matches(e).unwrap());
}

#[test]
fn private_unicode_detection() {
    let mut tree = ElementTree::new();
    let glyph = tree.push(ElementData::new(BUTTON).with_name("\u{E700}"));
    let plain = tree.push(ElementData::new(BUTTON).with_name("Menu"));
    let unnamed = tree.push(ElementData::new(BUTTON));

    assert!(NAME.includes_private_unicode_characters().matches(tree.element(glyph)).unwrap());
    assert!(NAME.excludes_private_unicode_characters().matches(tree.element(plain)).unwrap());
    assert!(NAME.includes_private_unicode_characters().matches(tree.element(unnamed)).is_err());
}

#[test]
fn regex_conditions() {
    let mut tree = ElementTree::new();
    let index = tree.push(ElementData::new(BUTTON).with_name("Save As..."));
    let e = tree.element(index);

    assert!(NAME.matches_regex(r"^Save").unwrap().matches(e).unwrap());
    assert!(!NAME.matches_regex(r"^save").unwrap().matches(e).unwrap());
    assert!(NAME.matches_regex_no_case(r"^save").unwrap().matches(e).unwrap());
    assert!(NAME.matches_regex("(unclosed").is_err());
}

#[test]
fn pattern_conditions_check_support_and_validator() {
    let mut tree = ElementTree::new();
    let range = PatternData::new(pattern::RANGE_VALUE).with("Maximum", PropertyValue::Double(100.0));
    let index = tree.push(ElementData::new(BUTTON).with_pattern(range));
    let e = tree.element(index);

    assert!(Condition::pattern(pattern::RANGE_VALUE).matches(e).unwrap());
    assert!(!Condition::pattern(pattern::TEXT).matches(e).unwrap());

    let has_max = |p: &PatternData| p.get("Maximum").and_then(PropertyValue::as_double) == Some(100.0);
    assert!(Condition::pattern_with(pattern::RANGE_VALUE, has_max).matches(e).unwrap());
    let has_min = |p: &PatternData| p.get("Minimum").is_some();
    assert!(!Condition::pattern_with(pattern::RANGE_VALUE, has_min).matches(e).unwrap());
}

#[test]
fn conditions_are_shared_across_threads() {
    let (tree, [_, _, button]) = common::chain();
    let c = any_ancestor(Condition::control_type(WINDOW)) & NAME.is("OK");
    std::thread::scope(|s| {
        for _ in 0..4 {
            let c = c.clone();
            let tree = &tree;
            s.spawn(move || assert!(c.matches(tree.element(button)).unwrap()));
        }
    });
}
