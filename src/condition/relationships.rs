use crate::condition::condition::{Condition, ConditionKind, fixed_point};
use crate::condition::value::ValueCondition;

// ============================================================================
// Parents and ancestors
// ============================================================================

pub fn parent(c: Condition) -> Condition {
    Condition::from_kind(ConditionKind::Parent(c))
}

pub fn not_parent(c: Condition) -> Condition {
    !parent(c)
}

pub fn parent_exists() -> Condition {
    parent(Condition::always()).described("ParentExists")
}

pub fn no_parent_exists() -> Condition {
    (!parent(Condition::always())).described("NoParentExists")
}

/// `index` 0 is the element itself, 1 its parent, 2 its grandparent, ...
pub fn ancestor(index: usize, c: Condition) -> Condition {
    (0..index).fold(c, |acc, _| parent(acc))
}

pub fn ancestor_exists(index: usize) -> Condition {
    ancestor(index, Condition::always())
}

/// True when some ancestor matches `c`, searching upward until an ancestor
/// matches `stop`.
pub fn any_ancestor_until(c: Condition, stop: Condition) -> Condition {
    let description = format!("AnyAncestor({})", c);
    fixed_point(|recurse| parent(!stop & (c | recurse))).described(&description)
}

pub fn any_ancestor(c: Condition) -> Condition {
    any_ancestor_until(c, Condition::never())
}

pub fn no_ancestor(c: Condition) -> Condition {
    let description = format!("NoAncestor({})", c);
    (!any_ancestor(c)).described(&description)
}

/// True when every ancestor up to the root matches `c`. False for a root.
pub fn all_ancestors(c: Condition) -> Condition {
    let description = format!("AllAncestors({})", c);
    fixed_point(|recurse| parent(c & (recurse | no_parent_exists()))).described(&description)
}

// ============================================================================
// Children and descendants
// ============================================================================

pub fn any_child(c: Condition) -> Condition {
    let description = format!("AnyChild({})", c);
    Condition::from_kind(ConditionKind::AnyChild(c)).described(&description)
}

pub fn no_child(c: Condition) -> Condition {
    let description = format!("NoChild({})", c);
    (!Condition::from_kind(ConditionKind::AnyChild(c))).described(&description)
}

pub fn children_exist() -> Condition {
    any_child(Condition::always()).described("ChildrenExist")
}

pub fn no_children_exist() -> Condition {
    (!children_exist()).described("NoChildrenExist")
}

/// False for a childless element: "all of none" is not a useful answer here.
pub fn all_children(c: Condition) -> Condition {
    let description = format!("AllChildren({})", c);
    (children_exist() & !any_child(!c)).described(&description)
}

pub fn any_descendant(c: Condition) -> Condition {
    Condition::from_kind(ConditionKind::AnyDescendant(c))
}

pub fn no_descendant(c: Condition) -> Condition {
    !any_descendant(c)
}

pub fn all_descendants(c: Condition) -> Condition {
    let description = format!("AllDescendants({})", c);
    (children_exist() & !any_descendant(!c)).described(&description)
}

// ============================================================================
// Siblings and reference comparisons
// ============================================================================

/// Compares the element against the innermost reference element of the
/// context. Fails with `MissingContext` when used outside `any_child`.
pub fn has_same_type() -> Condition {
    Condition::from_kind(ConditionKind::HasSameType)
}

pub fn siblings_of_same_type() -> Condition {
    Condition::from_fn(|e| match e.parent() {
        Some(p) => p.children().filter(|c| c.control_type_id == e.control_type_id).count() > 1,
        None => false,
    })
    .described("SiblingsOfSameType")
}

pub fn no_siblings_of_same_type() -> Condition {
    !siblings_of_same_type()
}

pub fn second_child() -> Condition {
    Condition::from_kind(ConditionKind::SecondChild)
}

// ============================================================================
// Counts
// ============================================================================

pub fn child_count(c: Condition) -> ValueCondition {
    let description = format!("ChildCount({})", c);
    ValueCondition::with_context(&description, move |e, ctx| {
        let mut count = 0;
        for child in e.children() {
            if c.evaluate(child, ctx)? {
                count += 1;
            }
        }
        Ok(count)
    })
}

/// Number of children of the element's parent matching `c`, the element
/// itself included. -1 when the element has no parent.
pub fn sibling_count(c: Condition) -> ValueCondition {
    let description = format!("SiblingCount({})", c);
    ValueCondition::with_context(&description, move |e, ctx| {
        let Some(p) = e.parent() else {
            return Ok(-1);
        };
        let mut count = 0;
        for sibling in p.children() {
            if c.evaluate(sibling, ctx)? {
                count += 1;
            }
        }
        Ok(count)
    })
}

pub fn descendant_count(c: Condition) -> ValueCondition {
    let description = format!("DescendantCount({})", c);
    ValueCondition::with_context(&description, move |e, ctx| {
        let mut count = 0;
        for d in e.descendants() {
            if c.evaluate(d, ctx)? {
                count += 1;
            }
        }
        Ok(count)
    })
}

// ============================================================================
// N-ary combinators
// ============================================================================

pub fn exactly_one(conditions: Vec<Condition>) -> Condition {
    Condition::from_kind(ConditionKind::ExactlyOne(conditions))
}

pub fn any_of(conditions: Vec<Condition>) -> Condition {
    Condition::from_kind(ConditionKind::Any(conditions))
}

pub fn all_of(conditions: Vec<Condition>) -> Condition {
    Condition::from_kind(ConditionKind::All(conditions))
}

