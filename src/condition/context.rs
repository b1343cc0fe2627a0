use std::ops::{Deref, DerefMut};

use crate::element::Element;

/// Per-evaluation stack of reference elements.
///
/// A relationship condition pushes the element it is iterating from, so a
/// nested condition (e.g. `has_same_type`) can compare each child against it.
/// One context belongs to exactly one top-level evaluation; it is never shared
/// between threads.
#[derive(Debug, Default)]
pub struct ConditionContext<'a> {
    reference_elements: Vec<Element<'a>>,
}

impl<'a> ConditionContext<'a> {
    pub fn new() -> Self {
        Self { reference_elements: Vec::new() }
    }

    /// Push `element` for the lifetime of the returned guard.
    pub fn enter<'c>(&'c mut self, element: Element<'a>) -> ContextScope<'c, 'a> {
        self.reference_elements.push(element);
        ContextScope { context: self }
    }

    /// Innermost reference element.
    pub fn reference_element(&self) -> Option<Element<'a>> {
        self.reference_elements.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.reference_elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference_elements.is_empty()
    }
}

/// Pops the element pushed by [`ConditionContext::enter`] when dropped,
/// including when evaluation returns early with an error or unwinds.
pub struct ContextScope<'c, 'a> {
    context: &'c mut ConditionContext<'a>,
}

impl<'a> Deref for ContextScope<'_, 'a> {
    type Target = ConditionContext<'a>;

    fn deref(&self) -> &ConditionContext<'a> {
        self.context
    }
}

impl<'a> DerefMut for ContextScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut ConditionContext<'a> {
        self.context
    }
}

impl Drop for ContextScope<'_, '_> {
    fn drop(&mut self) {
        self.context.reference_elements.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::control_type::{BUTTON, PANE};
    use crate::element::{ElementData, ElementTree};

    #[test]
    fn scope_pops_on_drop() {
        let mut tree = ElementTree::new();
        let root = tree.push(ElementData::new(PANE));
        let child = tree.add_child(root, ElementData::new(BUTTON));

        let mut ctx = ConditionContext::new();
        {
            let mut outer = ctx.enter(tree.element(root));
            {
                let inner = outer.enter(tree.element(child));
                assert_eq!(inner.depth(), 2);
                assert_eq!(inner.reference_element().map(|e| e.index()), Some(child));
            }
            assert_eq!(outer.depth(), 1);
        }
        assert!(ctx.is_empty());
    }
}
