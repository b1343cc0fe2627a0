use std::sync::Arc;

use tracing::{debug, warn};

use crate::element::ElementData;
use crate::element::identity::{element_key, is_same_ui_element};
use crate::error::{ProviderError, ScanError};
use crate::snapshot::provider::{ElementProvider, OwnedHandle};

/// Stop climbing after this many levels even if the provider keeps answering.
pub const MAX_ANCESTOR_DEPTH: usize = 1024;

/// One captured ancestor of the scan target.
pub struct AncestorNode<P: ElementProvider> {
    pub handle: OwnedHandle<P>,
    pub data: ElementData,
}

/// Ancestors of the scan target, nearest first. The nearest ancestor has
/// unique id -1, the next -2 and so on; the last entry is the tree root.
pub struct Ancestry<P: ElementProvider> {
    pub items: Vec<AncestorNode<P>>,
}

impl<P: ElementProvider> Ancestry<P> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Walk upward from `target` as far as the provider allows.
    ///
    /// The walk stops at the root, at the first provider failure, at the
    /// depth guard, or when a parent turns out to be the very element it was
    /// asked about. In that last case the duplicate handle is released on the
    /// spot.
    pub fn walk(provider: &Arc<P>, target: &OwnedHandle<P>, target_data: &ElementData) -> Result<Self, ScanError> {
        let mut items: Vec<AncestorNode<P>> = Vec::new();

        while items.len() < MAX_ANCESTOR_DEPTH {
            let (current, current_data) = match items.last() {
                Some(node) => (&node.handle, &node.data),
                None => (target, target_data),
            };

            let parent = match provider.parent(current.get()) {
                Ok(Some(handle)) => OwnedHandle::new(Arc::clone(provider), handle),
                Ok(None) => break,
                Err(err) => {
                    stop_or_fail(err, "parent")?;
                    break;
                }
            };

            let mut data = ElementData::default();
            if let Err(err) = provider.populate_properties(parent.get(), &mut data) {
                stop_or_fail(err, "ancestor properties")?;
                break;
            }

            if is_same_ui_element(current_data, &data) {
                debug!("Parent of {} is the element itself; ancestry ends here", element_key(current_data));
                parent.release();
                break;
            }

            data.unique_id = -(items.len() as i32) - 1;
            items.push(AncestorNode { handle: parent, data });
        }

        if items.len() == MAX_ANCESTOR_DEPTH {
            warn!("Ancestor walk stopped at the depth guard ({})", MAX_ANCESTOR_DEPTH);
        }

        Ok(Self { items })
    }
}

/// Fatal provider errors end the scan; anything else just ends the walk.
fn stop_or_fail(err: ProviderError, what: &str) -> Result<(), ScanError> {
    if err.is_fatal() {
        return Err(err.into());
    }
    warn!("Ancestor walk stopped, {} lookup failed: {}", what, err);
    Ok(())
}
