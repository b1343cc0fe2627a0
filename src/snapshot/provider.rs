use std::fmt;
use std::sync::Arc;

use crate::element::ElementData;
use crate::error::ProviderError;

/// Navigation and property access over an external accessibility tree.
///
/// Every call may block, may be slow and may fail. Handles are external
/// resources: each one handed out must come back through [`release`] exactly
/// once, which [`OwnedHandle`] takes care of.
///
/// [`release`]: ElementProvider::release
pub trait ElementProvider: Send + Sync {
    type Handle: Send + Sync;

    fn parent(&self, node: &Self::Handle) -> Result<Option<Self::Handle>, ProviderError>;

    fn first_child(&self, node: &Self::Handle) -> Result<Option<Self::Handle>, ProviderError>;

    fn next_sibling(&self, node: &Self::Handle) -> Result<Option<Self::Handle>, ProviderError>;

    /// Fill the identity attributes needed to compare nodes: runtime id,
    /// control type, name and bounding rectangle at least.
    fn populate_properties(&self, node: &Self::Handle, data: &mut ElementData) -> Result<(), ProviderError>;

    /// Fill every attribute from the live tree. On success `data.properties`
    /// is `Some`.
    fn populate_all_properties_with_live_data(
        &self,
        node: &Self::Handle,
        data: &mut ElementData,
    ) -> Result<(), ProviderError>;

    fn release(&self, node: Self::Handle);

    /// Whether handles may be released from several threads at once.
    fn supports_concurrent_release(&self) -> bool {
        true
    }
}

// ============================================================================
// Owned handle
// ============================================================================

/// A provider handle that is released when dropped.
///
/// `release` consumes the wrapper, so a handle can be given back at most once.
pub struct OwnedHandle<P: ElementProvider> {
    provider: Arc<P>,
    handle: Option<P::Handle>,
}

impl<P: ElementProvider> OwnedHandle<P> {
    pub fn new(provider: Arc<P>, handle: P::Handle) -> Self {
        Self { provider, handle: Some(handle) }
    }

    pub fn get(&self) -> &P::Handle {
        match &self.handle {
            Some(handle) => handle,
            // Only `release` and `drop` take the handle, and both consume self.
            None => unreachable!("provider handle used after release"),
        }
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.provider.release(handle);
        }
    }
}

impl<P: ElementProvider> Drop for OwnedHandle<P> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl<P: ElementProvider> fmt::Debug for OwnedHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedHandle").field("live", &self.handle.is_some()).finish()
    }
}
