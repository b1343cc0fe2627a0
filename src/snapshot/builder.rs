use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::element::{Element, ElementData, ElementTree, NodeIndex};
use crate::error::{ProviderError, ScanError};
use crate::rules::{RuleRunner, RunResult};
use crate::snapshot::ancestry::Ancestry;
use crate::snapshot::cancel::CancellationToken;
use crate::snapshot::counter::BoundedCounter;
use crate::snapshot::provider::{ElementProvider, OwnedHandle};

pub const DEFAULT_MAX_ELEMENTS: usize = 20_000;

/// How the snapshot is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Minimal properties during the walk, full properties in parallel
    /// afterwards. Rules run on demand through [`Snapshot::evaluate`].
    #[default]
    Live,
    /// Full properties and rule evaluation in one parallel pass, with a
    /// sequential retry for nodes the parallel pass could not populate.
    Test,
}

/// How handles are given back when a snapshot is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalStrategy {
    /// Parallel for Live snapshots, sequential for Test snapshots.
    #[default]
    Auto,
    Parallel,
    Sequential,
}

// ============================================================================
// Builder
// ============================================================================

pub struct SnapshotBuilder<P: ElementProvider> {
    provider: Arc<P>,
    max_elements: usize,
    mode: ScanMode,
    disposal: DisposalStrategy,
}

impl<P: ElementProvider> SnapshotBuilder<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            max_elements: DEFAULT_MAX_ELEMENTS,
            mode: ScanMode::default(),
            disposal: DisposalStrategy::default(),
        }
    }

    /// Upper bound on captured elements; the target counts toward it along
    /// with its ancestors.
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_disposal(mut self, disposal: DisposalStrategy) -> Self {
        self.disposal = disposal;
        self
    }

    /// The strategy a snapshot built now would tear down with. Never `Auto`.
    pub fn resolved_disposal(&self) -> DisposalStrategy {
        if !self.provider.supports_concurrent_release() {
            return DisposalStrategy::Sequential;
        }
        match (self.disposal, self.mode) {
            (DisposalStrategy::Auto, ScanMode::Live) => DisposalStrategy::Parallel,
            (DisposalStrategy::Auto, ScanMode::Test) => DisposalStrategy::Sequential,
            (explicit, _) => explicit,
        }
    }

    /// Capture the target, its ancestors and as many descendants as the
    /// element bound allows.
    ///
    /// The snapshot takes ownership of `target`. On error every handle
    /// acquired so far has been released by the time this returns.
    pub fn build(
        &self,
        target: P::Handle,
        runner: &RuleRunner,
        token: &CancellationToken,
    ) -> Result<Snapshot<P>, ScanError> {
        let target = OwnedHandle::new(Arc::clone(&self.provider), target);
        if self.max_elements == 0 {
            return Err(ScanError::parameter("max_elements", "must be at least 1"));
        }

        // ---- Ancestors ----
        token.check()?;
        let mut target_data = ElementData::default();
        if let Err(err) = self.provider.populate_properties(target.get(), &mut target_data) {
            contain(err, "target properties")?;
        }
        target_data.unique_id = 0;

        let ancestry = Ancestry::walk(&self.provider, &target, &target_data)?;
        let counter = BoundedCounter::new(self.max_elements);
        if !counter.try_add(ancestry.len() + 1) {
            warn!(
                "Target and its {} ancestors already exceed the element bound of {}",
                ancestry.len(),
                self.max_elements
            );
        }

        let mut snapshot = Snapshot::new(self.mode, self.resolved_disposal());
        let mut parent = None;
        for node in ancestry.items.into_iter().rev() {
            parent = Some(snapshot.push(parent, node.data, node.handle));
        }
        snapshot.target = snapshot.push(parent, target_data, target);

        // ---- Descendants ----
        token.check()?;
        self.walk_descendants(&mut snapshot, &counter)?;
        snapshot.upper_bound_exceeded = counter.upper_bound_exceeded();
        if snapshot.upper_bound_exceeded {
            warn!(
                "Element bound of {} exceeded ({} elements requested); snapshot is partial",
                self.max_elements,
                counter.attempted()
            );
        }

        // ---- Population ----
        self.populate_all(&mut snapshot, token)?;
        if self.mode == ScanMode::Test {
            self.retry_unpopulated(&mut snapshot, token)?;
            snapshot.evaluate(runner, token)?;
        }

        info!(
            "Snapshot captured {} elements ({} ancestors, mode {:?})",
            snapshot.len(),
            snapshot.target,
            self.mode
        );
        Ok(snapshot)
    }

    /// Depth-first, pre-order walk below the target. Ids count up from 1.
    /// The walk ends at the first node the counter refuses; handles still
    /// pending at that point are released.
    fn walk_descendants(&self, snapshot: &mut Snapshot<P>, counter: &BoundedCounter) -> Result<(), ScanError> {
        let first = self.navigate(self.provider.first_child(snapshot.handles[snapshot.target].get()))?;
        let mut pending: Vec<(NodeIndex, Option<OwnedHandle<P>>)> = vec![(snapshot.target, first)];
        let mut next_id = 1;

        while let Some((parent, candidate)) = pending.pop() {
            let Some(handle) = candidate else { continue };
            if !counter.try_increment() {
                debug!("Element bound reached below element {}", snapshot.tree.element(parent).unique_id);
                break;
            }

            let mut data = ElementData::default();
            if self.mode == ScanMode::Live {
                if let Err(err) = self.provider.populate_properties(handle.get(), &mut data) {
                    contain(err, "element properties")?;
                }
            }
            data.unique_id = next_id;
            next_id += 1;

            let sibling = self.navigate(self.provider.next_sibling(handle.get()))?;
            let child = self.navigate(self.provider.first_child(handle.get()))?;
            let index = snapshot.push(Some(parent), data, handle);
            pending.push((parent, sibling));
            pending.push((index, child));
        }
        Ok(())
    }

    fn navigate(&self, lookup: Result<Option<P::Handle>, ProviderError>) -> Result<Option<OwnedHandle<P>>, ScanError> {
        match lookup {
            Ok(handle) => Ok(handle.map(|h| OwnedHandle::new(Arc::clone(&self.provider), h))),
            Err(err) => {
                contain(err, "tree walk")?;
                Ok(None)
            }
        }
    }

    fn populate_all(&self, snapshot: &mut Snapshot<P>, token: &CancellationToken) -> Result<(), ScanError> {
        token.check()?;
        let provider = &self.provider;
        let Snapshot { tree, handles, .. } = snapshot;

        let outcome = tree.nodes_mut().par_iter_mut().zip(handles.par_iter()).try_for_each(|(node, handle)| {
            token.check()?;
            let unique_id = node.data.unique_id;
            let populated = provider.populate_all_properties_with_live_data(handle.get(), &mut node.data);
            node.data.unique_id = unique_id;
            match populated {
                Ok(()) => Ok(()),
                Err(err) => contain(err, "full properties"),
            }
        });
        coherent(outcome, token)
    }

    /// Nodes whose property bag is still empty get one more, sequential try.
    fn retry_unpopulated(&self, snapshot: &mut Snapshot<P>, token: &CancellationToken) -> Result<(), ScanError> {
        token.check()?;
        let Snapshot { tree, handles, .. } = snapshot;

        for (node, handle) in tree.nodes_mut().iter_mut().zip(handles.iter()) {
            if node.data.has_full_properties() {
                continue;
            }
            let unique_id = node.data.unique_id;
            debug!("Retrying property population for element {}", unique_id);
            let populated = self.provider.populate_all_properties_with_live_data(handle.get(), &mut node.data);
            node.data.unique_id = unique_id;
            if let Err(err) = populated {
                contain(err, "full properties retry")?;
            }
        }
        Ok(())
    }
}

/// Per-node provider failures leave the node's data absent. Fatal ones end
/// the scan.
fn contain(err: ProviderError, what: &str) -> Result<(), ScanError> {
    if err.is_fatal() {
        return Err(err.into());
    }
    warn!("Provider call for {} failed: {}", what, err);
    Ok(())
}

/// Any failure out of a parallel pass becomes one `Cancelled` when the scan
/// was cancelled.
fn coherent<T>(outcome: Result<T, ScanError>, token: &CancellationToken) -> Result<T, ScanError> {
    match outcome {
        Err(_) if token.is_cancelled() => Err(ScanError::Cancelled),
        other => other,
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Captured subtree of one scan: ancestors, target and descendants.
///
/// Owns one provider handle per element and gives them all back on drop.
pub struct Snapshot<P: ElementProvider> {
    tree: ElementTree,
    handles: Vec<OwnedHandle<P>>,
    results: Vec<Vec<RunResult>>,
    by_id: BTreeMap<i32, NodeIndex>,
    target: NodeIndex,
    upper_bound_exceeded: bool,
    mode: ScanMode,
    disposal: DisposalStrategy,
}

impl<P: ElementProvider> Snapshot<P> {
    fn new(mode: ScanMode, disposal: DisposalStrategy) -> Self {
        Self {
            tree: ElementTree::new(),
            handles: Vec::new(),
            results: Vec::new(),
            by_id: BTreeMap::new(),
            target: 0,
            upper_bound_exceeded: false,
            mode,
            disposal,
        }
    }

    fn push(&mut self, parent: Option<NodeIndex>, data: ElementData, handle: OwnedHandle<P>) -> NodeIndex {
        let unique_id = data.unique_id;
        let index = match parent {
            Some(parent) => self.tree.add_child(parent, data),
            None => self.tree.push(data),
        };
        self.handles.push(handle);
        self.results.push(Vec::new());
        self.by_id.insert(unique_id, index);
        index
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// The top-most captured ancestor, or the target when it has none.
    pub fn root(&self) -> Element<'_> {
        self.tree.element(0)
    }

    pub fn target(&self) -> Element<'_> {
        self.tree.element(self.target)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn element(&self, unique_id: i32) -> Option<Element<'_>> {
        self.by_id.get(&unique_id).map(|&i| self.tree.element(i))
    }

    pub fn elements_by_id(&self) -> BTreeMap<i32, Element<'_>> {
        self.by_id.iter().map(|(&id, &i)| (id, self.tree.element(i))).collect()
    }

    pub fn results(&self, unique_id: i32) -> &[RunResult] {
        self.by_id.get(&unique_id).map(|&i| self.results[i].as_slice()).unwrap_or_default()
    }

    /// Target and descendants with their results, in unique id order.
    pub fn evaluated(&self) -> impl Iterator<Item = (Element<'_>, &[RunResult])> {
        (self.target..self.tree.len()).map(move |i| (self.tree.element(i), self.results[i].as_slice()))
    }

    pub fn upper_bound_exceeded(&self) -> bool {
        self.upper_bound_exceeded
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn disposal(&self) -> DisposalStrategy {
        self.disposal
    }

    /// Run exclusion then inclusion rules on the target and every descendant,
    /// in parallel. Ancestors are context only and are not evaluated.
    /// Previous results are replaced.
    pub fn evaluate(&mut self, runner: &RuleRunner, token: &CancellationToken) -> Result<(), ScanError> {
        token.check()?;
        let tree = &self.tree;
        let outcome: Result<Vec<Vec<RunResult>>, ScanError> = (self.target..tree.len())
            .into_par_iter()
            .map(|i| runner.run_for_element(tree.element(i), token))
            .collect();
        let evaluated = coherent(outcome, token)?;

        for (offset, results) in evaluated.into_iter().enumerate() {
            self.results[self.target + offset] = results;
        }
        Ok(())
    }
}

impl<P: ElementProvider> Drop for Snapshot<P> {
    fn drop(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        debug!("Releasing {} handles ({:?})", handles.len(), self.disposal);
        match self.disposal {
            DisposalStrategy::Sequential => handles.into_iter().for_each(drop),
            DisposalStrategy::Parallel | DisposalStrategy::Auto => handles.into_par_iter().for_each(drop),
        }
    }
}
