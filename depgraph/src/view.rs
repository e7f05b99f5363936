//! A flat, indexed snapshot of the currently visible graph.

use std::collections::{BTreeSet, HashMap};

use crate::tree::{NodeId, Tree};

/// An immutable snapshot of the visible dependency graph.
///
/// Visible nodes carry contiguous indices `0..len`; arcs are adjacency
/// lists of indices with self-arcs removed and duplicates collapsed.
/// Reverse adjacency is derived by one reverse pass at capture time.
///
/// The snapshot records the tree's collapse epoch, so consumers can tell
/// when collapse mutations have made it stale. It is safe to read from
/// several readers at once as long as no collapse mutation runs.
#[derive(Clone, Debug)]
pub struct GraphView {
    epoch: u64,
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    arcs: usize,
}

impl GraphView {
    /// Capture the visible graph strictly below `origin` (usually the tree
    /// root).
    ///
    /// Arcs connect the representatives of the resolved class references;
    /// an arc is kept only when both representatives are part of the
    /// snapshot.
    pub fn capture(tree: &Tree, origin: NodeId) -> Self {
        let nodes = tree.walk_visible(origin);
        let index: HashMap<NodeId, usize> = nodes
            .iter()
            .copied()
            .enumerate()
            .map(|(position, id)| (id, position))
            .collect();

        let mut arcs = BTreeSet::new();
        for class in tree.classes() {
            let Some(&source) = index.get(&tree.representative(class)) else {
                continue;
            };
            for target in tree.class_references(class) {
                let Some(&target) = index.get(&tree.representative(*target)) else {
                    continue;
                };
                if source != target {
                    arcs.insert((source, target));
                }
            }
        }

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        let count = arcs.len();
        for (source, target) in arcs {
            successors[source].push(target);
            predecessors[target].push(source);
        }
        for list in &mut predecessors {
            list.sort_unstable();
        }

        Self {
            epoch: tree.epoch(),
            nodes,
            index,
            successors,
            predecessors,
            arcs: count,
        }
    }

    /// The number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of distinct arcs.
    pub fn arc_count(&self) -> usize {
        self.arcs
    }

    /// The tree collapse epoch the snapshot was captured at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The tree node behind an index.
    pub fn node(&self, index: usize) -> NodeId {
        self.nodes[index]
    }

    /// The index of a tree node, when part of this snapshot.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Successor indices, ascending.
    pub fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    /// Predecessor indices, ascending.
    pub fn predecessors(&self, index: usize) -> &[usize] {
        &self.predecessors[index]
    }

    /// The subgraph induced by `keep`, retaining the arcs between kept
    /// nodes that `keep_arc` accepts. Indices are renumbered; node
    /// identities carry over.
    pub(crate) fn restrict(
        &self,
        keep: &BTreeSet<usize>,
        mut keep_arc: impl FnMut(usize, usize) -> bool,
    ) -> GraphView {
        let nodes: Vec<NodeId> = keep.iter().map(|index| self.nodes[*index]).collect();
        let remap: HashMap<usize, usize> = keep
            .iter()
            .copied()
            .enumerate()
            .map(|(new, old)| (old, new))
            .collect();
        let index = nodes
            .iter()
            .copied()
            .enumerate()
            .map(|(position, id)| (id, position))
            .collect();

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut arcs = 0;
        for &old_source in keep {
            let new_source = remap[&old_source];
            for &old_target in &self.successors[old_source] {
                let Some(&new_target) = remap.get(&old_target) else {
                    continue;
                };
                if !keep_arc(old_source, old_target) {
                    continue;
                }
                successors[new_source].push(new_target);
                predecessors[new_target].push(new_source);
                arcs += 1;
            }
        }
        for list in &mut successors {
            list.sort_unstable();
        }
        for list in &mut predecessors {
            list.sort_unstable();
        }

        GraphView {
            epoch: self.epoch,
            nodes,
            index,
            successors,
            predecessors,
            arcs,
        }
    }
}
