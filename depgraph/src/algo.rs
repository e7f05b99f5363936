//! Graph algorithms over [`GraphView`] snapshots.
//!
//! All functions operate on snapshot indices; callers map indices back to
//! tree nodes through the view. The long-running computations take a
//! cancellation token which is checked at each outer iteration; on
//! cancellation they fail with [`Error::Cancelled`] and produce no partial
//! result.

use std::collections::BTreeSet;

use cancel::Token;

use crate::{Error, GraphView};

/// The direction arcs are followed during reachability.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    /// Follow arcs from source to target.
    Successors,

    /// Follow arcs from target to source.
    Predecessors,
}

/// The strongly connected components of the snapshot.
///
/// Every node appears in exactly one component; nodes not on any cycle
/// form components of size 1. Components are sorted by descending size,
/// ties broken towards the component holding the smallest index; each
/// component's members are ascending.
pub fn strongly_connected(view: &GraphView, token: &Token) -> Result<Vec<Vec<usize>>, Error> {
    let mut components = tarjan(view, token)?;
    components.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
    Ok(components)
}

/// The subgraph induced by the union of components of size two or more.
///
/// Arcs crossing between components are dropped; inside each component all
/// original arcs are preserved.
pub fn cycle_subgraph(view: &GraphView, token: &Token) -> Result<GraphView, Error> {
    let components = tarjan(view, token)?;
    let mut assignment = vec![usize::MAX; view.len()];
    let mut keep = BTreeSet::new();
    for (component_id, component) in components.iter().enumerate() {
        for &member in component {
            assignment[member] = component_id;
        }
        if component.len() >= 2 {
            keep.extend(component.iter().copied());
        }
    }
    Ok(view.restrict(&keep, |source, target| assignment[source] == assignment[target]))
}

/// For every node, the set of nodes reachable from it.
///
/// A node is a member of its own reach set only when it lies on a cycle.
pub fn transitive_closure(view: &GraphView, token: &Token) -> Result<Vec<BTreeSet<usize>>, Error> {
    let components = tarjan(view, token)?;
    let mut assignment = vec![usize::MAX; view.len()];
    for (component_id, component) in components.iter().enumerate() {
        for &member in component {
            assignment[member] = component_id;
        }
    }

    // The Tarjan pass emits a component only after everything reachable
    // from it, so one forward pass over the emission order can accumulate
    // full reach sets from the successor components.
    let mut reach: Vec<BTreeSet<usize>> = Vec::with_capacity(components.len());
    for (component_id, component) in components.iter().enumerate() {
        if token.check_cancel().is_err() {
            return Err(Error::Cancelled);
        }
        let mut set = BTreeSet::new();
        if component.len() >= 2 {
            set.extend(component.iter().copied());
        }
        for &member in component {
            for &target in view.successors(member) {
                let successor = assignment[target];
                if successor == component_id {
                    continue;
                }
                set.extend(components[successor].iter().copied());
                set.extend(reach[successor].iter().copied());
            }
        }
        reach.push(set);
    }

    Ok((0..view.len())
        .map(|node| reach[assignment[node]].clone())
        .collect())
}

/// The indices reachable from `seeds` by following arcs in `direction`,
/// the seeds themselves included.
pub fn reachable(
    view: &GraphView,
    seeds: impl IntoIterator<Item = usize>,
    direction: Direction,
) -> BTreeSet<usize> {
    let mut result = BTreeSet::new();
    let mut stack = Vec::new();
    for seed in seeds {
        if result.insert(seed) {
            stack.push(seed);
        }
    }
    while let Some(node) = stack.pop() {
        let next = match direction {
            Direction::Successors => view.successors(node),
            Direction::Predecessors => view.predecessors(node),
        };
        for &target in next {
            if result.insert(target) {
                stack.push(target);
            }
        }
    }
    result
}

/// The ratio of arcs present to arcs possible: `m / (n * (n - 1))`.
///
/// Undefined for graphs of fewer than two nodes.
pub fn edge_density(view: &GraphView) -> Result<f64, Error> {
    if view.len() < 2 {
        return Err(Error::DegenerateGraph { nodes: view.len() });
    }
    let nodes = view.len() as f64;
    Ok(view.arc_count() as f64 / (nodes * (nodes - 1.0)))
}

/// The edge density of the transitive closure.
pub fn transitive_edge_density(view: &GraphView, token: &Token) -> Result<f64, Error> {
    if view.len() < 2 {
        return Err(Error::DegenerateGraph { nodes: view.len() });
    }
    let closure = transitive_closure(view, token)?;
    let mut arcs = 0usize;
    for (node, targets) in closure.iter().enumerate() {
        arcs += targets.len();
        if targets.contains(&node) {
            arcs -= 1;
        }
    }
    let nodes = view.len() as f64;
    Ok(arcs as f64 / (nodes * (nodes - 1.0)))
}

/// The subgraph induced by everything reachable from `node`: forward when
/// `use_successors`, backward otherwise. The origin is always included.
pub fn implied_by(view: &GraphView, node: usize, use_successors: bool) -> GraphView {
    let direction = if use_successors {
        Direction::Successors
    } else {
        Direction::Predecessors
    };
    let keep = reachable(view, [node], direction);
    view.restrict(&keep, |_, _| true)
}

const UNVISITED: usize = usize::MAX;

struct TarjanState {
    index: Vec<usize>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

/// Iterative Tarjan; components come out in reverse topological order of
/// the condensation, each sorted ascending.
fn tarjan(view: &GraphView, token: &Token) -> Result<Vec<Vec<usize>>, Error> {
    let count = view.len();
    let mut state = TarjanState {
        index: vec![UNVISITED; count],
        low: vec![0; count],
        on_stack: vec![false; count],
        stack: Vec::new(),
        next_index: 0,
        components: Vec::new(),
    };

    for root in 0..count {
        if token.check_cancel().is_err() {
            return Err(Error::Cancelled);
        }
        if state.index[root] == UNVISITED {
            visit(view, root, &mut state);
        }
    }

    Ok(state.components)
}

/// One depth-first pass, kept iterative: each frame is a node plus the
/// offset of the next successor to consider.
fn visit(view: &GraphView, root: usize, state: &mut TarjanState) {
    let mut frames = vec![(root, 0usize)];
    while let Some((node, offset)) = frames.pop() {
        if offset == 0 {
            state.index[node] = state.next_index;
            state.low[node] = state.next_index;
            state.next_index += 1;
            state.stack.push(node);
            state.on_stack[node] = true;
        } else {
            // Returning from the visit of the previous successor.
            let finished = view.successors(node)[offset - 1];
            state.low[node] = state.low[node].min(state.low[finished]);
        }

        let successors = view.successors(node);
        let mut offset = offset;
        let mut descended = false;
        while offset < successors.len() {
            let next = successors[offset];
            offset += 1;
            if state.index[next] == UNVISITED {
                frames.push((node, offset));
                frames.push((next, 0));
                descended = true;
                break;
            }
            if state.on_stack[next] {
                state.low[node] = state.low[node].min(state.index[next]);
            }
        }
        if descended {
            continue;
        }

        if state.low[node] == state.index[node] {
            let mut component = Vec::new();
            while let Some(member) = state.stack.pop() {
                state.on_stack[member] = false;
                component.push(member);
                if member == node {
                    break;
                }
            }
            component.sort_unstable();
            state.components.push(component);
        }
    }
}
