//! Unreferenced class and archive detection.

use std::collections::BTreeSet;

use getset::Getters;
use log::debug;

use crate::tree::{ContainerKind, NodeId, NodeKind, Tree};
use crate::Filter;

/// The outcome of a reference check.
#[derive(Clone, Debug, Default, Getters)]
pub struct ReferenceReport {
    /// Focus classes that no entry point reaches.
    #[getset(get = "pub")]
    unreferenced_classes: Vec<NodeId>,

    /// Non-focus archives none of whose classes any entry point reaches.
    /// An archive without classes is trivially unreferenced.
    #[getset(get = "pub")]
    unreferenced_archives: Vec<NodeId>,

    /// The entry point classes the reachability was seeded with.
    #[getset(get = "pub")]
    entry_points: Vec<NodeId>,
}

/// Compute unreferenced classes and archives.
///
/// Seeds are the explicitly named entry points plus every class with a
/// detected `main` method. Reachability runs at class granularity on the
/// resolved raw references; the collapse state plays no part. Non-focus
/// classes participate in the graph but are taken for granted, so only
/// focus classes are ever reported.
pub fn unreferenced(tree: &Tree, filter: &Filter, explicit_entries: &[String]) -> ReferenceReport {
    let mut entry_points: BTreeSet<NodeId> = explicit_entries
        .iter()
        .filter_map(|name| tree.class_by_name(name))
        .collect();
    for class in tree.classes() {
        if tree.is_entry_point(class) {
            entry_points.insert(class);
        }
    }
    debug!("seeding reachability from {} entry point(s)", entry_points.len());

    let mut reached = entry_points.clone();
    let mut stack: Vec<NodeId> = entry_points.iter().copied().collect();
    while let Some(class) = stack.pop() {
        for &target in tree.class_references(class) {
            if reached.insert(target) {
                stack.push(target);
            }
        }
    }

    let unreferenced_classes = tree
        .classes()
        .filter(|class| !reached.contains(class))
        .filter(|class| filter.in_focus(&tree.qualified_name(*class)))
        .collect();

    let unreferenced_archives = tree
        .children(tree.root())
        .filter(|node| matches!(tree.kind(*node), NodeKind::Container(ContainerKind::Archive)))
        .filter(|node| !filter.in_focus(&tree.qualified_name(*node)))
        .filter(|node| {
            tree.subtree_classes(*node)
                .iter()
                .all(|class| !reached.contains(class))
        })
        .collect();

    ReferenceReport {
        unreferenced_classes,
        unreferenced_archives,
        entry_points: entry_points.into_iter().collect(),
    }
}
