use std::collections::BTreeSet;

use cancel::Token;
use depgraph::algo::{
    cycle_subgraph, edge_density, implied_by, reachable, strongly_connected, transitive_closure,
    transitive_edge_density, Direction,
};
use depgraph::{Error, GraphView, Tree};

use crate::testdata;

fn index(view: &GraphView, tree: &Tree, name: &str) -> usize {
    let id = tree.class_by_name(name).expect("class must exist");
    view.index_of(id).expect("class must be visible")
}

fn names(view: &GraphView, tree: &Tree, indices: &[usize]) -> BTreeSet<String> {
    indices
        .iter()
        .map(|&i| tree.simple_name(view.node(i)).to_owned())
        .collect()
}

#[test]
fn tarjan_partitions_a_simple_cycle() {
    let (tree, container) = testdata::graph_tree(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")],
    );
    let view = GraphView::capture(&tree, container);
    let token = Token::new();

    let components = strongly_connected(&view, &token).expect("components");
    assert_eq!(components.len(), 2);
    assert_eq!(
        names(&view, &tree, &components[0]),
        BTreeSet::from(["A".to_owned(), "B".to_owned(), "C".to_owned()]),
    );
    assert_eq!(
        names(&view, &tree, &components[1]),
        BTreeSet::from(["D".to_owned()]),
    );

    // Every node appears in exactly one component.
    let total: usize = components.iter().map(Vec::len).sum();
    assert_eq!(total, view.len());
}

#[test]
fn cycle_subgraph_keeps_only_intra_component_arcs() {
    let (tree, container) = testdata::graph_tree(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")],
    );
    let view = GraphView::capture(&tree, container);
    let token = Token::new();

    let cycles = cycle_subgraph(&view, &token).expect("cycle subgraph");
    assert_eq!(cycles.len(), 3);
    assert_eq!(cycles.arc_count(), 3);
    assert!(cycles.index_of(tree.class_by_name("D").expect("D")).is_none());
}

#[test]
fn density_counts_arcs_against_possible_arcs() {
    let (tree, container) = testdata::graph_tree(
        &["A", "B", "C", "D"],
        &[
            ("A", "B"),
            ("A", "C"),
            ("A", "D"),
            ("B", "C"),
            ("B", "D"),
            ("C", "D"),
        ],
    );
    let view = GraphView::capture(&tree, container);

    assert_eq!(view.len(), 4);
    assert_eq!(view.arc_count(), 6);
    assert_eq!(edge_density(&view).expect("density"), 0.5);
}

#[test]
fn density_of_a_degenerate_graph_is_an_error() {
    let (tree, container) = testdata::graph_tree(&["A"], &[]);
    let view = GraphView::capture(&tree, container);
    assert!(matches!(
        edge_density(&view),
        Err(Error::DegenerateGraph { nodes: 1 })
    ));
}

#[test]
fn closure_is_transitive_and_excludes_acyclic_selves() {
    let (tree, container) = testdata::graph_tree(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    let view = GraphView::capture(&tree, container);
    let token = Token::new();

    let closure = transitive_closure(&view, &token).expect("closure");
    let a = index(&view, &tree, "A");
    let b = index(&view, &tree, "B");
    let c = index(&view, &tree, "C");

    assert_eq!(closure[a], BTreeSet::from([b, c]));
    assert_eq!(closure[b], BTreeSet::from([c]));
    assert_eq!(closure[c], BTreeSet::new());

    // Direct arcs are members, and reach composes.
    for source in 0..view.len() {
        for &target in view.successors(source) {
            assert!(closure[source].contains(&target));
        }
        for &middle in &closure[source] {
            for &target in &closure[middle] {
                assert!(closure[source].contains(&target));
            }
        }
    }
}

#[test]
fn closure_includes_selves_on_cycles() {
    let (tree, container) = testdata::graph_tree(&["A", "B"], &[("A", "B"), ("B", "A")]);
    let view = GraphView::capture(&tree, container);
    let token = Token::new();

    let closure = transitive_closure(&view, &token).expect("closure");
    let a = index(&view, &tree, "A");
    let b = index(&view, &tree, "B");
    assert_eq!(closure[a], BTreeSet::from([a, b]));
    assert_eq!(closure[b], BTreeSet::from([a, b]));
}

#[test]
fn transitive_density_measures_the_closure() {
    let (tree, container) = testdata::graph_tree(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    let view = GraphView::capture(&tree, container);
    let token = Token::new();

    // Closure arcs: A->B, A->C, B->C.
    assert_eq!(
        transitive_edge_density(&view, &token).expect("density"),
        0.5
    );
}

#[test]
fn reachability_follows_either_direction() {
    let (tree, container) =
        testdata::graph_tree(&["A", "B", "C", "X"], &[("A", "B"), ("B", "C"), ("X", "C")]);
    let view = GraphView::capture(&tree, container);
    let a = index(&view, &tree, "A");
    let b = index(&view, &tree, "B");
    let c = index(&view, &tree, "C");
    let x = index(&view, &tree, "X");

    let forward = reachable(&view, [a], Direction::Successors);
    assert_eq!(forward, BTreeSet::from([a, b, c]));

    let backward = reachable(&view, [c], Direction::Predecessors);
    assert_eq!(backward, BTreeSet::from([a, b, c, x]));
}

#[test]
fn implied_by_restricts_to_the_reachable_side() {
    let (tree, container) = testdata::graph_tree(
        &["A", "B", "C", "X", "Y"],
        &[("A", "B"), ("B", "C"), ("X", "Y")],
    );
    let view = GraphView::capture(&tree, container);
    let b = index(&view, &tree, "B");

    let forward = implied_by(&view, b, true);
    assert_eq!(forward.len(), 2);
    assert_eq!(forward.arc_count(), 1);
    assert!(forward.index_of(tree.class_by_name("B").expect("B")).is_some());
    assert!(forward.index_of(tree.class_by_name("C").expect("C")).is_some());

    let backward = implied_by(&view, b, false);
    assert_eq!(backward.len(), 2);
    assert_eq!(backward.arc_count(), 1);
    assert!(backward.index_of(tree.class_by_name("A").expect("A")).is_some());
    assert!(backward.index_of(tree.class_by_name("B").expect("B")).is_some());
}

#[test]
fn capture_is_stable_for_identical_collapse_state() {
    let (tree, container) = testdata::graph_tree(
        &["A", "B", "C"],
        &[("A", "B"), ("B", "C"), ("C", "A")],
    );
    let first = GraphView::capture(&tree, container);
    let second = GraphView::capture(&tree, container);

    assert_eq!(first.len(), second.len());
    assert_eq!(first.arc_count(), second.arc_count());
    for node in 0..first.len() {
        assert_eq!(first.node(node), second.node(node));
        assert_eq!(first.successors(node), second.successors(node));
        assert_eq!(first.predecessors(node), second.predecessors(node));
    }
}

#[test]
fn cancellation_aborts_long_computations() {
    let (tree, container) = testdata::graph_tree(&["A", "B"], &[("A", "B")]);
    let view = GraphView::capture(&tree, container);
    let token = Token::new();
    token.cancel();

    assert!(matches!(
        strongly_connected(&view, &token),
        Err(Error::Cancelled)
    ));
    assert!(matches!(
        transitive_closure(&view, &token),
        Err(Error::Cancelled)
    ));
    assert!(matches!(
        transitive_edge_density(&view, &token),
        Err(Error::Cancelled)
    ));
}
