//! Property-based tests for dagnode using proptest.
//!
//! Graphs are generated as random DAGs: node `i` may only depend on nodes
//! with a smaller index, which rules out cycles by construction.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use dagnode::prelude::*;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Strategy producing a node count and a list of (dependent, dependency)
/// index pairs with dependent > dependency.
fn arb_dag(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_nodes).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..n * 2).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.max(b), a.min(b)))
                .collect::<Vec<_>>()
        });
        (Just(n), edges)
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> Vec<GraphNode<usize>> {
    let nodes: Vec<GraphNode<usize>> = (0..n).map(|i| GraphNode::new(i as u64, i)).collect();
    for &(dependent, dependency) in edges {
        nodes[dependent].add_dependency(&nodes[dependency]).unwrap();
    }
    nodes
}

fn dependency_ids(node: &GraphNode<usize>) -> Vec<NodeId> {
    node.dependencies().iter().map(|n| n.id().clone()).collect()
}

/// Every node of `start`'s connected graph, keyed by id.
fn component(start: &GraphNode<usize>) -> HashMap<NodeId, GraphNode<usize>> {
    let mut nodes = HashMap::new();
    start.traverse_with(
        |node, _| {
            nodes.insert(node.id().clone(), node.clone());
        },
        |node| {
            let mut next = node.dependents();
            next.extend(node.dependencies());
            next
        },
    );
    nodes
}

/// Indices reachable from `start` through dependents, computed from the
/// edge list alone.
fn reachable_by_edges(start: usize, n: usize, edges: &[(usize, usize)]) -> Vec<bool> {
    let mut reached = vec![false; n];
    reached[start] = true;
    // dependents always carry a larger index than their dependencies
    for i in start + 1..n {
        reached[i] = edges.iter().any(|&(dependent, dependency)| dependent == i && reached[dependency]);
    }
    reached
}

/// Close `marked` over dependencies using the edge list.
fn with_dependencies(mut marked: Vec<bool>, edges: &[(usize, usize)]) -> Vec<bool> {
    for i in (0..marked.len()).rev() {
        if marked[i] {
            for &(dependent, dependency) in edges {
                if dependent == i {
                    marked[dependency] = true;
                }
            }
        }
    }
    marked
}

/// Indices connected to `start` ignoring edge direction.
fn connected_by_edges(start: usize, n: usize, edges: &[(usize, usize)]) -> Vec<bool> {
    let mut connected = vec![false; n];
    connected[start] = true;
    let mut changed = true;
    while changed {
        changed = false;
        for &(a, b) in edges {
            if connected[a] != connected[b] {
                connected[a] = true;
                connected[b] = true;
                changed = true;
            }
        }
    }
    connected
}

fn ids_of(marked: &[bool]) -> HashSet<NodeId> {
    marked
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m)
        .map(|(i, _)| NodeId::from(i as u64))
        .collect()
}

fn release(nodes: &[GraphNode<usize>]) {
    for node in nodes {
        node.dispose();
    }
}

// ---------------------------------------------------------------------------
// Edge invariants
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn edges_are_reciprocal((n, edges) in arb_dag(10)) {
        let nodes = build(n, &edges);
        for node in &nodes {
            for dependency in node.dependencies() {
                prop_assert!(dependency.has_dependent(node.id()));
            }
            for dependent in node.dependents() {
                prop_assert!(dependent.has_dependency(node.id()));
            }
        }
        release(&nodes);
    }

    #[test]
    fn repeated_edges_are_ignored((n, edges) in arb_dag(10)) {
        let nodes = build(n, &edges);
        let before: Vec<(usize, usize)> = nodes
            .iter()
            .map(|node| (node.dependency_count(), node.dependent_count()))
            .collect();

        for &(dependent, dependency) in &edges {
            nodes[dependent].add_dependency(&nodes[dependency]).unwrap();
            nodes[dependency].add_dependent(&nodes[dependent]).unwrap();
        }

        let after: Vec<(usize, usize)> = nodes
            .iter()
            .map(|node| (node.dependency_count(), node.dependent_count()))
            .collect();
        prop_assert_eq!(before, after);

        let unique: HashSet<(usize, usize)> = edges.iter().copied().collect();
        let total: usize = nodes.iter().map(|node| node.dependency_count()).sum();
        prop_assert_eq!(total, unique.len());
        release(&nodes);
    }

    #[test]
    fn root_has_no_dependencies((n, edges) in arb_dag(10)) {
        let nodes = build(n, &edges);
        for node in &nodes {
            let root = node.root_node().unwrap();
            prop_assert!(root.is_root());
        }
        release(&nodes);
    }
}

// ---------------------------------------------------------------------------
// Traversal invariants
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn traverse_reports_each_node_once((n, edges) in arb_dag(10)) {
        let nodes = build(n, &edges);
        for direction in [Direction::Dependents, Direction::Dependencies] {
            let ids = nodes[0].collect_ids(direction);
            let unique: HashSet<&NodeId> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
            prop_assert_eq!(&ids[0], nodes[0].id());
        }
        release(&nodes);
    }

    #[test]
    fn path_traversal_counts_every_path((n, edges) in arb_dag(7)) {
        let nodes = build(n, &edges);

        // paths[i] = number of distinct dependent-paths from node 0 to node i
        let mut expected = vec![0usize; n];
        expected[0] = 1;
        for i in 0..n {
            for dependent in nodes[i].dependents() {
                let j = *dependent.payload();
                expected[j] += expected[i];
            }
        }

        let mut seen: HashMap<usize, usize> = HashMap::new();
        nodes[0]
            .traverse_paths(
                |node, path| {
                    assert!(path[0].ptr_eq(node));
                    assert_eq!(path.last().unwrap().id(), nodes[0].id());
                    *seen.entry(*node.payload()).or_default() += 1;
                },
                GraphNode::dependents,
            )
            .unwrap();

        for (i, &count) in expected.iter().enumerate() {
            prop_assert_eq!(seen.get(&i).copied().unwrap_or(0), count);
        }
        release(&nodes);
    }
}

// ---------------------------------------------------------------------------
// Clone invariants
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn full_clone_mirrors_connected_graph((n, edges) in arb_dag(10)) {
        let nodes = build(n, &edges);
        let origin = &nodes[n - 1];
        let root = origin.root_node().unwrap();

        let copy = origin.clone_graph().unwrap();
        prop_assert_eq!(copy.id(), origin.id());
        prop_assert!(!copy.ptr_eq(origin));
        let copy_root = copy.root_node().unwrap();
        prop_assert_eq!(copy_root.id(), root.id());

        let copied = component(&copy);
        let copied_ids: HashSet<NodeId> = copied.keys().cloned().collect();
        prop_assert_eq!(copied_ids, ids_of(&connected_by_edges(n - 1, n, &edges)));

        for (id, clone) in &copied {
            let original = &nodes[*clone.payload()];
            prop_assert_eq!(original.id(), id);
            prop_assert!(!clone.ptr_eq(original));
            prop_assert_eq!(dependency_ids(clone), dependency_ids(original));
        }

        copy.dispose();
        release(&nodes);
    }

    #[test]
    fn filtered_clone_keeps_exactly_matches_and_their_dependencies(
        (n, edges) in arb_dag(10),
        keep in prop::collection::vec(any::<bool>(), 10),
    ) {
        let nodes = build(n, &edges);
        // node 0 can have no dependencies, so it is its own root
        let root = &nodes[0];
        let matches = |node: &GraphNode<usize>| keep[*node.payload()];

        let reachable = reachable_by_edges(0, n, &edges);
        let seeds: Vec<bool> = (0..n).map(|i| reachable[i] && keep[i]).collect();
        let expected = ids_of(&with_dependencies(seeds, &edges));

        let copy = root.clone_with_relationships(Some(matches)).unwrap();
        let Some(copy) = copy else {
            prop_assert!(expected.is_empty());
            release(&nodes);
            return Ok(());
        };

        let copied = component(&copy);
        let copied_ids: HashSet<NodeId> = copied.keys().cloned().collect();
        prop_assert_eq!(copied_ids, expected);

        // Retained nodes keep every dependency, in order
        for clone in copied.values() {
            let original = &nodes[*clone.payload()];
            prop_assert_eq!(dependency_ids(clone), dependency_ids(original));
        }

        copy.dispose();
        release(&nodes);
    }

    #[test]
    fn clone_is_independent((n, edges) in arb_dag(10)) {
        let nodes = build(n, &edges);
        let copy = nodes[0].clone_graph().unwrap();
        let before: Vec<usize> = nodes.iter().map(|node| node.dependent_count()).collect();

        copy.add_dependent(&GraphNode::new("extra", 0)).unwrap();

        let after: Vec<usize> = nodes.iter().map(|node| node.dependent_count()).collect();
        prop_assert_eq!(before, after);

        copy.dispose();
        release(&nodes);
    }
}
