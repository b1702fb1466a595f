//! Ordering of related nodes by connectivity.

use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
};

use schemascope_core::{identifier::Id, schema::SchemaNode};

/// Counts, for every node, how many other nodes of the same slice it is
/// connected to.
///
/// Two nodes are connected when either one has an entry typed as the other.
/// Each neighbour counts once no matter how many entries point at it.
pub fn connection_counts(nodes: &[SchemaNode]) -> Vec<usize> {
    let mut by_name: HashMap<Id, Vec<usize>> = HashMap::new();
    for (index, node) in nodes.iter().enumerate() {
        by_name.entry(node.name()).or_default().push(index);
    }

    let mut pairs: HashSet<(usize, usize)> = HashSet::new();
    for (index, node) in nodes.iter().enumerate() {
        for target in node.referenced_types() {
            let Some(targets) = by_name.get(&target) else {
                continue;
            };
            for &other in targets {
                if other != index {
                    pairs.insert((index.min(other), index.max(other)));
                }
            }
        }
    }

    let mut counts = vec![0; nodes.len()];
    for (a, b) in pairs {
        counts[a] += 1;
        counts[b] += 1;
    }
    counts
}

/// Orders nodes by descending connection count.
///
/// The sort is stable: nodes with the same count keep their input order.
pub fn sort_by_connections(nodes: Vec<SchemaNode>) -> Vec<SchemaNode> {
    let counts = connection_counts(&nodes);
    let mut keyed: Vec<(usize, SchemaNode)> = counts.into_iter().zip(nodes).collect();
    keyed.sort_by_key(|(count, _)| Reverse(*count));
    keyed.into_iter().map(|(_, node)| node).collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use schemascope_core::schema::{Field, NodeKind, TypeRef};

    use super::*;

    fn node(name: &str, refs: &[&str]) -> SchemaNode {
        let fields = refs
            .iter()
            .enumerate()
            .map(|(i, r)| Field::new(format!("f{i}"), TypeRef::named(r)))
            .collect();
        SchemaNode::new(Id::new("schema"), name, NodeKind::Object).with_fields(fields)
    }

    fn names(nodes: &[SchemaNode]) -> Vec<String> {
        nodes.iter().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn test_counts_both_directions_once() {
        let nodes = vec![
            node("A", &["B", "B"]),
            node("B", &["A"]),
            node("C", &["A"]),
        ];
        assert_eq!(connection_counts(&nodes), vec![2, 1, 1]);
    }

    #[test]
    fn test_references_outside_the_set_do_not_count() {
        let nodes = vec![node("A", &["Missing"]), node("B", &[])];
        assert_eq!(connection_counts(&nodes), vec![0, 0]);
    }

    #[test]
    fn test_self_reference_does_not_count() {
        let nodes = vec![node("A", &["A"])];
        assert_eq!(connection_counts(&nodes), vec![0]);
    }

    #[test]
    fn test_most_connected_first() {
        let nodes = vec![
            node("Lonely", &[]),
            node("Hub", &["Spoke1", "Spoke2"]),
            node("Spoke1", &[]),
            node("Spoke2", &[]),
        ];
        let sorted = sort_by_connections(nodes);
        assert_eq!(names(&sorted), ["Hub", "Spoke1", "Spoke2", "Lonely"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let nodes = vec![node("C", &[]), node("A", &[]), node("B", &[])];
        let sorted = sort_by_connections(nodes);
        assert_eq!(names(&sorted), ["C", "A", "B"]);
    }

    proptest! {
        #[test]
        fn prop_sort_is_a_permutation(edges in prop::collection::vec((0usize..6, 0usize..6), 0..12)) {
            let names = ["N0", "N1", "N2", "N3", "N4", "N5"];
            let nodes: Vec<SchemaNode> = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let refs: Vec<&str> = edges
                        .iter()
                        .filter(|(from, _)| *from == i)
                        .map(|(_, to)| names[*to])
                        .collect();
                    node(name, &refs)
                })
                .collect();

            let sorted = sort_by_connections(nodes.clone());
            prop_assert_eq!(sorted.len(), nodes.len());
            for n in &nodes {
                prop_assert!(sorted.iter().any(|s| s.id() == n.id()));
            }

            let counts = connection_counts(&nodes);
            let sorted_counts: Vec<usize> = sorted
                .iter()
                .map(|s| {
                    let index = nodes.iter().position(|n| n.id() == s.id()).unwrap();
                    counts[index]
                })
                .collect();
            prop_assert!(sorted_counts.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
