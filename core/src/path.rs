use crate::graph::NodeId;

/// Walk predecessor links from `destination` back to `source`.
///
/// Returns the nodes in travel order, both endpoints included. Returns
/// None when the chain breaks before reaching `source`, or when it runs
/// longer than the node count (a cycle in the labels).
pub fn reconstruct_path(
    predecessor: &[Option<NodeId>],
    source: NodeId,
    destination: NodeId,
) -> Option<Vec<NodeId>> {
    if source >= predecessor.len() || destination >= predecessor.len() {
        return None;
    }

    let mut path = vec![destination];
    let mut current = destination;

    while current != source {
        current = predecessor[current]?;
        path.push(current);
        if path.len() > predecessor.len() {
            return None;
        }
    }

    path.reverse();
    Some(path)
}
