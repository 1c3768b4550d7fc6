use super::state::Node;

/// Rebuilds every node's neighbour list from scratch and returns the number of links.
///
/// Plain O(n²) scan over unordered pairs. The node counts involved stay in the low
/// hundreds, where a spatial index would cost more than it saves.
pub(super) fn rebuild_connections(nodes: &mut [Node], connection_distance: f32) -> usize {
    for node in nodes.iter_mut() {
        node.connections.clear();
    }

    let threshold_sq = connection_distance * connection_distance;
    let mut links = 0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let distance_sq = (nodes[i].position - nodes[j].position).length_sq();
            if distance_sq < threshold_sq {
                nodes[i].connections.push(j);
                nodes[j].connections.push(i);
                links += 1;
            }
        }
    }

    links
}
