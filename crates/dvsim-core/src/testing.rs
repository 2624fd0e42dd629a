use crate::topology::{Link, NodeId};

/// 0-1=1, 1-2=1, 0-2=4. The direct 0-2 link loses to the two-hop path via 1.
pub(crate) fn triangle_config() -> (Vec<NodeId>, Vec<Link>) {
    let ids = (0..3).map(NodeId::new).collect::<Vec<_>>();
    let links = vec![
        Link::new(ids[0], ids[1], 1),
        Link::new(ids[1], ids[2], 1),
        Link::new(ids[0], ids[2], 4),
    ];
    (ids, links)
}

/// A chain 0-1-...-(n-1) with unit costs. Information needs n-1 rounds to cross it.
pub(crate) fn line_config(n: usize) -> (Vec<NodeId>, Vec<Link>) {
    let ids = (0..n).map(NodeId::new).collect::<Vec<_>>();
    let links = ids
        .windows(2)
        .map(|pair| Link::new(pair[0], pair[1], 1))
        .collect();
    (ids, links)
}

/// Two equal-cost two-hop paths from 0 to 3: via 1 and via 2.
pub(crate) fn square_config() -> (Vec<NodeId>, Vec<Link>) {
    let ids = (0..4).map(NodeId::new).collect::<Vec<_>>();
    let links = vec![
        Link::new(ids[0], ids[1], 1),
        Link::new(ids[0], ids[2], 1),
        Link::new(ids[1], ids[3], 1),
        Link::new(ids[2], ids[3], 1),
    ];
    (ids, links)
}

/// Two connected components: {0, 1} and {2, 3}.
pub(crate) fn split_config() -> (Vec<NodeId>, Vec<Link>) {
    let ids = (0..4).map(NodeId::new).collect::<Vec<_>>();
    let links = vec![Link::new(ids[0], ids[1], 1), Link::new(ids[2], ids[3], 1)];
    (ids, links)
}

/// 4 leaves (IDs 0-3), 2 first-tier routers (IDs 4 and 5), 2 second-tier routers
/// (IDs 6 and 7), with mixed costs so that shortest paths are non-trivial.
pub(crate) fn eight_node_config() -> (Vec<NodeId>, Vec<Link>) {
    let ids = (0..8).map(NodeId::new).collect::<Vec<_>>();
    let mut links = Vec::new();
    // Each first-tier router serves 2 leaves
    links.push(Link::new(ids[0], ids[4], 1));
    links.push(Link::new(ids[1], ids[4], 1));
    links.push(Link::new(ids[2], ids[5], 1));
    links.push(Link::new(ids[3], ids[5], 1));
    // Each first-tier router is connected to both second-tier routers
    links.push(Link::new(ids[4], ids[6], 2));
    links.push(Link::new(ids[4], ids[7], 3));
    links.push(Link::new(ids[5], ids[6], 2));
    links.push(Link::new(ids[5], ids[7], 3));
    (ids, links)
}
