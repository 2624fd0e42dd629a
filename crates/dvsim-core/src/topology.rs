//! The static network topology. Built once, validated up front, immutable afterwards.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::units::Cost;

identifier!(NodeId, usize);

/// A bidirectional link: `cost(a, b) == cost(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub cost: Cost,
}

impl Link {
    pub fn new(a: NodeId, b: NodeId, cost: impl Into<Cost>) -> Self {
        Self {
            a,
            b,
            cost: cost.into(),
        }
    }

    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        self.a == x && self.b == y || self.a == y && self.b == x
    }
}

/// A weighted graph of nodes and links.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: DiGraph<NodeId, Cost>,
    id2idx: FxHashMap<NodeId, NodeIndex>,
}

impl Topology {
    /// Creates a network topology from a list of nodes and links. This function returns an
    /// error if the given lists fail to produce a valid topology.
    ///
    /// Correctness properties:
    ///
    /// - Every node must have a unique ID.
    /// - Every link must have distinct endpoints in `nodes`.
    /// - Every link cost must be strictly positive.
    ///
    /// Nodes without any link are legal; unreachability is a reportable simulation outcome,
    /// not an input error. A link between the same pair of nodes may be declared more than
    /// once (adjacency-style inputs list every link from both endpoints) and the last
    /// definition wins.
    pub fn new(nodes: &[NodeId], links: &[Link]) -> Result<Self, TopologyError> {
        let mut g = DiGraph::new();
        let mut id2idx = FxHashMap::default();
        for &id in nodes {
            let idx = g.add_node(id);
            if id2idx.insert(id, idx).is_some() {
                // CORRECTNESS: Every node must have a unique ID.
                return Err(TopologyError::DuplicateNodeId(id));
            }
        }
        for &Link { a, b, cost } in links {
            // CORRECTNESS: Every link must have distinct endpoints in `nodes`.
            if a == b {
                return Err(TopologyError::SelfLoop(a));
            }
            let &aidx = id2idx.get(&a).ok_or(TopologyError::UndeclaredNode(a))?;
            let &bidx = id2idx.get(&b).ok_or(TopologyError::UndeclaredNode(b))?;
            // CORRECTNESS: Every link cost must be strictly positive.
            if cost == Cost::ZERO {
                return Err(TopologyError::NonPositiveCost { a, b });
            }
            if let Some(eidx) = g.find_edge(aidx, bidx) {
                if g[eidx] != cost {
                    log::debug!("link ({a}, {b}) redefined: cost {cost} replaces {}", g[eidx]);
                }
            }
            // Links are bidirectional; store one edge per direction.
            g.update_edge(aidx, bidx, cost);
            g.update_edge(bidx, aidx, cost);
        }
        Ok(Self { graph: g, id2idx })
    }

    pub fn nr_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id2idx.contains_key(&id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// Returns the direct neighbors of `id` with their link costs, in no particular order.
    /// Unknown IDs have no neighbors.
    pub fn neighbors_of(&self, id: NodeId) -> impl Iterator<Item = (NodeId, Cost)> + '_ {
        self.id2idx.get(&id).into_iter().flat_map(move |&idx| {
            self.graph
                .edges(idx)
                .map(|edge| (self.graph[edge.target()], *edge.weight()))
        })
    }

    /// Returns the cost of the direct link between `a` and `b`, if one exists.
    pub fn link_cost(&self, a: NodeId, b: NodeId) -> Option<Cost> {
        let &aidx = self.id2idx.get(&a)?;
        let &bidx = self.id2idx.get(&b)?;
        let eidx = self.graph.find_edge(aidx, bidx)?;
        Some(self.graph[eidx])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Duplicate node ID {0}")]
    DuplicateNodeId(NodeId),

    #[error("Node {0} is linked to itself")]
    SelfLoop(NodeId),

    #[error("Node {0} is not declared")]
    UndeclaredNode(NodeId),

    #[error("Link between {a} and {b} has a non-positive cost")]
    NonPositiveCost { a: NodeId, b: NodeId },
}
