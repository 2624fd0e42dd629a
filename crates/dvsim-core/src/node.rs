//! Per-router state: the distance vector and the relaxation rule that updates it.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::protocol::Advertisement;
use crate::topology::{NodeId, Topology};
use crate::units::{Cost, Distance};

/// One row of a routing table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_new::new, serde::Serialize, serde::Deserialize,
)]
pub struct RouteEntry {
    pub distance: Distance,
    pub next_hop: Option<NodeId>,
}

/// A node's routing table: every declared destination mapped to the best known distance
/// and the neighbor to forward through.
///
/// The entry for the owning node itself is always `(0, self)`. Destinations the node has
/// not discovered yet (and destinations in other connected components, forever) carry
/// `(Unreachable, None)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DistanceVector {
    entries: BTreeMap<NodeId, RouteEntry>,
}

impl DistanceVector {
    pub fn distance_to(&self, dest: NodeId) -> Distance {
        self.entries
            .get(&dest)
            .map_or(Distance::Unreachable, |entry| entry.distance)
    }

    pub fn next_hop(&self, dest: NodeId) -> Option<NodeId> {
        self.entries.get(&dest).and_then(|entry| entry.next_hop)
    }

    pub fn entry(&self, dest: NodeId) -> Option<&RouteEntry> {
        self.entries.get(&dest)
    }

    /// Iterates over all entries in ascending destination order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &RouteEntry)> + '_ {
        self.entries.iter().map(|(&dest, entry)| (dest, entry))
    }

    delegate::delegate! {
        to self.entries {
            #[call(len)]
            pub fn nr_destinations(&self) -> usize;
        }
    }
}

/// A simulated router. It owns its [`DistanceVector`] exclusively: nothing else writes
/// it, and the engine only reads it through [`Node::snapshot`].
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    /// Direct neighbors with link costs, sorted by neighbor ID.
    neighbors: Vec<(NodeId, Cost)>,
    vector: DistanceVector,
}

impl Node {
    /// Creates a node for `id`, seeding its vector from the topology's direct-neighbor
    /// costs: self at distance 0, each neighbor at its link cost, everything else
    /// unreachable.
    pub fn new(id: NodeId, topology: &Topology) -> Self {
        let neighbors = topology
            .neighbors_of(id)
            .sorted_by_key(|&(neighbor, _)| neighbor)
            .collect::<Vec<_>>();
        let mut entries = topology
            .node_ids()
            .map(|dest| (dest, RouteEntry::new(Distance::Unreachable, None)))
            .collect::<BTreeMap<_, _>>();
        for &(neighbor, cost) in &neighbors {
            entries.insert(neighbor, RouteEntry::new(cost.into(), Some(neighbor)));
        }
        entries.insert(id, RouteEntry::new(Distance::ZERO, Some(id)));
        Self {
            id,
            neighbors,
            vector: DistanceVector { entries },
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn neighbors(&self) -> &[(NodeId, Cost)] {
        &self.neighbors
    }

    /// Returns a read-only copy of the current distance vector.
    pub fn snapshot(&self) -> DistanceVector {
        self.vector.clone()
    }

    /// Builds the advertisement this node sends to every neighbor in the current round.
    pub fn advertisement(&self) -> Advertisement {
        Advertisement::new(
            self.id,
            self.vector
                .iter()
                .map(|(dest, entry)| (dest, entry.distance))
                .collect(),
        )
    }

    /// Merges a neighbor's advertisement into this node's vector. Returns whether any
    /// entry changed.
    ///
    /// For every advertised destination, the candidate distance is the neighbor's
    /// reported distance plus the cost of the link to that neighbor. Only a strict
    /// improvement updates the entry; on a tie the existing route is kept, so next hops
    /// never churn between equal-cost paths. Advertisements from non-neighbors are
    /// ignored.
    pub fn relax(&mut self, advertisement: &Advertisement) -> bool {
        let sender = advertisement.sender();
        let Some(link_cost) = self.link_cost_to(sender) else {
            return false;
        };
        let mut changed = false;
        for (dest, reported) in advertisement.distances() {
            let candidate = reported + link_cost;
            let Some(entry) = self.vector.entries.get_mut(&dest) else {
                continue;
            };
            if candidate < entry.distance {
                *entry = RouteEntry::new(candidate, Some(sender));
                changed = true;
            }
        }
        changed
    }

    /// Consumes the node and returns its final vector.
    pub fn into_vector(self) -> DistanceVector {
        self.vector
    }

    fn link_cost_to(&self, neighbor: NodeId) -> Option<Cost> {
        self.neighbors
            .binary_search_by_key(&neighbor, |&(id, _)| id)
            .ok()
            .map(|i| self.neighbors[i].1)
    }
}
