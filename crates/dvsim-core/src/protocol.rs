//! The message shape nodes exchange each round.

use crate::topology::NodeId;
use crate::units::Distance;

/// A snapshot of a node's distances at the time of sending, broadcast to every direct
/// neighbor once per round.
///
/// Next hops are not advertised: a receiver always routes through the sender, so the
/// distances alone are enough to relax against. The engine wraps one advertisement in an
/// `Arc` per node per round and fans it out to all neighbors.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct Advertisement {
    sender: NodeId,
    /// `(destination, distance)` rows, sorted by destination.
    distances: Vec<(NodeId, Distance)>,
}

impl Advertisement {
    pub fn sender(&self) -> NodeId {
        self.sender
    }

    /// Iterates over the advertised `(destination, distance)` rows.
    pub fn distances(&self) -> impl Iterator<Item = (NodeId, Distance)> + '_ {
        self.distances.iter().copied()
    }

    /// Returns the advertised distance to `dest`, if the sender knows of it.
    pub fn distance_to(&self, dest: NodeId) -> Option<Distance> {
        self.distances
            .binary_search_by_key(&dest, |&(d, _)| d)
            .ok()
            .map(|i| self.distances[i].1)
    }
}
