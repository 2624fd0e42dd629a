//! Round orchestration: the synchronous exchange protocol and convergence detection.

use std::collections::BTreeMap;
use std::sync::Arc;

use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::node::{DistanceVector, Node};
use crate::opts::RunOpts;
use crate::topology::{NodeId, Topology};

/// Drives one [`Node`] per topology vertex through synchronous rounds of advertisement
/// exchange until no node changes (converged) or the round budget runs out (exhausted).
///
/// A round is phased: first every node's advertisement is taken, then every node relaxes
/// against the advertisements of its direct neighbors. No relaxation can observe another
/// node's state from the same round, so the converged result is independent of the order
/// in which nodes are processed.
#[derive(Debug)]
pub struct Engine {
    /// Nodes in ascending ID order.
    nodes: Vec<Node>,
    id2idx: FxHashMap<NodeId, usize>,
    round: usize,
    cap: usize,
    status: EngineStatus,
}

impl Engine {
    /// Creates and seeds one node per topology vertex. The engine starts out `Running`.
    pub fn new(topology: &Topology, opts: RunOpts) -> Self {
        let nodes = topology
            .node_ids()
            .sorted()
            .map(|id| Node::new(id, topology))
            .collect::<Vec<_>>();
        let id2idx = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id(), idx))
            .collect();
        Self {
            nodes,
            id2idx,
            round: 0,
            cap: opts.round_cap.resolve(topology.nr_nodes()),
            status: EngineStatus::Running,
        }
    }

    /// Executes one round of the exchange protocol and reports which nodes changed.
    ///
    /// A quiet round (no changes) transitions the engine to `Converged`; stepping a
    /// converged engine is harmless and stays quiet. A productive round counts against
    /// the round budget, and exhausting the budget transitions to `Exhausted`.
    pub fn step(&mut self) -> RoundReport {
        // Phase 1: snapshot every node's advertisement, shared per sender.
        let advertisements = self
            .nodes
            .iter()
            .map(|node| Arc::new(node.advertisement()))
            .collect::<Vec<_>>();
        // Deliver to each node the advertisements of its direct neighbors, in ascending
        // sender order. Neighbor lists are already sorted.
        let inboxes = self
            .nodes
            .iter()
            .map(|node| {
                node.neighbors()
                    .iter()
                    .map(|(neighbor, _)| Arc::clone(&advertisements[self.id2idx[neighbor]]))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        // Phase 2: every node relaxes against its inbox. Each node mutates only its own
        // vector, so the nodes can run in parallel.
        let changed = self
            .nodes
            .par_iter_mut()
            .zip(inboxes)
            .filter_map(|(node, inbox)| {
                let mut changed = false;
                for advertisement in &inbox {
                    changed |= node.relax(advertisement);
                }
                changed.then(|| node.id())
            })
            .collect::<Vec<_>>();

        if changed.is_empty() {
            if self.status == EngineStatus::Running {
                self.status = EngineStatus::Converged;
            }
        } else {
            self.round += 1;
            if self.round >= self.cap {
                self.status = EngineStatus::Exhausted;
            }
        }
        log::debug!(
            "round {}: {} node(s) changed ({:?})",
            self.round,
            changed.len(),
            self.status
        );
        RoundReport::new(self.round, changed)
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// The number of productive rounds executed so far. The quiet round that confirms the
    /// fixed point is not counted, so a single-node topology converges at round 0.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Returns a copy of the current per-node tables.
    pub fn tables(&self) -> RoutingTables {
        RoutingTables {
            inner: self
                .nodes
                .iter()
                .map(|node| (node.id(), node.snapshot()))
                .collect(),
        }
    }

    /// Consumes the engine and returns the final per-node tables.
    pub fn into_tables(self) -> RoutingTables {
        RoutingTables {
            inner: self
                .nodes
                .into_iter()
                .map(|node| (node.id(), node.into_vector()))
                .collect(),
        }
    }
}

/// The engine's position in its `Running -> Converged | Exhausted` state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    /// Terminal: every node's vector is stable.
    Converged,
    /// Terminal: the round budget ran out before a fixed point was reached.
    Exhausted,
}

/// The outcome of a single round.
#[derive(Debug, Clone, derive_new::new)]
pub struct RoundReport {
    round: usize,
    changed: Vec<NodeId>,
}

impl RoundReport {
    pub fn round(&self) -> usize {
        self.round
    }

    /// The nodes whose vector changed this round, in ascending ID order.
    pub fn changed(&self) -> &[NodeId] {
        &self.changed
    }

    pub fn is_quiet(&self) -> bool {
        self.changed.is_empty()
    }
}

/// The final (or, after exhaustion, last-known) per-node routing tables.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RoutingTables {
    inner: BTreeMap<NodeId, DistanceVector>,
}

impl RoutingTables {
    pub fn get(&self, id: NodeId) -> Option<&DistanceVector> {
        self.inner.get(&id)
    }

    /// Iterates over `(node, table)` pairs in ascending node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DistanceVector)> + '_ {
        self.inner.iter().map(|(&id, vector)| (id, vector))
    }

    /// Follows next hops from `from` towards `to` and returns the full node sequence,
    /// endpoints included. Returns `None` if `to` is unreachable from `from`.
    pub fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        self.get(from)?;
        let mut path = vec![from];
        let mut current = from;
        while current != to {
            let next = self.get(current)?.next_hop(to)?;
            path.push(next);
            current = next;
            if path.len() > self.inner.len() {
                // A next-hop cycle; converged tables never contain one.
                return None;
            }
        }
        Some(path)
    }

    delegate::delegate! {
        to self.inner {
            #[call(len)]
            pub fn nr_nodes(&self) -> usize;

            pub fn is_empty(&self) -> bool;
        }
    }
}
