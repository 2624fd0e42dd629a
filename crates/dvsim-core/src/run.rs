//! The top-level simulation routine.

use crate::engine::{Engine, EngineStatus, RoutingTables};
use crate::opts::RunOpts;
use crate::topology::{Link, NodeId, Topology, TopologyError};

/// The core `dvsim` routine. This validates the topology, seeds one node per vertex, and
/// drives rounds of advertisement exchange to a terminal state.
///
/// Returns the converged tables, or an error if the topology is invalid or the round
/// budget runs out first. A non-convergent run is never silently passed off as converged;
/// the error carries the last-known tables for diagnostics.
pub fn run(nodes: &[NodeId], links: &[Link], opts: RunOpts) -> Result<Outcome, Error> {
    let topology = Topology::new(nodes, links)?;
    let mut engine = Engine::new(&topology, opts);
    loop {
        engine.step();
        match engine.status() {
            EngineStatus::Running => continue,
            EngineStatus::Converged => {
                let rounds = engine.round();
                log::info!("converged after {rounds} productive round(s)");
                return Ok(Outcome {
                    rounds,
                    tables: engine.into_tables(),
                });
            }
            EngineStatus::Exhausted => {
                return Err(Error::NonConvergence {
                    rounds: engine.round(),
                    tables: Box::new(engine.into_tables()),
                });
            }
        }
    }
}

/// A successful simulation result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Outcome {
    /// The number of productive rounds it took to converge.
    pub rounds: usize,
    /// The converged per-node tables.
    pub tables: RoutingTables,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidTopology(#[from] TopologyError),

    #[error("no convergence after {rounds} round(s)")]
    NonConvergence {
        /// Productive rounds executed before giving up.
        rounds: usize,
        /// The last-known tables, for diagnosing the non-convergence.
        tables: Box<RoutingTables>,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use petgraph::algo::dijkstra;
    use petgraph::graph::UnGraph;
    use rand::prelude::*;

    use super::*;
    use crate::opts::RoundCap;
    use crate::testing;
    use crate::units::{Cost, Distance};

    /// Reference shortest-path distances for every source, via petgraph's Dijkstra.
    fn reference_distances(
        nodes: &[NodeId],
        links: &[Link],
    ) -> BTreeMap<NodeId, BTreeMap<NodeId, u64>> {
        let mut graph = UnGraph::<NodeId, u64>::new_undirected();
        let indices = nodes
            .iter()
            .map(|&id| (id, graph.add_node(id)))
            .collect::<BTreeMap<_, _>>();
        for link in links {
            // Mirror the last-definition-wins rule for duplicate declarations.
            if let Some(eidx) = graph.find_edge(indices[&link.a], indices[&link.b]) {
                graph[eidx] = link.cost.into_u64();
            } else {
                graph.add_edge(indices[&link.a], indices[&link.b], link.cost.into_u64());
            }
        }
        nodes
            .iter()
            .map(|&src| {
                let distances = dijkstra(&graph, indices[&src], None, |e| *e.weight());
                let by_id = nodes
                    .iter()
                    .filter_map(|&dst| distances.get(&indices[&dst]).map(|&d| (dst, d)))
                    .collect();
                (src, by_id)
            })
            .collect()
    }

    /// Asserts the full correctness contract against the reference algorithm: converged
    /// distances match, and every next-hop chain traces a path of exactly that cost.
    fn assert_matches_reference(
        nodes: &[NodeId],
        links: &[Link],
        outcome: &Outcome,
    ) -> anyhow::Result<()> {
        let reference = reference_distances(nodes, links);
        let topology = Topology::new(nodes, links)?;
        for &src in nodes {
            let table = outcome
                .tables
                .get(src)
                .ok_or_else(|| anyhow::anyhow!("missing table for {src}"))?;
            for &dst in nodes {
                match reference[&src].get(&dst) {
                    Some(&expected) => {
                        assert_eq!(
                            table.distance_to(dst),
                            Distance::Finite(Cost::new(expected)),
                            "distance {src} -> {dst}"
                        );
                        let path = outcome
                            .tables
                            .path(src, dst)
                            .ok_or_else(|| anyhow::anyhow!("missing path {src} -> {dst}"))?;
                        let total: u64 = path
                            .windows(2)
                            .map(|hop| topology.link_cost(hop[0], hop[1]).unwrap().into_u64())
                            .sum();
                        assert_eq!(total, expected, "path cost {src} -> {dst}");
                    }
                    None => {
                        assert!(table.distance_to(dst).is_unreachable());
                        assert_eq!(table.next_hop(dst), None);
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn triangle_scenario() -> anyhow::Result<()> {
        let (nodes, links) = testing::triangle_config();
        let outcome = run(&nodes, &links, RunOpts::default())?;
        let a = outcome.tables.get(NodeId::new(0)).unwrap();
        assert_eq!(a.distance_to(NodeId::new(1)), Distance::Finite(Cost::new(1)));
        assert_eq!(a.next_hop(NodeId::new(1)), Some(NodeId::new(1)));
        // The two-hop path via 1 beats the direct cost-4 link.
        assert_eq!(a.distance_to(NodeId::new(2)), Distance::Finite(Cost::new(2)));
        assert_eq!(a.next_hop(NodeId::new(2)), Some(NodeId::new(1)));
        assert_matches_reference(&nodes, &links, &outcome)
    }

    #[test]
    fn eight_node_matches_dijkstra() -> anyhow::Result<()> {
        let (nodes, links) = testing::eight_node_config();
        let outcome = run(&nodes, &links, RunOpts::default())?;
        assert!(outcome.rounds <= nodes.len() - 1);
        assert_matches_reference(&nodes, &links, &outcome)
    }

    #[test]
    fn random_topologies_match_dijkstra() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.gen_range(2..=12);
            let nodes = (0..n).map(NodeId::new).collect::<Vec<_>>();
            let mut links = Vec::new();
            for i in 0..n {
                for j in (i + 1)..n {
                    if rng.gen_bool(0.4) {
                        links.push(Link::new(nodes[i], nodes[j], rng.gen_range(1..=10u64)));
                    }
                }
            }
            let outcome = run(&nodes, &links, RunOpts::default())?;
            assert!(
                outcome.rounds <= n - 1,
                "{} rounds on {n} nodes",
                outcome.rounds
            );
            assert_matches_reference(&nodes, &links, &outcome)?;
        }
        Ok(())
    }

    #[test]
    fn declaration_order_does_not_affect_result() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let (nodes, links) = testing::eight_node_config();
        let baseline = run(&nodes, &links, RunOpts::default())?;
        for _ in 0..5 {
            let mut nodes = nodes.clone();
            let mut links = links.clone();
            nodes.shuffle(&mut rng);
            links.shuffle(&mut rng);
            let shuffled = run(&nodes, &links, RunOpts::default())?;
            assert_eq!(shuffled.tables, baseline.tables);
        }
        Ok(())
    }

    #[test]
    fn invalid_topology_is_rejected() {
        let nodes = [NodeId::new(0)];
        let links = [Link::new(NodeId::new(0), NodeId::new(1), 1)];
        let res = run(&nodes, &links, RunOpts::default());
        assert!(matches!(res, Err(Error::InvalidTopology(..))));
    }

    #[test]
    fn non_convergence_carries_last_tables() {
        let (nodes, links) = testing::line_config(5);
        let opts = RunOpts::builder().round_cap(RoundCap::Fixed(2)).build();
        match run(&nodes, &links, opts) {
            Err(Error::NonConvergence { rounds, tables }) => {
                assert_eq!(rounds, 2);
                assert_eq!(tables.nr_nodes(), 5);
                // After two rounds, node 0 cannot have heard from node 4 yet.
                assert!(tables
                    .get(NodeId::new(0))
                    .unwrap()
                    .distance_to(NodeId::new(4))
                    .is_unreachable());
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }
}
