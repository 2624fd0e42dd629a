#![warn(unreachable_pub, missing_debug_implementations)]

//! The core `dvsim` library. This crate defines [the routine](run::run) that drives a
//! distributed Bellman-Ford simulation over a [`Topology`] until every node's
//! [`DistanceVector`] reaches a fixed point.
//!
//! Every simulated node is blind: it knows only its direct neighbors and the costs of the
//! links to them. Nodes learn the rest of the network by exchanging [`Advertisement`]s in
//! synchronous rounds, orchestrated by the [`Engine`].

#[macro_use]
mod ident;

mod engine;
mod node;
mod protocol;
mod topology;

pub mod opts;
pub mod run;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{Engine, EngineStatus, RoundReport, RoutingTables};
pub use node::{DistanceVector, Node, RouteEntry};
pub use protocol::Advertisement;
pub use run::{run, Error, Outcome};
pub use topology::{Link, NodeId, Topology, TopologyError};
pub use units::{Cost, Distance};
