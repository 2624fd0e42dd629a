//! This module defines the [`RunOpts`] configuration which describes how a simulation is
//! driven to termination.

/// Simulation options.
#[derive(Debug, Clone, Copy, typed_builder::TypedBuilder)]
pub struct RunOpts {
    /// Round budget.
    #[builder(default)]
    pub round_cap: RoundCap,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The maximum number of productive rounds before the engine gives up.
///
/// With strictly positive link costs, convergence takes at most N-1 productive rounds, so
/// the cap is a safety valve against protocol bugs, not something a valid input can hit.
/// A fixed cap must exceed N-1 to be useful.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RoundCap {
    /// Twice the number of nodes (with a floor of one round).
    #[default]
    Auto,
    /// An explicit round budget.
    Fixed(usize),
}

impl RoundCap {
    pub(crate) fn resolve(self, nr_nodes: usize) -> usize {
        match self {
            Self::Auto => std::cmp::max(1, 2 * nr_nodes),
            Self::Fixed(cap) => cap,
        }
    }
}
