//! Value types for link costs and path distances.

macro_rules! unit {
    ($name: ident) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            derive_more::FromStr,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const ZERO: $name = Self::new(0);
            pub const ONE: $name = Self::new(1);
            pub const MAX: $name = Self::new(u64::MAX);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn into_u64(self) -> u64 {
                self.0
            }
        }
    };
}

unit!(Cost);

impl Cost {
    pub const fn saturating_add(self, rhs: Cost) -> Cost {
        Cost::new(self.0.saturating_add(rhs.0))
    }
}

impl From<u64> for Cost {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path distance: either a finite cost or unreachable.
///
/// `Unreachable` compares greater than every finite distance, so the relaxation rule's
/// strict `candidate < current` test needs no special casing for destinations that have
/// not been discovered yet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "Option<Cost>", into = "Option<Cost>")]
pub enum Distance {
    Finite(Cost),
    Unreachable,
}

impl Distance {
    /// Distance 0, the distance from any node to itself.
    pub const ZERO: Distance = Distance::Finite(Cost::ZERO);

    /// Returns the inner cost for a finite distance.
    pub const fn cost(self) -> Option<Cost> {
        match self {
            Self::Finite(cost) => Some(cost),
            Self::Unreachable => None,
        }
    }

    /// Returns true if the distance is not finite.
    pub const fn is_unreachable(self) -> bool {
        matches!(self, Self::Unreachable)
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering::*;
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.cmp(b),
            (Self::Finite(_), Self::Unreachable) => Less,
            (Self::Unreachable, Self::Finite(_)) => Greater,
            (Self::Unreachable, Self::Unreachable) => Equal,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::ops::Add<Cost> for Distance {
    type Output = Distance;

    /// Extends a distance by one link. Saturates rather than wrapping, so even a
    /// pathological chain of near-`MAX` costs stays ordered correctly.
    fn add(self, rhs: Cost) -> Self::Output {
        match self {
            Self::Finite(cost) => Self::Finite(cost.saturating_add(rhs)),
            Self::Unreachable => Self::Unreachable,
        }
    }
}

impl From<Cost> for Distance {
    fn from(cost: Cost) -> Self {
        Self::Finite(cost)
    }
}

impl From<Option<Cost>> for Distance {
    fn from(cost: Option<Cost>) -> Self {
        cost.map_or(Self::Unreachable, Self::Finite)
    }
}

impl From<Distance> for Option<Cost> {
    fn from(distance: Distance) -> Self {
        distance.cost()
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(cost) => write!(f, "{cost}"),
            Self::Unreachable => write!(f, "inf"),
        }
    }
}
