//! Criteria to choose between the candidate addresses of a node.
use crate::graph::{Graph, Link, Node};
use crate::hlmac::Hlmac;
use crate::types::{Load, Score};
use crate::ReconfFailure;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Whether the best score is the smallest or the largest one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    /// Returns true if `candidate` is strictly better than `best`.
    #[inline]
    pub fn improves(&self, candidate: Score, best: Score) -> bool {
        let (candidate, best) = (OrderedFloat(candidate), OrderedFloat(best));
        match self {
            Extremum::Min => candidate < best,
            Extremum::Max => candidate > best,
        }
    }
}

/// Each criterion reduces an address to a score.
/// The address with the best score according to [`Criterion::extremum`] is selected.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criterion {
    /// Length of the address.
    NumHops,
    /// Sum of the link distances along the address.
    Distance,
    /// Sum of the loads of all nodes on the address.
    PowerBalance,
    /// Balance accumulated from the node toward the root, minus link losses at each hop.
    PowerBalanceWithLosses,
    /// Losses incurred by carrying the load of the node up to the root.
    LinksLosses,
}

impl Default for Criterion {
    fn default() -> Self {
        Criterion::NumHops
    }
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::NumHops,
        Criterion::Distance,
        Criterion::PowerBalance,
        Criterion::PowerBalanceWithLosses,
        Criterion::LinksLosses,
    ];

    pub fn extremum(&self) -> Extremum {
        match self {
            Criterion::NumHops | Criterion::Distance | Criterion::LinksLosses => Extremum::Min,
            Criterion::PowerBalance | Criterion::PowerBalanceWithLosses => Extremum::Max,
        }
    }

    /// Numeric code used by older configuration files.
    pub fn code(&self) -> u8 {
        match self {
            Criterion::NumHops => 0,
            Criterion::Distance => 1,
            Criterion::PowerBalance => 2,
            Criterion::PowerBalanceWithLosses => 3,
            Criterion::LinksLosses => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::NumHops => "NUM_HOPS",
            Criterion::Distance => "DISTANCE",
            Criterion::PowerBalance => "POWER_BALANCE",
            Criterion::PowerBalanceWithLosses => "POWER_BALANCE_WITH_LOSSES",
            Criterion::LinksLosses => "LINKS_LOSSES",
        }
    }

    /// Score the given address.
    pub fn score(&self, graph: &Graph, id: &Hlmac) -> Result<Score, ReconfFailure> {
        match self {
            Criterion::NumHops => Ok(id.len() as Score),
            Criterion::Distance => total_distance(graph, id),
            Criterion::PowerBalance => total_balance(graph, id),
            Criterion::PowerBalanceWithLosses => total_balance_with_losses(graph, id),
            Criterion::LinksLosses => total_links_losses(graph, id),
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u8> for Criterion {
    type Error = ReconfFailure;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Criterion::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| ReconfFailure::UnknownCriterion(code.to_string()))
    }
}

impl std::str::FromStr for Criterion {
    type Err = ReconfFailure;

    /// Accepts names in any case with `_` or `-` separators, or numeric codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Criterion::try_from(code);
        }
        let normalized = trimmed.to_ascii_uppercase().replace('-', "_");
        Criterion::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| ReconfFailure::UnknownCriterion(s.to_string()))
    }
}

fn node<'a>(graph: &'a Graph, name: &str) -> Result<&'a Node, ReconfFailure> {
    graph
        .find_node(name)
        .map(|(_, node)| node)
        .ok_or_else(|| ReconfFailure::BadInput(format!("Unknown node in address: {name}")))
}

fn link<'a>(node: &'a Node, neighbor: &str) -> Result<&'a Link, ReconfFailure> {
    node.link_to(neighbor).ok_or_else(|| {
        ReconfFailure::BadInput(format!("No link between {} and {}", node.name, neighbor))
    })
}

/// Walks the address from its own node toward the root, yielding each node with the link
/// to its parent.
fn hops_to_root<'a>(
    graph: &'a Graph,
    id: &'a Hlmac,
) -> impl Iterator<Item = Result<(&'a Node, &'a Link), ReconfFailure>> + 'a {
    let path = id.path();
    (1..path.len()).rev().map(move |i| {
        let n = node(graph, &path[i])?;
        Ok((n, link(n, &path[i - 1])?))
    })
}

fn total_distance(graph: &Graph, id: &Hlmac) -> Result<Score, ReconfFailure> {
    let mut distance = 0.0;
    for (a, b) in id.path().iter().zip(id.path().iter().skip(1)) {
        distance += link(node(graph, a)?, b)?.dist;
    }
    Ok(distance)
}

fn total_balance(graph: &Graph, id: &Hlmac) -> Result<Score, ReconfFailure> {
    let mut balance = 0.0;
    for name in id.path() {
        balance += node(graph, name)?.load;
    }
    Ok(balance)
}

fn total_balance_with_losses(graph: &Graph, id: &Hlmac) -> Result<Score, ReconfFailure> {
    // The root is a virtual node and is skipped.
    let mut balance: Load = 0.0;
    for hop in hops_to_root(graph, id) {
        let (n, l) = hop?;
        balance += n.load - l.get_losses(n.load + balance);
    }
    Ok(balance)
}

fn total_links_losses(graph: &Graph, id: &Hlmac) -> Result<Score, ReconfFailure> {
    let mut load: Load = node(graph, id.origin())?.load;
    let mut losses: Load = 0.0;
    for hop in hops_to_root(graph, id) {
        let (_, l) = hop?;
        losses += l.get_losses(load);
        load -= losses;
    }
    Ok(losses)
}
