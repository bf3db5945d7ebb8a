//! # Distribution Network Reconfiguration Library
//!
//! Assigns hierarchical addresses (HLMACs) to every node of a distribution network starting
//! from a root, selects one address per node under a criterion, derives the switch
//! configuration of the resulting radial topology and estimates its power-flow balance.

use serde::{Deserialize, Serialize};

pub mod balance;
pub mod criteria;
pub mod graph;
pub mod hlmac;
pub mod io;
pub mod report;
pub mod selection;
pub mod spreading;
pub mod types;


pub use balance::{global_balance, FlowBalance};
pub use criteria::{Criterion, Extremum};
pub use graph::Graph;
pub use hlmac::Hlmac;
pub use selection::{clear_selected_ids, select_best_ids, ActiveIds};
pub use spreading::{spread_ids, SpreadSummary};
pub use types::*;

use std::collections::HashMap;

/// Represents the reasons why a reconfiguration attempt might fail.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum ReconfFailure {
    BadInput(String),
    /// Nodes that did not receive any address from the root.
    UnreachableNodes(Vec<NodeName>),
    /// An address without a parent was used where a parent is required.
    MalformedAddress(String),
    UnknownCriterion(String),
}

impl std::error::Error for ReconfFailure {}

impl std::fmt::Display for ReconfFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReconfFailure::BadInput(reason) => write!(f, "Bad input: {}", reason),
            ReconfFailure::UnreachableNodes(names) => {
                write!(f, "Nodes unreachable from root: {}", names.join(", "))
            }
            ReconfFailure::MalformedAddress(addr) => {
                write!(f, "Address {} has no next hop", addr)
            }
            ReconfFailure::UnknownCriterion(name) => write!(f, "Unknown criterion: {}", name),
        }
    }
}

/// Runs the reconfiguration phases over a single network owned by this struct.
///
/// Order of operations: [`Reconfigurator::spread_ids`] once, then
/// [`Reconfigurator::select_best_ids`] and [`Reconfigurator::global_balance`].
/// Call [`Reconfigurator::clear_selected_ids`] before selecting again with another criterion.
#[derive(Clone, Debug)]
pub struct Reconfigurator {
    pub graph: Graph,
    pub root: NodeName,
}

impl Reconfigurator {
    pub fn new(graph: Graph, root: NodeName) -> Reconfigurator {
        Reconfigurator { graph, root }
    }

    /// Broadcast addresses from the root to the whole network.
    pub fn spread_ids(&mut self) -> Result<SpreadSummary, ReconfFailure> {
        spread_ids(&mut self.graph, &self.root)
    }

    /// Activate one address per node and set the switches accordingly.
    pub fn select_best_ids(&mut self, criterion: Criterion) -> Result<ActiveIds, ReconfFailure> {
        select_best_ids(&mut self.graph, criterion)
    }

    /// Fold the loads of all nodes toward the root along the active addresses.
    ///
    /// Loads of the graph are consumed in the process: every non-root node ends with zero load.
    pub fn global_balance(
        &mut self,
        active: ActiveIds,
        with_losses: bool,
    ) -> Result<FlowBalance, ReconfFailure> {
        global_balance(&mut self.graph, active, &self.root, with_losses)
    }

    pub fn clear_selected_ids(&mut self) {
        clear_selected_ids(&mut self.graph);
    }

    /// Set the load of every node from a load table at the given time index.
    /// Nodes that are not in the table get zero load.
    pub fn update_loads(
        &mut self,
        loads: &HashMap<NodeName, Vec<Load>>,
        delta: usize,
    ) -> Result<(), ReconfFailure> {
        self.graph.update_loads(loads, delta)
    }
}
