//! Input output module.
//!
//! Contains structs to serialize and deserialize network problems.
use crate::criteria::Criterion;
use crate::graph::{Graph, Link, LossModel, NodeKind, Switch, SwitchState};
use crate::types::*;
use crate::{ReconfFailure, Reconfigurator};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod fs;


/// Tuple for nodes that a link or switch connects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkNodes(pub NodeName, pub NodeName);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeEntry {
    pub name: NodeName,
    /// "type" is a keyword...
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub load: Load,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkEntry {
    pub nodes: LinkNodes,
    #[serde(default)]
    pub dist: Distance,
    #[serde(default)]
    pub capacity: Option<Load>,
    #[serde(default)]
    pub losses: LossModel,
}

fn default_switch_state() -> SwitchState {
    SwitchState::Closed
}

/// A switch is also a link between its nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SwitchEntry {
    pub id: SwitchId,
    pub nodes: LinkNodes,
    #[serde(default = "default_switch_state")]
    pub state: SwitchState,
    #[serde(default)]
    pub pruned: bool,
    #[serde(default)]
    pub dist: Distance,
    #[serde(default)]
    pub capacity: Option<Load>,
    #[serde(default)]
    pub losses: LossModel,
}

/// JSON representation of a distribution network.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Network {
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    #[serde(default)]
    pub switches: Vec<SwitchEntry>,
}

/// Settings for a reconfiguration run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub criterion: Criterion,
    #[serde(default)]
    pub with_losses: bool,
    /// Column of the load table to use.
    #[serde(default)]
    pub delta: usize,
}

/// Represents a reconfiguration problem: a network, its root and how to run it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkProblem {
    pub name: Option<String>,
    pub root: NodeName,
    pub network: Network,
    /// Nodes to remove before spreading.
    #[serde(default)]
    pub prune: Vec<NodeName>,
    /// Load series for each node, indexed by `config.delta`.
    /// If empty, the loads of `network.nodes` are used.
    #[serde(default)]
    pub loads: HashMap<NodeName, Vec<Load>>,
    #[serde(default)]
    pub config: RunConfig,
}

impl Network {
    /// Build the graph model.
    pub fn to_graph(&self) -> Result<Graph, ReconfFailure> {
        let mut graph = Graph::new();
        for node in self.nodes.iter() {
            graph.add_node(node.name.clone(), node.kind, node.load)?;
        }
        for link in self.links.iter() {
            let LinkNodes(a, b) = &link.nodes;
            link.losses
                .validate()
                .map_err(|e| ReconfFailure::BadInput(format!("Link {a}-{b}: {e}")))?;
            graph.add_link(a, b, Link::new(link.dist, link.capacity, link.losses.clone()))?;
        }
        for sw in self.switches.iter() {
            let LinkNodes(a, b) = &sw.nodes;
            sw.losses
                .validate()
                .map_err(|e| ReconfFailure::BadInput(format!("Switch {}: {e}", sw.id)))?;
            if graph.link(a, b).is_none() {
                graph.add_link(a, b, Link::new(sw.dist, sw.capacity, sw.losses.clone()))?;
            }
            graph.add_switch(Switch {
                id: sw.id.clone(),
                node_a: a.clone(),
                node_b: b.clone(),
                state: sw.state,
                pruned: sw.pruned,
            })?;
        }
        Ok(graph)
    }
}

impl NetworkProblem {
    /// Prepare this problem before running.
    /// - Build the graph.
    /// - Apply the load table, if any.
    /// - Remove pruned nodes.
    pub fn prepare(self) -> Result<(Reconfigurator, RunConfig), ReconfFailure> {
        let NetworkProblem {
            name: _,
            root,
            network,
            prune,
            loads,
            config,
        } = self;

        let mut graph = network.to_graph()?;

        if !loads.is_empty() {
            graph.update_loads(&loads, config.delta)?;
        }

        for name in prune.iter() {
            if name == &root {
                return Err(ReconfFailure::BadInput(format!("Cannot prune root {root}")));
            }
            graph.remove_node(name)?;
        }

        if graph.find_node(&root).is_none() {
            return Err(ReconfFailure::BadInput(format!("Unknown root: {root}")));
        }

        Ok((Reconfigurator::new(graph, root), config))
    }
}
