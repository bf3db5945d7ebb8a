//! Graph model of the distribution network.
use crate::hlmac::Hlmac;
use crate::types::*;
use crate::ReconfFailure;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;


#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Normal,
    /// Substations, feeder heads and other nodes without a physical load.
    Virtual,
}

/// Direction of the power flow on a link, seen from the node that stores the link.
/// `Up` means toward the root.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    Open,
    Closed,
}

/// Maps the load carried by a link to the magnitude of the loss on it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(tag = "type")]
pub enum LossModel {
    #[default]
    Lossless,
    /// Loss proportional to the magnitude of the load.
    Linear { coefficient: f64 },
    /// Loss proportional to the square of the load, like resistive losses.
    Quadratic { coefficient: f64 },
}

impl LossModel {
    /// Get the loss for the given load. The result is never negative.
    pub fn get_losses(&self, load: Load) -> Load {
        match self {
            LossModel::Lossless => 0.0,
            LossModel::Linear { coefficient } => coefficient * load.abs(),
            LossModel::Quadratic { coefficient } => coefficient * load * load,
        }
    }

    /// Coefficients must be finite and nonnegative.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            LossModel::Lossless => Ok(()),
            LossModel::Linear { coefficient } | LossModel::Quadratic { coefficient } => {
                if coefficient.is_finite() && *coefficient >= 0.0 {
                    Ok(())
                } else {
                    Err(format!("Invalid loss coefficient: {coefficient}"))
                }
            }
        }
    }
}

/// One endpoint's half of an undirected link.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Link {
    pub dist: Distance,
    /// Not enforced by the flow balance.
    pub capacity: Option<Load>,
    /// Assigned during flow balance.
    pub direction: Option<FlowDirection>,
    pub losses: LossModel,
}

impl Link {
    pub fn new(dist: Distance, capacity: Option<Load>, losses: LossModel) -> Link {
        Link {
            dist,
            capacity,
            direction: None,
            losses,
        }
    }

    #[inline]
    pub fn get_losses(&self, load: Load) -> Load {
        self.losses.get_losses(load)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Switch {
    pub id: SwitchId,
    pub node_a: NodeName,
    pub node_b: NodeName,
    pub state: SwitchState,
    /// Pruned switches are left out of the reconfiguration.
    pub pruned: bool,
}

impl Switch {
    pub fn touches(&self, name: &str) -> bool {
        self.node_a == name || self.node_b == name
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: NodeName,
    pub kind: NodeKind,
    /// Positive for consumption, negative for generation.
    pub load: Load,
    /// Candidate addresses assigned during spreading.
    pub ids: Vec<Hlmac>,
    neighbors: Vec<NodeName>,
    /// `links[i]` connects this node to `neighbors[i]`.
    links: Vec<Link>,
    neighbor_index: HashMap<NodeName, usize>,
}

impl Node {
    pub fn new(name: NodeName, kind: NodeKind, load: Load) -> Node {
        Node {
            name,
            kind,
            load,
            ids: Vec::new(),
            neighbors: Vec::new(),
            links: Vec::new(),
            neighbor_index: HashMap::new(),
        }
    }

    pub fn neighbors(&self) -> &[NodeName] {
        &self.neighbors
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Link from this node to the given neighbor.
    pub fn link_to(&self, neighbor: &str) -> Option<&Link> {
        self.neighbor_index.get(neighbor).map(|&i| &self.links[i])
    }

    fn link_to_mut(&mut self, neighbor: &str) -> Option<&mut Link> {
        match self.neighbor_index.get(neighbor) {
            Some(&i) => Some(&mut self.links[i]),
            None => None,
        }
    }

    /// The selected address of this node, if selection was done.
    pub fn active_id(&self) -> Option<&Hlmac> {
        self.ids.iter().find(|id| id.active)
    }

    fn add_neighbor(&mut self, neighbor: NodeName, link: Link) {
        self.neighbor_index
            .insert(neighbor.clone(), self.neighbors.len());
        self.neighbors.push(neighbor);
        self.links.push(link);
    }

    fn remove_neighbor(&mut self, neighbor: &str) {
        if let Some(i) = self.neighbor_index.remove(neighbor) {
            self.neighbors.remove(i);
            self.links.remove(i);
            for (j, name) in self.neighbors.iter().enumerate().skip(i) {
                self.neighbor_index.insert(name.clone(), j);
            }
        }
    }
}

/// Contains the nodes, links and switches of a distribution network.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    /// Node name to position in `nodes`.
    index: HashMap<NodeName, usize>,
    switches: Vec<Switch>,
    switch_index: HashMap<SwitchId, usize>,
    /// First non-pruned switch touching each node.
    node_switch: HashMap<NodeName, usize>,
    /// First non-pruned switch between each pair of nodes, keyed by the ordered pair.
    pair_switch: HashMap<(NodeName, NodeName), usize>,
}

fn node_pair(a: &str, b: &str) -> (NodeName, NodeName) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    /// Add a node without any links. Returns its index.
    pub fn add_node(
        &mut self,
        name: NodeName,
        kind: NodeKind,
        load: Load,
    ) -> Result<usize, ReconfFailure> {
        if self.index.contains_key(&name) {
            return Err(ReconfFailure::BadInput(format!("Duplicate node: {name}")));
        }
        let i = self.nodes.len();
        self.index.insert(name.clone(), i);
        self.nodes.push(Node::new(name, kind, load));
        Ok(i)
    }

    /// Connect two existing nodes. Both endpoints get their own copy of the link.
    pub fn add_link(&mut self, a: &str, b: &str, link: Link) -> Result<(), ReconfFailure> {
        if a == b {
            return Err(ReconfFailure::BadInput(format!("Self-loop on node {a}")));
        }
        let ia = self.require_node(a)?;
        let ib = self.require_node(b)?;
        if self.nodes[ia].link_to(b).is_some() {
            return Err(ReconfFailure::BadInput(format!("Duplicate link: {a}-{b}")));
        }
        self.nodes[ia].add_neighbor(b.to_string(), link.clone());
        self.nodes[ib].add_neighbor(a.to_string(), link);
        Ok(())
    }

    /// Register a switch between two existing nodes.
    /// The link it controls has to be added separately with [`Graph::add_link`].
    pub fn add_switch(&mut self, switch: Switch) -> Result<(), ReconfFailure> {
        if self.switch_index.contains_key(&switch.id) {
            return Err(ReconfFailure::BadInput(format!(
                "Duplicate switch: {}",
                switch.id
            )));
        }
        self.require_node(&switch.node_a)?;
        self.require_node(&switch.node_b)?;
        self.switch_index
            .insert(switch.id.clone(), self.switches.len());
        self.switches.push(switch);
        self.reindex_switches();
        Ok(())
    }

    fn require_node(&self, name: &str) -> Result<usize, ReconfFailure> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ReconfFailure::BadInput(format!("Unknown node: {name}")))
    }

    fn reindex_switches(&mut self) {
        self.node_switch.clear();
        self.pair_switch.clear();
        for (i, sw) in self.switches.iter().enumerate() {
            if sw.pruned {
                continue;
            }
            self.node_switch.entry(sw.node_a.clone()).or_insert(i);
            self.node_switch.entry(sw.node_b.clone()).or_insert(i);
            self.pair_switch
                .entry(node_pair(&sw.node_a, &sw.node_b))
                .or_insert(i);
        }
    }

    /// Look up a node by name, returning its index as well.
    pub fn find_node(&self, name: &str) -> Option<(usize, &Node)> {
        self.index.get(name).map(|&i| (i, &self.nodes[i]))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Id of the first non-pruned switch that touches the given node.
    pub fn find_switch_id(&self, name: &str) -> Option<&SwitchId> {
        self.node_switch.get(name).map(|&i| &self.switches[i].id)
    }

    /// Id of the first non-pruned switch that connects exactly `a` and `b`, in either order.
    pub fn switch_between(&self, a: &str, b: &str) -> Option<&SwitchId> {
        self.pair_switch
            .get(&node_pair(a, b))
            .map(|&i| &self.switches[i].id)
    }

    /// All switches in registration order.
    pub fn sw_config(&self) -> &[Switch] {
        &self.switches
    }

    pub fn switch(&self, id: &str) -> Option<&Switch> {
        self.switch_index.get(id).map(|&i| &self.switches[i])
    }

    pub fn set_switch_state(&mut self, id: &str, state: SwitchState) -> Result<(), ReconfFailure> {
        match self.switch_index.get(id) {
            Some(&i) => {
                self.switches[i].state = state;
                Ok(())
            }
            None => Err(ReconfFailure::BadInput(format!("Unknown switch: {id}"))),
        }
    }

    /// Link stored at `from` toward `to`.
    pub fn link(&self, from: &str, to: &str) -> Option<&Link> {
        self.find_node(from).and_then(|(_, node)| node.link_to(to))
    }

    fn require_link(&self, from: &str, to: &str) -> Result<&Link, ReconfFailure> {
        self.link(from, to)
            .ok_or_else(|| ReconfFailure::BadInput(format!("No link between {from} and {to}")))
    }

    pub fn set_link_direction(
        &mut self,
        from: &str,
        to: &str,
        direction: FlowDirection,
    ) -> Result<(), ReconfFailure> {
        let i = self.require_node(from)?;
        match self.nodes[i].link_to_mut(to) {
            Some(link) => {
                link.direction = Some(direction);
                Ok(())
            }
            None => Err(ReconfFailure::BadInput(format!(
                "No link between {from} and {to}"
            ))),
        }
    }

    /// Capacity of the link from `from` to `to`, `None` if unbounded.
    pub fn link_capacity(&self, from: &str, to: &str) -> Result<Option<Load>, ReconfFailure> {
        Ok(self.require_link(from, to)?.capacity)
    }

    /// Remove a node and all of its links.
    /// Switches touching the node are marked as pruned since they cannot connect anything.
    pub fn remove_node(&mut self, name: &str) -> Result<Node, ReconfFailure> {
        let i = self.require_node(name)?;
        let node = self.nodes.remove(i);
        self.index.remove(name);
        for (j, n) in self.nodes.iter().enumerate().skip(i) {
            self.index.insert(n.name.clone(), j);
        }
        for neighbor in node.neighbors.iter() {
            if let Some(&j) = self.index.get(neighbor) {
                self.nodes[j].remove_neighbor(name);
            }
        }
        for sw in self.switches.iter_mut().filter(|sw| sw.touches(name)) {
            if !sw.pruned {
                log::info!("Switch {} is pruned with node {}", sw.id, name);
            }
            sw.pruned = true;
        }
        self.reindex_switches();
        Ok(node)
    }

    /// Set node loads from a load table at the given time index.
    /// Nodes missing from the table get zero load.
    pub fn update_loads(
        &mut self,
        loads: &HashMap<NodeName, Vec<Load>>,
        delta: usize,
    ) -> Result<(), ReconfFailure> {
        for (name, series) in loads.iter() {
            if !self.index.contains_key(name) {
                log::warn!("Load given for unknown node {name}");
            }
            if delta >= series.len() {
                return Err(ReconfFailure::BadInput(format!(
                    "Load series of node {name} has no index {delta}"
                )));
            }
        }
        for node in self.nodes.iter_mut() {
            node.load = match loads.get(&node.name) {
                Some(series) => series[delta],
                None => 0.0,
            };
        }
        Ok(())
    }
}
