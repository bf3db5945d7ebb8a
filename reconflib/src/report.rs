//! Read-only snapshots of the network state for reporting.
use crate::graph::{FlowDirection, Graph, NodeKind, Switch};
use crate::types::{Load, NodeName};

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IdEntry {
    /// Dot separated path of the address.
    pub address: String,
    pub used: bool,
    pub active: bool,
    #[serde(rename = "dependsOn")]
    pub depends_on: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LinkEntry {
    pub neighbor: NodeName,
    pub direction: Option<FlowDirection>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeReport {
    pub name: NodeName,
    /// "type" is a keyword...
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub load: Load,
    pub neighbors: usize,
    pub ids: Vec<IdEntry>,
    pub links: Vec<LinkEntry>,
}

/// Snapshot of all nodes with their candidate addresses, and the switch configuration.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NetworkReport {
    pub nodes: Vec<NodeReport>,
    pub switches: Vec<Switch>,
}

impl Graph {
    pub fn report(&self) -> NetworkReport {
        let nodes = self
            .nodes()
            .iter()
            .map(|node| NodeReport {
                name: node.name.clone(),
                kind: node.kind,
                load: node.load,
                neighbors: node.neighbors().len(),
                ids: node
                    .ids
                    .iter()
                    .map(|id| IdEntry {
                        address: id.to_string(),
                        used: id.used,
                        active: id.active,
                        depends_on: id.depends_on.clone(),
                    })
                    .collect(),
                links: node
                    .neighbors()
                    .iter()
                    .zip(node.links())
                    .map(|(neighbor, link)| LinkEntry {
                        neighbor: neighbor.clone(),
                        direction: link.direction,
                    })
                    .collect(),
            })
            .collect();
        NetworkReport {
            nodes,
            switches: self.sw_config().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, LossModel, SwitchState};

    #[test]
    fn report_after_spreading() {
        let mut graph = Graph::new();
        graph.add_node("R".into(), NodeKind::Virtual, 0.0).unwrap();
        graph.add_node("A".into(), NodeKind::Normal, 4.0).unwrap();
        graph
            .add_link("R", "A", Link::new(1.0, None, LossModel::Lossless))
            .unwrap();
        graph
            .add_switch(Switch {
                id: "s1".into(),
                node_a: "R".into(),
                node_b: "A".into(),
                state: SwitchState::Open,
                pruned: false,
            })
            .unwrap();
        crate::spread_ids(&mut graph, "R").unwrap();

        let report = graph.report();
        assert_eq!(report.nodes.len(), 2);
        assert_eq!(report.nodes[1].name, "A");
        assert_eq!(report.nodes[1].neighbors, 1);
        assert_eq!(
            report.nodes[1].ids,
            vec![IdEntry {
                address: "R.A".to_string(),
                used: true,
                active: false,
                depends_on: Some("s1".to_string()),
            }]
        );
        assert_eq!(report.switches.len(), 1);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["nodes"][0]["type"], "virtual");
        assert_eq!(value["switches"][0]["state"], "open");
        assert_eq!(value["nodes"][1]["ids"][0]["dependsOn"], "s1");
    }
}
