//! Broadcast of hierarchical addresses from the root.
use crate::graph::Graph;
use crate::hlmac::Hlmac;
use crate::types::NodeName;
use crate::ReconfFailure;

use std::collections::VecDeque;


/// Outcome of [`spread_ids`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpreadSummary {
    /// Number of addresses created, the root address included.
    pub created: usize,
    /// Nodes that did not receive any address. They cannot be selected.
    pub unreachable: Vec<NodeName>,
}

/// Assign addresses to every node reachable from `root`.
///
/// Nodes are attended in FIFO order. Each time a node is attended, each of its unused addresses
/// is extended to every neighbor that is not already on the path of that address. A neighbor is
/// queued once per address it receives.
/// An extension over a link controlled by a live switch depends on that switch.
///
/// The graph must not have any addresses from a previous run.
pub fn spread_ids(graph: &mut Graph, root: &str) -> Result<SpreadSummary, ReconfFailure> {
    let root_index = match graph.find_node(root) {
        Some((i, _)) => i,
        None => return Err(ReconfFailure::BadInput(format!("Unknown root: {root}"))),
    };
    if graph.nodes().iter().any(|node| !node.ids.is_empty()) {
        log::warn!("Spreading over a graph that already has addresses");
    }

    graph.nodes_mut()[root_index]
        .ids
        .push(Hlmac::new(None, root, None));
    let mut created: usize = 1;

    let mut queue: VecDeque<NodeName> = VecDeque::new();
    queue.push_back(root.to_string());

    while let Some(name) = queue.pop_front() {
        let (index, node) = match graph.find_node(&name) {
            Some(x) => x,
            None => return Err(ReconfFailure::BadInput(format!("Unknown node: {name}"))),
        };
        let neighbors = node.neighbors().to_vec();

        for i in 0..node.ids.len() {
            if graph.nodes()[index].ids[i].used {
                continue;
            }
            let parent = graph.nodes()[index].ids[i].clone();

            for neighbor in neighbors.iter() {
                if parent.check_loop(neighbor) {
                    continue;
                }
                let depends_on = graph.switch_between(&name, neighbor).cloned();
                let neighbor_index = match graph.find_node(neighbor) {
                    Some((j, _)) => j,
                    None => {
                        return Err(ReconfFailure::BadInput(format!(
                            "Node {name} has unknown neighbor {neighbor}"
                        )))
                    }
                };
                graph.nodes_mut()[neighbor_index]
                    .ids
                    .push(Hlmac::new(Some(&parent), neighbor, depends_on));
                created += 1;
                queue.push_back(neighbor.clone());
            }

            graph.nodes_mut()[index].ids[i].used = true;
        }
    }

    let unreachable: Vec<NodeName> = graph
        .nodes()
        .iter()
        .filter(|node| node.ids.is_empty())
        .map(|node| node.name.clone())
        .collect();
    for name in unreachable.iter() {
        log::warn!("Node {name} is unreachable from root {root}");
    }
    log::info!(
        "Spread {} addresses over {} nodes from root {}",
        created,
        graph.nodes().len(),
        root
    );

    Ok(SpreadSummary {
        created,
        unreachable,
    })
}
