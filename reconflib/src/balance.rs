//! Power-flow balance over the selected radial topology.
use crate::graph::{FlowDirection, Graph};
use crate::selection::ActiveIds;
use crate::types::Load;
use crate::ReconfFailure;

use serde::{Deserialize, Serialize};


/// Result of [`global_balance`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlowBalance {
    /// Load left at the root after folding every node into its parent.
    pub balance: Load,
    /// Sum of the magnitudes of all transfers.
    pub abs_flux: Load,
}

/// Move the load of every node to its parent on the active address, deepest nodes first,
/// and set the flow direction of each used link.
///
/// With `with_losses`, the loss of the link it crosses is subtracted from each transfer.
/// Losses are never negative, so a negative transfer (net generation) grows in magnitude.
/// Link capacities are not enforced.
pub fn global_balance(
    graph: &mut Graph,
    active: ActiveIds,
    root: &str,
    with_losses: bool,
) -> Result<FlowBalance, ReconfFailure> {
    let ActiveIds(mut ids) = active;
    // Stable, so addresses of equal length keep node order.
    ids.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut abs_flux: Load = 0.0;
    let pending = ids.len().saturating_sub(1);

    for id in ids.iter().take(pending) {
        let origin = id.origin();
        let dst = id
            .next_hop()
            .ok_or_else(|| ReconfFailure::MalformedAddress(id.to_string()))?;
        let (origin_index, origin_node) = graph
            .find_node(origin)
            .ok_or_else(|| ReconfFailure::BadInput(format!("Unknown node: {origin}")))?;
        let origin_load = origin_node.load;
        let losses = match origin_node.link_to(dst) {
            Some(link) => link.get_losses(origin_load),
            None => {
                return Err(ReconfFailure::BadInput(format!(
                    "No link between {origin} and {dst}"
                )))
            }
        };
        let dst_index = graph
            .find_node(dst)
            .map(|(i, _)| i)
            .ok_or_else(|| ReconfFailure::BadInput(format!("Unknown node: {dst}")))?;

        if origin_load < 0.0 {
            graph.set_link_direction(origin, dst, FlowDirection::Down)?;
            graph.set_link_direction(dst, origin, FlowDirection::Up)?;
        } else {
            graph.set_link_direction(origin, dst, FlowDirection::Up)?;
            graph.set_link_direction(dst, origin, FlowDirection::Down)?;
        }

        let transfer = if with_losses {
            origin_load - losses
        } else {
            origin_load
        };
        if let Some(capacity) = graph.link_capacity(origin, dst)? {
            if transfer.abs() > capacity {
                log::warn!(
                    "Flow {} from {} to {} exceeds link capacity {}",
                    transfer,
                    origin,
                    dst,
                    capacity
                );
            }
        }

        let nodes = graph.nodes_mut();
        nodes[dst_index].load += transfer;
        nodes[origin_index].load = 0.0;
        abs_flux += transfer.abs();
    }

    let balance = match graph.find_node(root) {
        Some((_, node)) => node.load,
        None => return Err(ReconfFailure::BadInput(format!("Unknown root: {root}"))),
    };
    if let Some(last) = ids.get(pending) {
        if last.origin() != root {
            log::warn!("Last address {} does not belong to root {}", last, root);
        }
    }
    log::info!("Global balance: {balance}, absolute flux: {abs_flux}");

    Ok(FlowBalance { balance, abs_flux })
}
