//! Selection of one address per node and the resulting switch configuration.
use crate::criteria::Criterion;
use crate::graph::{Graph, SwitchState};
use crate::hlmac::Hlmac;
use crate::types::{NodeName, SwitchId};
use crate::ReconfFailure;

use std::collections::BTreeSet;

#[cfg(test)]
mod tests;

/// The active address of every node, collected after selection.
/// Consumed by [`crate::balance::global_balance`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveIds(pub Vec<Hlmac>);

impl ActiveIds {
    /// Switches that have to be closed for the active addresses to be connected.
    pub fn dependencies(&self) -> BTreeSet<SwitchId> {
        self.0
            .iter()
            .filter_map(|id| id.depends_on.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hlmac> {
        self.0.iter()
    }
}

/// Activate the best address of every node according to `criterion`, then open or close the
/// switches so that exactly the links used by the active addresses are connected.
///
/// Fails without touching the graph if any node has no address, or if a previous selection
/// was not cleared with [`clear_selected_ids`].
pub fn select_best_ids(
    graph: &mut Graph,
    criterion: Criterion,
) -> Result<ActiveIds, ReconfFailure> {
    let unreachable: Vec<NodeName> = graph
        .nodes()
        .iter()
        .filter(|node| node.ids.is_empty())
        .map(|node| node.name.clone())
        .collect();
    if !unreachable.is_empty() {
        return Err(ReconfFailure::UnreachableNodes(unreachable));
    }
    if let Some(node) = graph
        .nodes()
        .iter()
        .find(|node| node.ids.iter().any(|id| id.active))
    {
        return Err(ReconfFailure::BadInput(format!(
            "Node {} already has an active address, clear the selection first",
            node.name
        )));
    }

    let extremum = criterion.extremum();
    let mut selected: Vec<usize> = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let mut best: Option<(usize, f64)> = None;
        for (i, id) in node.ids.iter().enumerate() {
            let score = criterion.score(graph, id)?;
            match best {
                Some((_, best_score)) if !extremum.improves(score, best_score) => {}
                _ => best = Some((i, score)),
            }
        }
        // Every node has at least one address here.
        let (i, score) = best.unwrap_or((0, f64::NAN));
        log::debug!(
            "Node {}: selected {} ({} = {})",
            node.name,
            node.ids[i],
            criterion,
            score
        );
        selected.push(i);
    }

    for (node, i) in graph.nodes_mut().iter_mut().zip(selected) {
        node.ids[i].active = true;
    }

    let active = collect_active_ids(graph);
    resolve_switches(graph, &active.dependencies())?;
    log::info!(
        "Selected {} addresses with criterion {}",
        active.len(),
        criterion
    );
    Ok(active)
}

/// Collect the active address of every node, in node order.
pub fn collect_active_ids(graph: &Graph) -> ActiveIds {
    ActiveIds(
        graph
            .nodes()
            .iter()
            .filter_map(|node| node.active_id().cloned())
            .collect(),
    )
}

/// Open every switch that is not pruned, then close the ones in `closed`.
/// Pruned switches keep their state.
pub fn resolve_switches(
    graph: &mut Graph,
    closed: &BTreeSet<SwitchId>,
) -> Result<(), ReconfFailure> {
    let ids: Vec<(SwitchId, bool)> = graph
        .sw_config()
        .iter()
        .map(|sw| (sw.id.clone(), sw.pruned))
        .collect();
    for (id, pruned) in ids {
        if pruned {
            if closed.contains(&id) {
                log::warn!("Pruned switch {id} is required by an active address");
            }
            continue;
        }
        let state = if closed.contains(&id) {
            SwitchState::Closed
        } else {
            SwitchState::Open
        };
        graph.set_switch_state(&id, state)?;
    }
    Ok(())
}

/// Deactivate all addresses so that another selection can be made.
pub fn clear_selected_ids(graph: &mut Graph) {
    for node in graph.nodes_mut() {
        for id in node.ids.iter_mut() {
            id.active = false;
        }
    }
}
