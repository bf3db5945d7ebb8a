use super::*;
use crate::graph::{Link, LossModel, NodeKind, Switch};
use crate::spreading::spread_ids;

fn lossless(dist: f64) -> Link {
    Link::new(dist, None, LossModel::Lossless)
}

/// C is two hops away through A, but closer through B and D.
/// The D - C link is controlled by switch `t`.
fn get_diamond() -> Graph {
    let mut graph = Graph::new();
    graph.add_node("R".into(), NodeKind::Virtual, 0.0).unwrap();
    graph.add_node("A".into(), NodeKind::Normal, 1.0).unwrap();
    graph.add_node("B".into(), NodeKind::Normal, 2.0).unwrap();
    graph.add_node("C".into(), NodeKind::Normal, 3.0).unwrap();
    graph.add_node("D".into(), NodeKind::Normal, 4.0).unwrap();
    graph.add_link("R", "A", lossless(10.0)).unwrap();
    graph.add_link("A", "C", lossless(10.0)).unwrap();
    graph.add_link("R", "B", lossless(1.0)).unwrap();
    graph.add_link("B", "D", lossless(1.0)).unwrap();
    graph.add_link("D", "C", lossless(1.0)).unwrap();
    graph
        .add_switch(Switch {
            id: "t".into(),
            node_a: "D".into(),
            node_b: "C".into(),
            state: SwitchState::Closed,
            pruned: false,
        })
        .unwrap();
    spread_ids(&mut graph, "R").unwrap();
    graph
}

fn active_of(graph: &Graph, name: &str) -> String {
    graph
        .find_node(name)
        .unwrap()
        .1
        .active_id()
        .unwrap()
        .to_string()
}

fn assert_one_active_per_node(graph: &Graph) {
    for node in graph.nodes() {
        assert_eq!(
            node.ids.iter().filter(|id| id.active).count(),
            1,
            "node {}",
            node.name
        );
    }
}

#[test]
fn num_hops_picks_shorter() {
    let mut graph = get_diamond();
    let active = select_best_ids(&mut graph, Criterion::NumHops).unwrap();
    assert_eq!(active_of(&graph, "C"), "R.A.C");
    assert_eq!(active_of(&graph, "D"), "R.B.D");
    assert_eq!(active.len(), 5);
    assert!(active.dependencies().is_empty());
    assert_eq!(graph.switch("t").unwrap().state, SwitchState::Open);
}

#[test]
fn distance_picks_closer() {
    let mut graph = get_diamond();
    let active = select_best_ids(&mut graph, Criterion::Distance).unwrap();
    assert_eq!(active_of(&graph, "A"), "R.A");
    assert_eq!(active_of(&graph, "C"), "R.B.D.C");
    assert_eq!(active_of(&graph, "D"), "R.B.D");
    let expected: BTreeSet<SwitchId> = ["t".to_string()].into_iter().collect();
    assert_eq!(active.dependencies(), expected);
    assert_eq!(graph.switch("t").unwrap().state, SwitchState::Closed);
}

#[test]
fn active_ids_in_node_order() {
    let mut graph = get_diamond();
    let active = select_best_ids(&mut graph, Criterion::Distance).unwrap();
    let names: Vec<String> = active.iter().map(|id| id.to_string()).collect();
    assert_eq!(names, vec!["R", "R.A", "R.B", "R.B.D.C", "R.B.D"]);
    assert_eq!(active, collect_active_ids(&graph));
}

#[test]
fn every_criterion_selects_one_per_node() {
    for criterion in Criterion::ALL {
        let mut graph = get_diamond();
        let active = select_best_ids(&mut graph, criterion).unwrap();
        assert_eq!(active.len(), graph.nodes().len());
        assert_one_active_per_node(&graph);

        let closed: BTreeSet<SwitchId> = graph
            .sw_config()
            .iter()
            .filter(|sw| sw.state == SwitchState::Closed)
            .map(|sw| sw.id.clone())
            .collect();
        assert_eq!(closed, active.dependencies(), "criterion {}", criterion);
    }
}

#[test]
fn ties_keep_first_candidate() {
    let mut graph = Graph::new();
    for name in ["R", "A", "B", "C"] {
        graph.add_node(name.into(), NodeKind::Normal, 0.0).unwrap();
    }
    graph.add_link("R", "A", lossless(1.0)).unwrap();
    graph.add_link("R", "B", lossless(1.0)).unwrap();
    graph.add_link("A", "C", lossless(1.0)).unwrap();
    graph.add_link("B", "C", lossless(1.0)).unwrap();
    spread_ids(&mut graph, "R").unwrap();

    for criterion in Criterion::ALL {
        clear_selected_ids(&mut graph);
        select_best_ids(&mut graph, criterion).unwrap();
        assert_eq!(active_of(&graph, "C"), "R.A.C", "criterion {}", criterion);
    }
}

#[test]
fn clear_and_reselect() {
    let mut graph = get_diamond();
    select_best_ids(&mut graph, Criterion::NumHops).unwrap();
    clear_selected_ids(&mut graph);
    assert!(graph
        .nodes()
        .iter()
        .all(|node| node.ids.iter().all(|id| !id.active)));
    assert!(collect_active_ids(&graph).is_empty());

    select_best_ids(&mut graph, Criterion::Distance).unwrap();
    assert_one_active_per_node(&graph);
    assert_eq!(active_of(&graph, "C"), "R.B.D.C");
}

#[test]
fn reselect_without_clearing_fails() {
    let mut graph = get_diamond();
    select_best_ids(&mut graph, Criterion::NumHops).unwrap();
    assert!(matches!(
        select_best_ids(&mut graph, Criterion::Distance),
        Err(ReconfFailure::BadInput(_))
    ));
    // The first selection is left as it was.
    assert_one_active_per_node(&graph);
    assert_eq!(active_of(&graph, "C"), "R.A.C");
    assert_eq!(graph.switch("t").unwrap().state, SwitchState::Open);
}

#[test]
fn unreachable_node_fails() {
    let mut graph = get_diamond();
    graph.add_node("Z".into(), NodeKind::Normal, 0.0).unwrap();
    assert_eq!(
        select_best_ids(&mut graph, Criterion::NumHops),
        Err(ReconfFailure::UnreachableNodes(vec!["Z".to_string()]))
    );
    assert!(graph
        .nodes()
        .iter()
        .all(|node| node.ids.iter().all(|id| !id.active)));
    assert_eq!(graph.switch("t").unwrap().state, SwitchState::Closed);
}

#[test]
fn pruned_switches_are_untouched() {
    let mut graph = Graph::new();
    graph.add_node("R".into(), NodeKind::Virtual, 0.0).unwrap();
    graph.add_node("A".into(), NodeKind::Normal, 1.0).unwrap();
    graph.add_node("B".into(), NodeKind::Normal, 1.0).unwrap();
    graph.add_link("R", "A", lossless(1.0)).unwrap();
    graph.add_link("A", "B", lossless(1.0)).unwrap();
    for (id, a, b, state, pruned) in [
        ("used", "R", "A", SwitchState::Open, false),
        ("chained", "A", "B", SwitchState::Open, false),
        ("frozen-open", "R", "B", SwitchState::Open, true),
        ("frozen-closed", "B", "R", SwitchState::Closed, true),
    ] {
        graph
            .add_switch(Switch {
                id: id.into(),
                node_a: a.into(),
                node_b: b.into(),
                state,
                pruned,
            })
            .unwrap();
    }
    spread_ids(&mut graph, "R").unwrap();
    let active = select_best_ids(&mut graph, Criterion::NumHops).unwrap();

    let expected: BTreeSet<SwitchId> = ["chained".to_string(), "used".to_string()]
        .into_iter()
        .collect();
    assert_eq!(active.dependencies(), expected);
    assert_eq!(graph.switch("used").unwrap().state, SwitchState::Closed);
    assert_eq!(graph.switch("chained").unwrap().state, SwitchState::Closed);
    assert_eq!(graph.switch("frozen-open").unwrap().state, SwitchState::Open);
    assert_eq!(
        graph.switch("frozen-closed").unwrap().state,
        SwitchState::Closed
    );
}

/// B sits between two live switches: `ab` towards the root and `bx` towards X.
#[test]
fn node_between_two_switches_closes_both() {
    let mut graph = Graph::new();
    graph.add_node("R".into(), NodeKind::Virtual, 0.0).unwrap();
    graph.add_node("A".into(), NodeKind::Normal, 1.0).unwrap();
    graph.add_node("B".into(), NodeKind::Normal, 2.0).unwrap();
    graph.add_node("X".into(), NodeKind::Normal, 3.0).unwrap();
    graph.add_node("Y".into(), NodeKind::Normal, 4.0).unwrap();
    graph.add_link("R", "A", lossless(1.0)).unwrap();
    graph.add_link("A", "B", lossless(1.0)).unwrap();
    graph.add_link("B", "X", lossless(1.0)).unwrap();
    graph.add_link("R", "Y", lossless(1.0)).unwrap();
    for (id, a, b) in [("ab", "A", "B"), ("bx", "B", "X"), ("ry", "R", "Y")] {
        graph
            .add_switch(Switch {
                id: id.into(),
                node_a: a.into(),
                node_b: b.into(),
                state: SwitchState::Open,
                pruned: false,
            })
            .unwrap();
    }
    spread_ids(&mut graph, "R").unwrap();
    let active = select_best_ids(&mut graph, Criterion::NumHops).unwrap();

    let x = graph.find_node("X").unwrap().1.active_id().unwrap();
    assert_eq!(x.to_string(), "R.A.B.X");
    assert_eq!(x.depends_on.as_deref(), Some("bx"));
    let expected: BTreeSet<SwitchId> = ["ab", "bx", "ry"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(active.dependencies(), expected);
    for id in ["ab", "bx", "ry"] {
        assert_eq!(graph.switch(id).unwrap().state, SwitchState::Closed, "{id}");
    }
}
