use reconflib::io::NetworkProblem;
use reconflib::*;
use iai_callgrind::{black_box, library_benchmark, library_benchmark_group, main};

const MESH: &str = include_str!("../../graphs/mesh.json");

fn setup_mesh() -> Reconfigurator {
    let problem: NetworkProblem = serde_json::from_str(MESH).unwrap();
    let (engine, _config) = problem.prepare().unwrap();
    engine
}

fn setup_spread_mesh() -> Reconfigurator {
    let mut engine = setup_mesh();
    engine.spread_ids().unwrap();
    engine
}

#[library_benchmark]
#[bench::mesh(setup_mesh())]
fn spread(mut engine: Reconfigurator) {
    let summary = engine.spread_ids().unwrap();
    black_box(summary);
}

#[library_benchmark]
#[bench::num_hops(setup_spread_mesh(), Criterion::NumHops)]
#[bench::distance(setup_spread_mesh(), Criterion::Distance)]
#[bench::links_losses(setup_spread_mesh(), Criterion::LinksLosses)]
fn select_and_balance(mut engine: Reconfigurator, criterion: Criterion) {
    let active = engine.select_best_ids(criterion).unwrap();
    let result = engine.global_balance(active, true).unwrap();
    black_box(result);
}

library_benchmark_group!(
    name = mesh_group;
    benchmarks = spread, select_and_balance
);

main!(library_benchmark_groups = mesh_group);
