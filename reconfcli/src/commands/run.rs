/// Commands related to running the reconfiguration on a problem.
use super::*;

use reconflib::report::NetworkReport;
use serde::Serialize;

fn read_and_prepare_problem<P: AsRef<Path>>(path: P) -> (String, Reconfigurator, RunConfig) {
    let mut problem = match NetworkProblem::read_from_file(path) {
        Ok(x) => x,
        Err(err) => fatal_error!(1, "Cannot read network problem: {}", err),
    };
    let name = problem.name.take().unwrap_or_else(|| "-".to_string());
    let (engine, config) = match problem.prepare() {
        Ok(x) => x,
        Err(err) => fatal_error!(1, "Error while preparing network problem: {}", err),
    };
    (name, engine, config)
}

fn spread(engine: &mut Reconfigurator) -> SpreadSummary {
    match engine.spread_ids() {
        Ok(summary) => summary,
        Err(err) => fatal_error!(1, "Cannot spread addresses: {}", err),
    }
}

fn closed_switches(engine: &Reconfigurator) -> Vec<SwitchId> {
    engine
        .graph
        .sw_config()
        .iter()
        .filter(|sw| sw.state == reconflib::graph::SwitchState::Closed)
        .map(|sw| sw.id.clone())
        .collect()
}

fn print_spread_summary(name: &str, engine: &Reconfigurator, summary: &SpreadSummary) {
    eprintln!("{:18}{}", "Problem Name:".bold(), name);
    eprintln!("{:18}{}", "Root:".bold(), engine.root);
    eprintln!("{:18}{}", "Nodes:".bold(), engine.graph.nodes().len());
    eprintln!("{:18}{}", "Switches:".bold(), engine.graph.sw_config().len());
    eprintln!("{:18}{}", "Addresses:".bold(), summary.created);
    if !summary.unreachable.is_empty() {
        eprintln!(
            "{:18}{}",
            "Unreachable:".bold(),
            summary.unreachable.join(", ").red()
        );
    }
}

fn print_result(
    criterion: Criterion,
    with_losses: bool,
    result: &FlowBalance,
    closed: &[SwitchId],
) {
    eprintln!("{:18}{}", "Criterion:".bold(), criterion);
    eprintln!("{:18}{}", "With Losses:".bold(), with_losses);
    eprintln!("{:18}{}", "Balance:".bold(), result.balance);
    eprintln!("{:18}{}", "Absolute Flux:".bold(), result.abs_flux);
    eprintln!("{:18}{}", "Closed Switches:".bold(), closed.join(", "));
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    name: String,
    criterion: Criterion,
    with_losses: bool,
    result: FlowBalance,
    closed_switches: Vec<SwitchId>,
    report: NetworkReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareEntry {
    criterion: Criterion,
    result: FlowBalance,
    closed_switches: Vec<SwitchId>,
}

fn print_json<T: Serialize>(value: &T) {
    let serialized = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => fatal_error!(1, "Error while serializing results: {}", e),
    };
    println!("{}", serialized);
}

impl Run {
    pub fn run(self) {
        let Run {
            path,
            criterion,
            losses,
            json,
        } = self;

        let (name, mut engine, config) = read_and_prepare_problem(path);
        let criterion = match criterion {
            Some(s) => match s.parse::<Criterion>() {
                Ok(c) => c,
                Err(err) => fatal_error!(2, "{}", err),
            },
            None => config.criterion,
        };
        let with_losses = losses || config.with_losses;

        let summary = spread(&mut engine);
        print_spread_summary(&name, &engine, &summary);

        let active = match engine.select_best_ids(criterion) {
            Ok(x) => x,
            Err(err) => fatal_error!(1, "Cannot select addresses: {}", err),
        };
        let closed = closed_switches(&engine);
        let result = match engine.global_balance(active, with_losses) {
            Ok(x) => x,
            Err(err) => fatal_error!(1, "Cannot compute flow balance: {}", err),
        };
        print_result(criterion, with_losses, &result, &closed);

        if json {
            print_json(&RunOutput {
                name,
                criterion,
                with_losses,
                result,
                closed_switches: closed,
                report: engine.graph.report(),
            });
        }
        eprintln!("{}", "Done!".green().bold());
    }
}

impl Compare {
    pub fn run(self) {
        let Compare { path, losses, json } = self;

        let (name, mut engine, config) = read_and_prepare_problem(path);
        let with_losses = losses || config.with_losses;
        let summary = spread(&mut engine);
        print_spread_summary(&name, &engine, &summary);

        let mut entries: Vec<CompareEntry> = Vec::with_capacity(Criterion::ALL.len());
        for criterion in Criterion::ALL {
            engine.clear_selected_ids();
            let active = match engine.select_best_ids(criterion) {
                Ok(x) => x,
                Err(err) => fatal_error!(1, "Cannot select addresses: {}", err),
            };
            let closed_switches = closed_switches(&engine);
            // Flow balance consumes the loads, so it runs on a copy.
            let mut copy = engine.clone();
            let result = match copy.global_balance(active, with_losses) {
                Ok(x) => x,
                Err(err) => fatal_error!(1, "Cannot compute flow balance: {}", err),
            };
            entries.push(CompareEntry {
                criterion,
                result,
                closed_switches,
            });
        }

        eprintln!();
        eprintln!(
            "{}",
            format!(
                "{:28}{:>14}{:>16}  {}",
                "Criterion", "Balance", "Absolute Flux", "Closed Switches"
            )
            .bold()
        );
        for entry in entries.iter() {
            eprintln!(
                "{:28}{:>14.4}{:>16.4}  {}",
                entry.criterion.name(),
                entry.result.balance,
                entry.result.abs_flux,
                entry.closed_switches.join(", ")
            );
        }

        if json {
            print_json(&entries);
        }
    }
}

impl Ids {
    pub fn run(self) {
        let Ids { path } = self;
        let (name, mut engine, _config) = read_and_prepare_problem(path);
        let summary = spread(&mut engine);
        print_spread_summary(&name, &engine, &summary);
        print_json(&engine.graph.report());
    }
}
