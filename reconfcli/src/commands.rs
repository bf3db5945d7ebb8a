use super::*;

mod run;
pub use run::*;

mod list;
pub use list::*;

/// All CLI commands available in this binary.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Spread addresses, select one per node and compute the flow balance.
    #[command(alias = "r")]
    Run(Run),

    /// Run all criteria on the same spreading and compare the results.
    #[command(alias = "c")]
    Compare(Compare),

    /// Spread addresses and print the candidates of each node as JSON.
    Ids(Ids),

    /// Print the list of all selection criteria.
    ListCriteria,
}

#[derive(clap::Args, Debug)]
pub struct Run {
    /// Path to the JSON or YAML file containing the problem.
    path: PathBuf,
    /// Selection criterion, overrides the one in the problem file.
    #[arg(short, long)]
    criterion: Option<String>,
    /// Take link losses into account in the flow balance.
    #[arg(short, long, default_value_t = false)]
    losses: bool,
    /// Print the results as JSON (Hint: redirect stdout)
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

#[derive(clap::Args, Debug)]
pub struct Compare {
    /// Path to the JSON or YAML file containing the problem.
    path: PathBuf,
    /// Take link losses into account in the flow balance.
    #[arg(short, long, default_value_t = false)]
    losses: bool,
    /// Print the results as JSON (Hint: redirect stdout)
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

#[derive(clap::Args, Debug)]
pub struct Ids {
    /// Path to the JSON or YAML file containing the problem.
    path: PathBuf,
}

impl Command {
    pub fn run(self) {
        match self {
            Command::Run(args) => args.run(),
            Command::Compare(args) => args.run(),
            Command::Ids(args) => args.run(),
            Command::ListCriteria => list_criteria(),
        }
    }
}
