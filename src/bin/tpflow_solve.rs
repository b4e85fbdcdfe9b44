use structopt::StructOpt;
use tpflow::{PressureResults, Scenario, StrError};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "tpflow_solve",
    about = "Solves the pressure equation of a scenario and writes pressure and fluxes to a JSON file"
)]
struct Options {
    /// JSON file with the scenario
    scenario: String,

    /// JSON file with the results
    output: String,

    /// Prints the linear system statistics
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // logging
    let level = if options.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder().with_max_level(level).with_target(false).init();

    // load data
    let scenario = Scenario::read_json(&options.scenario)?;
    let grid = scenario.grid()?;
    info!("grid with {} × {} cells", grid.nx(), grid.ny());

    // solve
    let mut solver = scenario.solver(&grid)?;
    solver.step()?;

    // write results
    let results = PressureResults::new(&solver)?;
    results.write_json(&options.output)?;
    info!("results written to {}", options.output);
    Ok(())
}
