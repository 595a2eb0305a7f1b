//! gridcircuit - DC Grid Circuit Solver
//!
//! Loads a grid netlist, optionally flips switches, solves the DC operating
//! point and prints voltages, currents and lightbulb state.
//!
//! # Usage
//!
//! ```bash
//! gridcircuit lamp.grid --toggle SW1 --json
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gridcircuit_core::{
    dsl::{self, Netlist},
    report::{Outcome, Report},
    Simulator,
};
use tracing::{info, Level};

/// DC grid circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit netlist file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Flip the named switch before solving (repeatable)
    #[arg(short, long = "toggle", value_name = "SWITCH")]
    toggle: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn run(args: &Args) -> Result<bool, Box<dyn Error>> {
    // Parse and build the circuit
    let ast = dsl::parse_file(&args.circuit_file)?;
    let netlist = Netlist::from_ast(&ast)?;

    let mut simulator = Simulator::new(netlist.topology.clone());
    for name in &args.toggle {
        let id = netlist.switch(name)?;
        let closed = simulator.toggle_switch(id)?;
        info!(switch = %name, closed, "switch toggled");
    }

    match simulator.solve() {
        Ok(result) => {
            let report = Report::new(result, &netlist);
            if args.json {
                println!("{}", Outcome::Solved(report).to_json()?);
            } else {
                print!("{}", report);
            }
            Ok(true)
        }
        Err(e) if args.json => {
            println!("{}", Outcome::from(e).to_json()?);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(args.verbose))
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
