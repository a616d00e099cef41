//! tetfea CLI - assemble every element stiffness of a problem file.

use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use log::{info, warn, LevelFilter};
use tetfea_core::{AssemblyOptions, Problem, Solver};

#[derive(Parser)]
#[command(name = "tetfea")]
#[command(version, about = "Element stiffness assembly for 10-node tetrahedra")]
struct Cli {
    /// Path to the problem file (JSON).
    input: PathBuf,

    /// Assemble elements on the calling thread only.
    #[arg(long)]
    sequential: bool,

    /// Number of worker threads (0 = one per core).
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Stop at the first degenerate element.
    #[arg(long)]
    fail_fast: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Load, assemble and summarize. Degenerate elements are reported, not fatal.
fn run(input: &Path, options: &AssemblyOptions) -> Result<(), tetfea_core::Error> {
    let problem = Problem::load(input)?;
    let solver = Solver::new(problem.config, &problem.geometry, &problem.boundary)?;
    let report = solver.assemble_all(options)?;

    let degenerate = report.degenerate_elements();
    if !degenerate.is_empty() {
        warn!("degenerate elements: {:?}", degenerate);
    }
    info!("input:              {}", input.display());
    info!("elements assembled: {}", report.elements.len());
    info!("degenerate:         {}", degenerate.len());
    info!("system size:        {}", solver.sizing().system_size);
    info!("prescribed nodes:   {}", solver.boundary_conditions().len());
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    init_logging(cli.verbose);

    let options = AssemblyOptions {
        parallel: !cli.sequential,
        n_threads: cli.threads,
        fail_fast: cli.fail_fast,
    };

    if let Err(e) = run(&cli.input, &options) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
