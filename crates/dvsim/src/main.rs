use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use dvsim_core::opts::{RoundCap, RunOpts};
use dvsim_core::run::Error;
use dvsim_utils::report::{self, ReportFormat};

/// Simulates distributed Bellman-Ford routing over a weighted topology.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology description (.txt, .links, or .json)
    topology: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the report as pretty-printed JSON
    #[arg(long)]
    json: bool,

    /// Round budget (default: twice the number of nodes)
    #[arg(long)]
    max_rounds: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let round_cap = match args.max_rounds {
        Some(cap) => {
            anyhow::ensure!(cap > 0, "--max-rounds must be positive");
            RoundCap::Fixed(cap)
        }
        None => RoundCap::Auto,
    };
    let format = if args.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    let spec = dvsim_utils::read_topology_spec(&args.topology)
        .with_context(|| format!("failed to read topology {}", args.topology.display()))?;
    let (names, nodes, links) = spec.resolve().context("failed to resolve node names")?;
    log::info!(
        "loaded topology: {} node(s), {} link declaration(s)",
        nodes.len(),
        links.len()
    );

    let opts = RunOpts::builder().round_cap(round_cap).build();
    match dvsim_core::run(&nodes, &links, opts) {
        Ok(outcome) => {
            log::info!("converged after {} round(s)", outcome.rounds);
            report::write_report(&outcome.tables, &names, format, args.output.as_deref())
                .context("failed to write report")?;
            Ok(())
        }
        Err(Error::NonConvergence { rounds, tables }) => {
            // Surface the last-known tables before failing; they are the best clue to
            // what kept changing.
            log::error!("no convergence after {rounds} round(s); last-known tables follow");
            eprintln!("{}", report::text_report(&tables, &names));
            anyhow::bail!("simulation did not converge within {rounds} round(s)")
        }
        Err(err) => Err(err).context("simulation failed"),
    }
}
