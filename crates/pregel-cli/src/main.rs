// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `pregel`: run demo computations over edge-list files.
//!
//! ```text
//! pregel run --edges graph.txt --algo page-rank --max-supersteps 30
//! pregel profile save fast --concurrency 8 --partitioning degree
//! pregel run --edges graph.txt --profile fast --json
//! ```

mod cli;
mod edges;
mod output;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pregel_config::{Algorithm, ConfigService, FsConfigStore, RunProfile};
use pregel_core::demo::{ConnectedComponents, PageRank, ShortestPaths};
use pregel_core::{Computation, GraphView, Pregel, PregelResult, TerminationFlag};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ProfileCommand, RunArgs};
use crate::output::RunReport;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let service = config_service(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Run(args) => run(&service, &args, &mut out),
        Command::Profile(ProfileCommand::Save { name, settings }) => {
            let profile = settings.apply(RunProfile::default());
            profile
                .save(&service, &name)
                .with_context(|| format!("failed to save profile {name:?}"))?;
            writeln!(
                out,
                "saved profile {name:?} to {}",
                service.store().base().display()
            )?;
            Ok(())
        }
        Command::Profile(ProfileCommand::Show { name }) => {
            let Some(profile) = RunProfile::load(&service, &name)? else {
                bail!("no profile named {name:?}");
            };
            serde_json::to_writer_pretty(&mut out, &profile)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn config_service(cli: &Cli) -> Result<ConfigService<FsConfigStore>> {
    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::at(dir)
            .with_context(|| format!("failed to open config dir {}", dir.display()))?,
        None => FsConfigStore::new().context("failed to open the user config dir")?,
    };
    Ok(ConfigService::new(store))
}

fn run(
    service: &ConfigService<FsConfigStore>,
    args: &RunArgs,
    out: &mut impl Write,
) -> Result<()> {
    let base = match &args.profile {
        Some(name) => RunProfile::load(service, name)?
            .with_context(|| format!("no profile named {name:?}"))?,
        None => RunProfile::default(),
    };
    let profile = args.settings.apply(base);
    profile.validate()?;

    let file = File::open(&args.edges)
        .with_context(|| format!("failed to open {}", args.edges.display()))?;
    let graph = edges::parse_edges(BufReader::new(file), args.undirected)
        .with_context(|| format!("failed to parse {}", args.edges.display()))?;
    info!(
        nodes = graph.node_count(),
        relationships = graph.relationship_count(),
        algorithm = ?profile.algorithm,
        "graph loaded"
    );

    let termination = args
        .timeout_ms
        .map(|ms| TerminationFlag::with_timeout(Duration::from_millis(ms)))
        .unwrap_or_default();

    let result = match profile.algorithm {
        Algorithm::PageRank => execute(&graph, &PageRank::new(profile.damping), &profile, termination),
        Algorithm::Components => execute(&graph, &ConnectedComponents, &profile, termination),
        Algorithm::ShortestPaths => {
            if profile.source >= graph.node_count() {
                bail!(
                    "source node {} is not in the graph ({} nodes)",
                    profile.source,
                    graph.node_count()
                );
            }
            execute(&graph, &ShortestPaths::new(profile.source), &profile, termination)
        }
    }?;

    let report = RunReport::new(profile.algorithm, &result);
    if args.json {
        output::write_json(out, &report)
    } else {
        output::write_table(out, &report, args.top)
    }
}

fn execute<G, C>(
    graph: &G,
    computation: &C,
    profile: &RunProfile,
    termination: TerminationFlag,
) -> Result<PregelResult>
where
    G: GraphView,
    C: Computation,
{
    let result = Pregel::new(graph, computation, profile.engine)
        .with_termination(termination)
        .run()?;
    Ok(result)
}
