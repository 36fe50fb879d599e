// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pregel_config::{Algorithm, RunProfile};
use pregel_core::Partitioning;

/// Run vertex-centric graph computations over edge-list files.
#[derive(Parser, Debug)]
#[command(name = "pregel", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding saved profiles (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load an edge list and run a demo computation over it
    Run(RunArgs),
    /// Manage saved run profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

/// `pregel profile ...`
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Save a profile under NAME (unset flags keep their defaults)
    Save {
        /// Profile name
        name: String,
        /// Settings to store
        #[command(flatten)]
        settings: Settings,
    },
    /// Print a saved profile as JSON
    Show {
        /// Profile name
        name: String,
    },
}

/// `pregel run ...`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Edge-list file: one `src dst [weight]` per line, `#` starts a comment
    #[arg(long)]
    pub edges: PathBuf,

    /// Store every edge in both directions
    #[arg(long)]
    pub undirected: bool,

    /// Start from a saved profile; explicit flags override it
    #[arg(long)]
    pub profile: Option<String>,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Rows to print in table mode
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Cancel the run after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Run settings
    #[command(flatten)]
    pub settings: Settings,
}

/// Settings shared by `run` and `profile save`.
#[derive(Args, Debug, Default)]
pub struct Settings {
    /// Computation to run
    #[arg(long, value_enum)]
    pub algo: Option<AlgoArg>,

    /// Damping factor for page-rank
    #[arg(long)]
    pub damping: Option<f64>,

    /// Source node for sssp
    #[arg(long)]
    pub source: Option<usize>,

    /// Superstep budget
    #[arg(long)]
    pub max_supersteps: Option<usize>,

    /// Worker threads
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Nodes per partition
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// How the node space is partitioned
    #[arg(long, value_enum)]
    pub partitioning: Option<PartitioningArg>,
}

impl Settings {
    /// Overlays the explicitly given flags onto `base`.
    pub fn apply(&self, mut base: RunProfile) -> RunProfile {
        if let Some(algo) = self.algo {
            base.algorithm = algo.into();
        }
        if let Some(damping) = self.damping {
            base.damping = damping;
        }
        if let Some(source) = self.source {
            base.source = source;
        }
        if let Some(max_supersteps) = self.max_supersteps {
            base.engine.max_supersteps = max_supersteps;
        }
        if let Some(concurrency) = self.concurrency {
            base.engine.concurrency = concurrency;
        }
        if let Some(batch_size) = self.batch_size {
            base.engine.batch_size = Some(batch_size);
        }
        if let Some(partitioning) = self.partitioning {
            base.engine.partitioning = partitioning.into();
        }
        base
    }
}

/// `--algo` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlgoArg {
    /// Rank propagation
    PageRank,
    /// Weakly connected components
    Components,
    /// Single-source shortest paths
    Sssp,
}

impl From<AlgoArg> for Algorithm {
    fn from(arg: AlgoArg) -> Self {
        match arg {
            AlgoArg::PageRank => Self::PageRank,
            AlgoArg::Components => Self::Components,
            AlgoArg::Sssp => Self::ShortestPaths,
        }
    }
}

/// `--partitioning` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartitioningArg {
    /// Fixed-size node ranges
    Range,
    /// Degree-balanced node ranges
    Degree,
}

impl From<PartitioningArg> for Partitioning {
    fn from(arg: PartitioningArg) -> Self {
        match arg {
            PartitioningArg::Range => Self::Range,
            PartitioningArg::Degree => Self::Degree,
        }
    }
}
