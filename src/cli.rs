use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Slice mock generator - keeps slice preview mocks in step with their models
#[derive(Parser, Debug, Clone)]
#[command(name = "slicemock", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SLICEMOCK_CONFIG", default_value = "slicemock.toml", global = true)]
    pub config: PathBuf,

    /// Project root that libraries are resolved against
    #[arg(long, env = "SLICEMOCK_CWD", global = true)]
    pub cwd: Option<PathBuf>,

    /// Seed for reproducible mocks
    #[arg(long, env = "SLICEMOCK_SEED", global = true)]
    pub seed: Option<u64>,

    /// Slice libraries, comma separated or repeated (e.g. "@/slices")
    #[arg(
        short,
        long = "library",
        env = "SLICEMOCK_LIBRARIES",
        value_delimiter = ',',
        global = true
    )]
    pub libraries: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Reconcile the mocks of one slice model and print or write them
    Generate(GenerateArgs),

    /// Validate stored mocks of every configured library
    Check {
        /// Regenerate missing or invalid mocks
        #[arg(long)]
        replace: bool,
    },

    /// Update mocks whenever a model changes
    Watch,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    /// Slice model (JSON or YAML)
    #[arg(long)]
    pub model: PathBuf,

    /// Previously stored mocks to reconcile against
    #[arg(long)]
    pub mocks: Option<PathBuf>,

    /// Mock config with per-variation overrides
    #[arg(long)]
    pub mock_config: Option<PathBuf>,

    /// Slice diff describing the model edit
    #[arg(long, conflicts_with = "previous_model")]
    pub diff: Option<PathBuf>,

    /// Previous model; the diff is computed against it
    #[arg(long)]
    pub previous_model: Option<PathBuf>,

    /// Write the mocks here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
