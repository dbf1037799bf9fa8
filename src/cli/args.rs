use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::processors::Tier;

#[derive(Parser)]
#[command(name = "weather-pipeline")]
#[command(about = "Daily weather pipeline: raw batches to bronze, silver and gold Parquet tiers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        default_value = ".",
        help = "Project root containing the data/ directory"
    )]
    pub root: PathBuf,

    #[arg(long, global = true, help = "TOML settings file overriding limits and output options")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Parquet compression: snappy, gzip, lz4, zstd or none"
    )]
    pub compression: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest data/input/batch_{id}.csv into bronze
    Ingest {
        #[arg(short, long, help = "Batch id like \"01\"")]
        batch_id: String,
    },

    /// Rebuild silver from all bronze batches
    Silver {
        #[arg(short, long, help = "Batch id that triggered the rebuild (logged only)")]
        batch_id: Option<String>,
    },

    /// Rebuild gold features from silver
    Gold {
        #[arg(short, long, help = "Batch id that triggered the rebuild (logged only)")]
        batch_id: Option<String>,
    },

    /// Ingest one batch, then rebuild silver and gold
    Run {
        #[arg(short, long, help = "Batch id like \"01\"")]
        batch_id: String,
    },

    /// Re-validate persisted artifacts against their tier schema
    Validate {
        #[arg(short, long, value_enum, default_value = "all")]
        tier: TierArg,
    },

    /// Display information about a Parquet artifact
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Bronze,
    Silver,
    Gold,
    All,
}

impl TierArg {
    pub fn tiers(&self) -> Vec<Tier> {
        match self {
            TierArg::Bronze => vec![Tier::Bronze],
            TierArg::Silver => vec![Tier::Silver],
            TierArg::Gold => vec![Tier::Gold],
            TierArg::All => Tier::ALL.to_vec(),
        }
    }
}
