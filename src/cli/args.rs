//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    bom::BomArgs, completions::CompletionsArgs, config::ConfigCommands, deps::DepsArgs,
    init::InitArgs, score::ScoreArgs, tier2::Tier2Args, whatif::WhatIfArgs,
};

#[derive(Parser)]
#[command(name = "srt")]
#[command(author, version, about = "Supply Risk Toolkit")]
#[command(long_about = "Scores electronic components and BOMs for supply-chain risk, from plain YAML records kept in a project directory.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .srt/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new SRT project
    Init(InitArgs),

    /// Score one or more components
    Score(ScoreArgs),

    /// Score a whole BOM with dependency propagation
    Bom(BomArgs),

    /// Dependency graph, cycles and single points of failure
    Deps(DepsArgs),

    /// Tier-2 material bottlenecks of a BOM
    Tier2(Tier2Args),

    /// Simulate a supply disruption against a BOM
    #[command(name = "whatif")]
    WhatIf(WhatIfArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and reports
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}
