use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "figmage", version, about = "Fetch design tokens from a Figma file")]
pub struct Args {
    /// Path to the config file (default: .figmage.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract design tokens and save them as a JSON snapshot
    Tokenize {
        /// Skip assets already present in the existing snapshot
        #[arg(long)]
        only_new: bool,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
