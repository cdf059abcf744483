use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod run;
pub use cache::*;
pub use run::*;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Multiple-choice VQA evaluation with answer normalization, response caching and choice-order trials"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a JSONL item file against the configured provider
    Run(RunArgs),
    /// Inspect or clear the response cache
    Cache(CacheArgs),
    /// Write a sample tally.yaml
    Init(InitArgs),
    Version,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "tally.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
