use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Clone)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub cmd: CacheSub,
}

#[derive(Subcommand, Clone)]
pub enum CacheSub {
    /// Entry count and stored volume
    Stats(CacheTarget),
    /// Remove every cached response
    Clear(CacheTarget),
}

#[derive(Parser, Clone)]
pub struct CacheTarget {
    /// Config whose evaluator.cache_path is used when --dir is absent
    #[arg(long, default_value = "tally.yaml")]
    pub config: PathBuf,

    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Print stats as JSON
    #[arg(long)]
    pub json: bool,
}
