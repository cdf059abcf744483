//! Run command arguments.

use std::path::PathBuf;

use clap::Parser;
use tally_core::normalize::MatchStrategy;
use tally_core::options::ChoiceFormat;

#[derive(Parser, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = "tally.yaml")]
    pub config: PathBuf,

    /// JSONL file of {id, image, question, choices, answer?} items
    #[arg(long)]
    pub items: PathBuf,

    /// Where the run JSON is written
    #[arg(long, default_value = ".tally/results.json")]
    pub out: PathBuf,

    /// Shuffled-order trials per item (overrides config)
    #[arg(long)]
    pub trials: Option<usize>,

    /// RNG seed for choice shuffling (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Choice label format: letter|number (overrides config)
    #[arg(long)]
    pub choice_format: Option<ChoiceFormat>,

    /// Comma-separated normalization order, e.g. exact,label,contains (overrides config)
    #[arg(long, value_delimiter = ',')]
    pub match_order: Option<Vec<MatchStrategy>>,

    /// Disable the response cache for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Cache directory (overrides config)
    #[arg(long, conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,
}
