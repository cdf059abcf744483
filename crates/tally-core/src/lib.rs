pub mod cache;
pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod errors;
pub mod evaluator;
pub mod model;
pub mod normalize;
pub mod options;
pub mod prompt;
pub mod providers;
pub mod report;

pub use errors::{EvalError, EvalResult};
pub use evaluator::AnswerEvaluator;
pub use model::{QaResult, TrialBatch};
