pub mod json;
pub mod summary;

pub use summary::{ItemOutcome, RunSummary};

/// Everything a finished run produces.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunArtifacts {
    pub run_id: String,
    pub model: String,
    pub summary: RunSummary,
    pub items: Vec<ItemOutcome>,
}

impl RunArtifacts {
    pub fn new(model: impl Into<String>, items: Vec<ItemOutcome>, trials_per_item: usize) -> Self {
        let summary = RunSummary::from_outcomes(&items, trials_per_item);
        Self {
            run_id: format!("run-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ")),
            model: model.into(),
            summary,
            items,
        }
    }
}
