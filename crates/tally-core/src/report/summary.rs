use crate::model::TrialBatch;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    pub id: String,
    pub result: TrialBatch,
}

impl ItemOutcome {
    /// All trials resolved to the same choice (order-insensitive answer).
    pub fn is_consistent(&self) -> bool {
        let mut answers = self
            .result
            .trials
            .values()
            .map(|r| r.multiple_choice_answer.as_str());
        match answers.next() {
            Some(first) => answers.all(|a| a == first),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub items: usize,
    pub trials_per_item: usize,
    pub total_trials: usize,
    pub unresolved_trials: usize,
    /// Items whose answer did not change across shuffled orders.
    pub consistent_items: usize,
    /// Items that carried a ground truth.
    pub scored_items: usize,
    /// Mean of per-item aggregate accuracy over scored items.
    pub accuracy: Option<f64>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[ItemOutcome], trials_per_item: usize) -> Self {
        let accuracies: Vec<f64> = outcomes.iter().filter_map(|o| o.result.accuracy).collect();
        let accuracy = if accuracies.is_empty() {
            None
        } else {
            Some(accuracies.iter().sum::<f64>() / accuracies.len() as f64)
        };

        Self {
            items: outcomes.len(),
            trials_per_item,
            total_trials: outcomes.iter().map(|o| o.result.len()).sum(),
            unresolved_trials: outcomes.iter().map(|o| o.result.unresolved()).sum(),
            consistent_items: outcomes.iter().filter(|o| o.is_consistent()).count(),
            scored_items: accuracies.len(),
            accuracy,
        }
    }

    pub fn render_console(&self) -> String {
        let accuracy = match self.accuracy {
            Some(a) => format!("{:.2}% ({} scored)", a * 100.0, self.scored_items),
            None => "n/a (no ground truth)".to_string(),
        };
        format!(
            "items: {}  trials/item: {}\naccuracy: {}\nunresolved: {}/{} trials\norder-consistent: {}/{} items",
            self.items,
            self.trials_per_item,
            accuracy,
            self.unresolved_trials,
            self.total_trials,
            self.consistent_items,
            self.items
        )
    }
}
