use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResult {
    pub free_form_answer: String,
    /// A member of `choices`, or empty when the answer could not be resolved.
    pub multiple_choice_answer: String,
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u8>,
}

impl QaResult {
    pub fn is_resolved(&self) -> bool {
        !self.multiple_choice_answer.is_empty()
    }

    pub(crate) fn score(&mut self, ground_truth: Option<&str>) {
        self.accuracy = ground_truth.map(|gt| u8::from(gt == self.multiple_choice_answer));
    }
}

/// Results of repeating a question under shuffled choice orders.
///
/// Serializes as `{"0": {...}, "1": {...}, "accuracy": 0.67}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialBatch {
    #[serde(flatten)]
    pub trials: BTreeMap<usize, QaResult>,
    /// Mean of per-trial accuracies; `None` when no ground truth was given.
    pub accuracy: Option<f64>,
}

impl TrialBatch {
    pub(crate) fn from_trials(trials: BTreeMap<usize, QaResult>) -> Self {
        let accuracies: Option<Vec<u8>> = trials.values().map(|r| r.accuracy).collect();
        let accuracy = accuracies.filter(|a| !a.is_empty()).map(|a| {
            a.iter().map(|&x| f64::from(x)).sum::<f64>() / a.len() as f64
        });
        Self { trials, accuracy }
    }

    /// A batch holding one trial in the given choice order.
    pub fn single(result: QaResult) -> Self {
        Self::from_trials(BTreeMap::from([(0, result)]))
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Trials whose answer could not be resolved to a choice.
    pub fn unresolved(&self) -> usize {
        self.trials.values().filter(|r| !r.is_resolved()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(mc: &str, accuracy: Option<u8>) -> QaResult {
        QaResult {
            free_form_answer: mc.to_string(),
            multiple_choice_answer: mc.to_string(),
            choices: vec!["cat".into(), "dog".into()],
            accuracy,
        }
    }

    #[test]
    fn scoring() {
        let mut r = result("cat", None);
        r.score(Some("cat"));
        assert_eq!(r.accuracy, Some(1));
        r.score(Some("dog"));
        assert_eq!(r.accuracy, Some(0));
        r.score(None);
        assert_eq!(r.accuracy, None);

        let mut unresolved = result("", None);
        unresolved.score(Some("cat"));
        assert_eq!(unresolved.accuracy, Some(0));
        assert!(!unresolved.is_resolved());
    }

    #[test]
    fn batch_mean_and_shape() {
        let trials = BTreeMap::from([
            (0, result("cat", Some(1))),
            (1, result("dog", Some(0))),
            (2, result("cat", Some(1))),
        ]);
        let batch = TrialBatch::from_trials(trials);
        assert!((batch.accuracy.unwrap() - 2.0 / 3.0).abs() < 1e-12);

        let v = serde_json::to_value(&batch).unwrap();
        assert_eq!(v["0"]["multiple_choice_answer"], "cat");
        assert_eq!(v["2"]["accuracy"], 1);
        assert!(v["accuracy"].is_f64());
    }

    #[test]
    fn single_trial_batch_mirrors_accuracy() {
        let batch = TrialBatch::single(result("dog", Some(0)));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.accuracy, Some(0.0));
    }

    #[test]
    fn batch_without_ground_truth_has_no_accuracy() {
        let trials = BTreeMap::from([(0, result("cat", None)), (1, result("", None))]);
        let batch = TrialBatch::from_trials(trials);
        assert_eq!(batch.accuracy, None);
        assert_eq!(batch.unresolved(), 1);
        let v = serde_json::to_value(&batch).unwrap();
        assert!(v["accuracy"].is_null());
        assert!(v["0"].get("accuracy").is_none());
    }
}
