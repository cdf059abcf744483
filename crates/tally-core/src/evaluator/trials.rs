use super::AnswerEvaluator;
use crate::errors::{EvalError, EvalResult};
use crate::model::TrialBatch;
use crate::prompt::PromptFn;
use crate::providers::backend::QaBackend;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_TRIALS: usize = 3;

impl<B: QaBackend> AnswerEvaluator<B> {
    /// Ask the same question `n_trials` times, each with an independently shuffled
    /// copy of `choices`, to expose sensitivity to choice order.
    ///
    /// `choices` itself is left untouched. Aggregate accuracy is the mean over
    /// trials when `answer` is given and `None` otherwise.
    #[allow(clippy::too_many_arguments)]
    pub fn multiple_choice_qa_random_ordering<R: Rng + ?Sized>(
        &self,
        data: &B::Input,
        question: &str,
        choices: &[String],
        prompt_fn: Option<&PromptFn<'_>>,
        answer: Option<&str>,
        n_trials: usize,
        rng: &mut R,
    ) -> EvalResult<TrialBatch> {
        if n_trials == 0 {
            return Err(EvalError::config("n_trials must be at least 1"));
        }

        let mut trials = BTreeMap::new();
        for i in 0..n_trials {
            let mut shuffled = choices.to_vec();
            shuffled.shuffle(rng);
            debug!(trial = i, order = ?shuffled, "trial choice order");
            let result = self.multiple_choice_qa(data, question, &shuffled, prompt_fn, answer)?;
            trials.insert(i, result);
        }

        Ok(TrialBatch::from_trials(trials))
    }
}
