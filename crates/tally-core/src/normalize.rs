//! Answer normalization: map a model's free-form text onto the choice set.

use crate::embeddings;
use crate::errors::{EvalError, EvalResult};
use crate::options::{check_contain, ChoiceOptions};
use crate::providers::embedder::Embedder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// One way of resolving a free-form answer to a choice index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// The answer equals a choice verbatim.
    Exact,
    /// The answer equals a labelled form: `options`, then `prefix1`, then `prefix2`.
    Label,
    /// Nearest choice in embedding space. Passes when no embedder is configured.
    Semantic,
    /// A unique choice (then option, then label) occurs inside the answer.
    Contains,
}

impl MatchStrategy {
    pub fn default_order() -> Vec<MatchStrategy> {
        vec![
            MatchStrategy::Exact,
            MatchStrategy::Label,
            MatchStrategy::Semantic,
            MatchStrategy::Contains,
        ]
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::Label => "label",
            MatchStrategy::Semantic => "semantic",
            MatchStrategy::Contains => "contains",
        };
        f.write_str(s)
    }
}

impl FromStr for MatchStrategy {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(MatchStrategy::Exact),
            "label" => Ok(MatchStrategy::Label),
            "semantic" => Ok(MatchStrategy::Semantic),
            "contains" => Ok(MatchStrategy::Contains),
            other => Err(EvalError::config(format!(
                "unknown match strategy '{other}' (expected exact|label|semantic|contains)"
            ))),
        }
    }
}

fn position(entries: &[String], answer: &str) -> Option<usize> {
    entries.iter().position(|e| e == answer)
}

pub struct AnswerNormalizer {
    order: Vec<MatchStrategy>,
    embedder: Option<Box<dyn Embedder>>,
}

impl AnswerNormalizer {
    pub fn new(order: Vec<MatchStrategy>) -> EvalResult<Self> {
        if order.is_empty() {
            return Err(EvalError::config("match order must name at least one strategy"));
        }
        for (i, s) in order.iter().enumerate() {
            if order[..i].contains(s) {
                return Err(EvalError::config(format!(
                    "match strategy '{s}' listed more than once"
                )));
            }
        }
        Ok(Self {
            order,
            embedder: None,
        })
    }

    /// Enable the semantic strategy.
    pub fn with_embedder(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn order(&self) -> &[MatchStrategy] {
        &self.order
    }

    pub fn semantic_enabled(&self) -> bool {
        self.embedder.is_some()
    }

    fn try_strategy(
        &self,
        strategy: MatchStrategy,
        answer: &str,
        opts: &ChoiceOptions,
    ) -> EvalResult<Option<usize>> {
        Ok(match strategy {
            MatchStrategy::Exact => position(&opts.choices, answer),
            MatchStrategy::Label => position(&opts.options, answer)
                .or_else(|| position(&opts.prefix1, answer))
                .or_else(|| position(&opts.prefix2, answer)),
            MatchStrategy::Semantic => match &self.embedder {
                Some(embedder) => Some(embeddings::choice_search(
                    embedder.as_ref(),
                    answer,
                    &opts.choices,
                )?),
                None => None,
            },
            MatchStrategy::Contains => [&opts.choices, &opts.options, &opts.prefix1, &opts.prefix2]
                .into_iter()
                .find_map(|entries| check_contain(answer, entries)),
        })
    }

    /// Resolve `answer` to one of `opts.choices`, or return `""`.
    pub fn normalize(&self, answer: &str, opts: &ChoiceOptions) -> EvalResult<String> {
        for &strategy in &self.order {
            if let Some(idx) = self.try_strategy(strategy, answer, opts)? {
                let choice = opts.choice(idx).ok_or_else(|| {
                    EvalError::config(format!(
                        "strategy '{strategy}' resolved index {idx} outside {} choices",
                        opts.len()
                    ))
                })?;
                debug!(%strategy, answer, choice, "answer resolved");
                return Ok(choice.to_string());
            }
        }
        Ok(String::new())
    }
}
