//! The answer evaluator: prompt, infer through the response cache, normalize, score.

mod trials;

use crate::cache::{cache_key, ResponseCache};
use crate::config::EvaluatorConfig;
use crate::errors::{EvalError, EvalResult};
use crate::model::QaResult;
use crate::normalize::AnswerNormalizer;
use crate::options::make_options;
use crate::prompt::{default_prompt, PromptFn};
use crate::providers::backend::QaBackend;
use crate::providers::embedder::Embedder;
use tracing::{debug, info, warn};

pub use trials::DEFAULT_TRIALS;

pub struct AnswerEvaluator<B: QaBackend> {
    config: EvaluatorConfig,
    backend: B,
    prompt_fn: Box<PromptFn<'static>>,
    normalizer: AnswerNormalizer,
}

impl<B: QaBackend> AnswerEvaluator<B> {
    /// `embedder` is required when `config.enable_choice_search` is set and
    /// ignored otherwise.
    pub fn new(
        config: EvaluatorConfig,
        backend: B,
        embedder: Option<Box<dyn Embedder>>,
    ) -> EvalResult<Self> {
        let mut normalizer = AnswerNormalizer::new(config.match_order.clone())?;
        if config.enable_choice_search {
            let embedder = embedder.ok_or_else(|| {
                EvalError::config("enable_choice_search requires an embedder")
            })?;
            info!(
                embedder = embedder.name(),
                model = %embedder.model_id(),
                "choice search enabled"
            );
            normalizer = normalizer.with_embedder(embedder);
        }

        match &config.cache_path {
            Some(path) => info!(
                cache_path = %path.display(),
                size_limit = config.cache_size_limit,
                "model cache is enabled"
            ),
            None => info!("model cache is disabled"),
        }

        Ok(Self {
            config,
            backend,
            prompt_fn: Box::new(default_prompt),
            normalizer,
        })
    }

    /// Replace the default prompt builder.
    pub fn with_prompt_fn(
        mut self,
        prompt_fn: impl Fn(&str, &[String]) -> String + 'static,
    ) -> Self {
        self.prompt_fn = Box::new(prompt_fn);
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn call_backend(&self, data: &B::Input, prompt: &str, batched: bool) -> EvalResult<String> {
        let out = if batched {
            self.backend.batch_qa(data, prompt)
        } else {
            self.backend.qa(data, prompt)
        };
        out.map_err(EvalError::Backend)
    }

    /// Backend answer for `(data, prompt)`, served from the response cache when
    /// one is configured.
    ///
    /// The cache is opened for this call only. Backend failures are returned
    /// as-is and nothing is stored for them.
    pub fn qa_with_cache(&self, data: &B::Input, prompt: &str, batched: bool) -> EvalResult<String> {
        let Some(path) = &self.config.cache_path else {
            return self.call_backend(data, prompt, batched);
        };

        let data_repr = self.backend.data_to_str(data).map_err(EvalError::Backend)?;
        let key = cache_key(&data_repr, prompt);

        let mut cache = ResponseCache::open(path, self.config.cache_size_limit)?;
        if let Some(hit) = cache.get(&key)? {
            debug!(provider = self.backend.provider_name(), "cache hit");
            return Ok(hit);
        }

        debug!(provider = self.backend.provider_name(), "cache miss");
        let response = self.call_backend(data, prompt, batched)?;
        cache.set(&key, &response)?;
        Ok(response)
    }

    /// Open-ended question; the question is the prompt.
    pub fn qa(&self, data: &B::Input, question: &str) -> EvalResult<String> {
        self.qa_with_cache(data, question, false)
    }

    /// Ask a multiple-choice question and resolve the answer to one of `choices`.
    ///
    /// With `answer` (ground truth) supplied, the result carries accuracy 1 or 0.
    pub fn multiple_choice_qa(
        &self,
        data: &B::Input,
        question: &str,
        choices: &[String],
        prompt_fn: Option<&PromptFn<'_>>,
        answer: Option<&str>,
    ) -> EvalResult<QaResult> {
        let opts = make_options(choices, self.config.choice_format)?;
        let prompt = match prompt_fn {
            Some(f) => f(question, &opts.options),
            None => (self.prompt_fn)(question, &opts.options),
        };

        let free_form_answer = self.qa_with_cache(data, &prompt, false)?.trim().to_string();
        let multiple_choice_answer = self.normalizer.normalize(&free_form_answer, &opts)?;
        if multiple_choice_answer.is_empty() {
            warn!(
                model = %self.config.model,
                answer = %free_form_answer,
                "answer did not resolve to any choice"
            );
        }

        let mut result = QaResult {
            free_form_answer,
            multiple_choice_answer,
            choices: opts.choices,
            accuracy: None,
        };
        result.score(answer);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ChoiceFormat;
    use crate::providers::backend::FakeBackend;
    use crate::providers::embedder::FakeEmbedder;
    use tempfile::tempdir;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn evaluator(backend: FakeBackend<str>, config: EvaluatorConfig) -> AnswerEvaluator<FakeBackend<str>> {
        AnswerEvaluator::new(config, backend, None).unwrap()
    }

    #[test]
    fn label_answer_scores() {
        let ev = evaluator(
            FakeBackend::new("fake").with_response("  B \n"),
            EvaluatorConfig::new("fake"),
        );
        let choices = strings(&["cat", "dog", "bird"]);
        let r = ev
            .multiple_choice_qa("img-1", "What animal?", &choices, None, Some("dog"))
            .unwrap();
        assert_eq!(r.free_form_answer, "B");
        assert_eq!(r.multiple_choice_answer, "dog");
        assert_eq!(r.choices, choices);
        assert_eq!(r.accuracy, Some(1));
    }

    #[test]
    fn no_ground_truth_no_accuracy() {
        let ev = evaluator(FakeBackend::new("fake").with_response("zebra"), EvaluatorConfig::new("fake"));
        let r = ev
            .multiple_choice_qa("img", "Q", &strings(&["cat", "dog"]), None, None)
            .unwrap();
        assert_eq!(r.multiple_choice_answer, "");
        assert_eq!(r.accuracy, None);
    }

    #[test]
    fn custom_prompt_fn_is_used() {
        let ev = evaluator(FakeBackend::new("fake").with_response("1"), EvaluatorConfig::new("fake"))
            .with_prompt_fn(|q, opts| format!("{q} :: {}", opts.join(" | ")));
        let seen = std::cell::RefCell::new(String::new());
        let per_call = |q: &str, opts: &[String]| {
            let p = format!("override {q} {}", opts.len());
            *seen.borrow_mut() = p.clone();
            p
        };
        ev.multiple_choice_qa("img", "Q", &strings(&["x", "y"]), Some(&per_call), None)
            .unwrap();
        assert_eq!(*seen.borrow(), "override Q 2");
        assert_eq!((ev.prompt_fn)("Q", &strings(&["A. x"])), "Q :: A. x");
    }

    #[test]
    fn number_format() {
        let ev = evaluator(
            FakeBackend::new("fake").with_response("2."),
            EvaluatorConfig::new("fake").with_choice_format(ChoiceFormat::Number),
        );
        let r = ev
            .multiple_choice_qa("img", "Q", &strings(&["red", "blue"]), None, Some("red"))
            .unwrap();
        assert_eq!(r.multiple_choice_answer, "blue");
        assert_eq!(r.accuracy, Some(0));
    }

    #[test]
    fn cache_dedupes_identical_calls() {
        let tmp = tempdir().unwrap();
        let ev = evaluator(
            FakeBackend::new("fake").with_script(["first", "second"]),
            EvaluatorConfig::new("fake").with_cache(tmp.path()),
        );
        assert_eq!(ev.qa_with_cache("img", "p", false).unwrap(), "first");
        assert_eq!(ev.qa_with_cache("img", "p", false).unwrap(), "first");
        assert_eq!(ev.backend().calls(), 1);

        // a different input or prompt is a different key
        assert_eq!(ev.qa_with_cache("img2", "p", false).unwrap(), "second");
        assert_eq!(ev.backend().calls(), 2);
    }

    #[test]
    fn batched_flag_selects_batch_qa() {
        let ev = evaluator(FakeBackend::new("fake"), EvaluatorConfig::new("fake"));
        ev.qa_with_cache("img", "p", true).unwrap();
        ev.qa_with_cache("img", "p", false).unwrap();
        assert_eq!(ev.backend().batch_calls(), 1);
        assert_eq!(ev.backend().calls(), 2);
    }

    #[test]
    fn no_cache_calls_every_time() {
        let ev = evaluator(FakeBackend::new("fake"), EvaluatorConfig::new("fake"));
        for _ in 0..3 {
            ev.qa("img", "What is this?").unwrap();
        }
        assert_eq!(ev.backend().calls(), 3);
    }

    #[test]
    fn choice_search_requires_embedder() {
        let err = AnswerEvaluator::new(
            EvaluatorConfig::new("fake").with_choice_search(true),
            FakeBackend::<str>::new("fake"),
            None,
        )
        .err()
        .unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn choice_search_resolves_paraphrase() {
        let embedder = FakeEmbedder::new("fake-embed", vec![0.0, 0.0])
            .with_vector("a small feline", vec![1.0, 0.1])
            .with_vector("cat", vec![1.0, 0.0])
            .with_vector("dog", vec![0.0, 1.0]);
        let ev = AnswerEvaluator::new(
            EvaluatorConfig::new("fake").with_choice_search(true),
            FakeBackend::<str>::new("fake").with_response("a small feline"),
            Some(Box::new(embedder)),
        )
        .unwrap();
        let r = ev
            .multiple_choice_qa("img", "Q", &strings(&["dog", "cat"]), None, Some("cat"))
            .unwrap();
        assert_eq!(r.multiple_choice_answer, "cat");
        assert_eq!(r.accuracy, Some(1));
    }

    #[test]
    fn empty_choices_fail_fast_without_backend_call() {
        let ev = evaluator(FakeBackend::new("fake"), EvaluatorConfig::new("fake"));
        let err = ev.multiple_choice_qa("img", "Q", &[], None, None).unwrap_err();
        assert!(err.is_config());
        assert_eq!(ev.backend().calls(), 0);
    }
}
