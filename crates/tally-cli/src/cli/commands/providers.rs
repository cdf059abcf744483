//! Concrete backends and embedders from their config sections.

use anyhow::Context;
use tally_core::config::{EmbedderConfig, ProviderConfig, RunConfig};
use tally_core::prompt::PromptTemplate;
use tally_core::providers::backend::{FakeBackend, ImageInput, OpenAiBackend, QaBackend};
use tally_core::providers::embedder::{Embedder, FakeEmbedder, OpenAiEmbedder};
use tally_core::AnswerEvaluator;

pub type DynBackend = Box<dyn QaBackend<Input = ImageInput>>;

fn api_key(env: &str) -> anyhow::Result<String> {
    std::env::var(env).with_context(|| format!("environment variable {env} is not set"))
}

pub fn build_backend(cfg: &ProviderConfig) -> anyhow::Result<DynBackend> {
    match cfg {
        ProviderConfig::OpenAi {
            model,
            base_url,
            api_key_env,
            temperature,
            max_tokens,
        } => {
            let mut backend =
                OpenAiBackend::new(model.clone(), api_key(api_key_env)?, *temperature, *max_tokens);
            if let Some(url) = base_url {
                backend = backend.with_base_url(url.clone());
            }
            Ok(Box::new(backend))
        }
        ProviderConfig::Fake {
            responses,
            response,
        } => Ok(Box::new(
            FakeBackend::<ImageInput>::new("fake")
                .with_response(response.clone())
                .with_script(responses.clone()),
        )),
    }
}

pub fn build_embedder(cfg: &EmbedderConfig) -> anyhow::Result<Box<dyn Embedder>> {
    match cfg {
        EmbedderConfig::OpenAi {
            model,
            base_url,
            api_key_env,
        } => {
            let mut embedder = OpenAiEmbedder::new(model.clone(), api_key(api_key_env)?);
            if let Some(url) = base_url {
                embedder = embedder.with_base_url(url.clone());
            }
            Ok(Box::new(embedder))
        }
        EmbedderConfig::Fake { dims } => Ok(Box::new(FakeEmbedder::new("fake", vec![1.0; *dims]))),
    }
}

pub fn build_evaluator(cfg: &RunConfig) -> anyhow::Result<AnswerEvaluator<DynBackend>> {
    let backend = build_backend(&cfg.provider)?;
    let embedder = match (&cfg.embedder, cfg.evaluator.enable_choice_search) {
        (Some(e), true) => Some(build_embedder(e)?),
        _ => None,
    };

    let mut evaluator = AnswerEvaluator::new(cfg.evaluator.clone(), backend, embedder)?;
    if let Some(raw) = &cfg.prompt_template {
        evaluator = evaluator.with_prompt_fn(PromptTemplate::parse(raw)?.into_prompt_fn());
    }
    Ok(evaluator)
}
