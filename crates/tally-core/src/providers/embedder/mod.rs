pub mod fake;
pub mod openai;

pub use fake::FakeEmbedder;
pub use openai::OpenAiEmbedder;

/// Sentence embedding model. One vector per input text, all of the same dimension.
pub trait Embedder {
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;
    fn name(&self) -> &'static str;
    fn model_id(&self) -> String;
}
