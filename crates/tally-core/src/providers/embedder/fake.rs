use super::Embedder;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Table-driven embedder for tests and offline runs.
///
/// Texts without an entry get the default vector.
#[derive(Clone)]
pub struct FakeEmbedder {
    pub model: String,
    calls: Arc<AtomicUsize>,
    table: HashMap<String, Vec<f32>>,
    vec: Vec<f32>,
}

impl FakeEmbedder {
    pub fn new(model: &str, vec: Vec<f32>) -> Self {
        Self {
            model: model.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            table: HashMap::new(),
            vec,
        }
    }

    pub fn with_vector(mut self, text: &str, vec: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vec);
        self
    }

    /// Number of `encode` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for FakeEmbedder {
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| self.table.get(*t).unwrap_or(&self.vec).clone())
            .collect())
    }

    fn name(&self) -> &'static str {
        "fake"
    }

    fn model_id(&self) -> String {
        self.model.clone()
    }
}
