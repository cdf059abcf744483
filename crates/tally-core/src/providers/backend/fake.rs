use super::QaBackend;
use serde::Serialize;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Offline backend: answers from a script, then falls back to a fixed response.
///
/// Inputs are keyed by their JSON serialization.
pub struct FakeBackend<I: ?Sized = serde_json::Value> {
    pub model: String,
    fixed_response: String,
    script: Mutex<VecDeque<String>>,
    calls: Arc<AtomicUsize>,
    batch_calls: Arc<AtomicUsize>,
    _input: PhantomData<fn(&I)>,
}

impl<I: ?Sized> FakeBackend<I> {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            fixed_response: "A".to_string(),
            script: Mutex::new(VecDeque::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            batch_calls: Arc::new(AtomicUsize::new(0)),
            _input: PhantomData,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = response.into();
        self
    }

    /// Answers returned in order before the fixed response takes over.
    pub fn with_script<S: Into<String>>(self, answers: impl IntoIterator<Item = S>) -> Self {
        self.script
            .lock()
            .unwrap()
            .extend(answers.into_iter().map(Into::into));
        self
    }

    /// Total backend invocations, batched or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn next_answer(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fixed_response.clone())
    }
}

impl<I: Serialize + ?Sized> QaBackend for FakeBackend<I> {
    type Input = I;

    fn qa(&self, _data: &I, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.next_answer())
    }

    fn batch_qa(&self, _data: &I, _prompt: &str) -> anyhow::Result<String> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.next_answer())
    }

    fn data_to_str(&self, data: &I) -> anyhow::Result<String> {
        Ok(serde_json::to_string(data)?)
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_then_fixed() {
        let backend: FakeBackend<str> = FakeBackend::new("fake-vqa")
            .with_response("C")
            .with_script(["A", "B"]);
        assert_eq!(backend.qa("img", "p").unwrap(), "A");
        assert_eq!(backend.batch_qa("img", "p").unwrap(), "B");
        assert_eq!(backend.qa("img", "p").unwrap(), "C");
        assert_eq!(backend.calls(), 3);
        assert_eq!(backend.batch_calls(), 1);
    }

    #[test]
    fn data_to_str_is_json() {
        let backend: FakeBackend = FakeBackend::new("fake-vqa");
        let data = serde_json::json!({"image": "a.png"});
        assert_eq!(backend.data_to_str(&data).unwrap(), r#"{"image":"a.png"}"#);
    }
}
