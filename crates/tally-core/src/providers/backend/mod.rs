pub mod fake;
pub mod openai;

pub use fake::FakeBackend;
pub use openai::{ImageInput, OpenAiBackend};

/// A model family capable of answering a prompt about some input.
///
/// `data_to_str` produces the canonical form of an input used in response cache
/// keys. It must be deterministic, and two distinct inputs must never map to the
/// same string.
pub trait QaBackend {
    type Input: ?Sized;

    fn qa(&self, data: &Self::Input, prompt: &str) -> anyhow::Result<String>;

    fn batch_qa(&self, data: &Self::Input, prompt: &str) -> anyhow::Result<String> {
        self.qa(data, prompt)
    }

    fn data_to_str(&self, data: &Self::Input) -> anyhow::Result<String>;

    fn provider_name(&self) -> &'static str;
}

impl<B: QaBackend + ?Sized> QaBackend for Box<B> {
    type Input = B::Input;

    fn qa(&self, data: &Self::Input, prompt: &str) -> anyhow::Result<String> {
        (**self).qa(data, prompt)
    }

    fn batch_qa(&self, data: &Self::Input, prompt: &str) -> anyhow::Result<String> {
        (**self).batch_qa(data, prompt)
    }

    fn data_to_str(&self, data: &Self::Input) -> anyhow::Result<String> {
        (**self).data_to_str(data)
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
