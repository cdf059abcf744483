pub mod backend;
pub mod embedder;

/// Default base URL for OpenAI-compatible providers.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
