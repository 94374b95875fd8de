pub mod gemini;

use crate::domain::error::Result;
use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Text-generation seam. The production implementation talks to the Gemini
/// API; tests drive the use cases with stubs.
#[async_trait]
pub trait GenerativeClient {
    /// Generate free text for a prompt. `grounding` asks the provider to
    /// augment the answer with its web-search tool.
    async fn generate(&self, prompt: &str, grounding: bool) -> Result<String>;
}
