use anyhow::Result;
use async_trait::async_trait;

use crate::config::Settings;
use crate::summary::gemini::GeminiClient;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a prepared prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.summary.provider.to_lowercase().as_str() {
        "gemini" => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported summary.provider '{}'. Supported providers: gemini",
            other
        ),
    }
}
