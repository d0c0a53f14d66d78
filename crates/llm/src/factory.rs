//! LLM provider factory.
//!
//! Creates an LLM client from the provider name, resolving endpoint and
//! credentials passed in from configuration.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use crate::types::ProviderType;
use helpdesk_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by Gemini)
/// * `timeout` - Timeout applied to every request
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// API key is missing, and `AppError::Llm` if the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    let base_url = endpoint.unwrap_or(provider_type.default_endpoint());

    match provider_type {
        ProviderType::Gemini => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AppError::Config("Gemini provider requires API key".to_string()))?;
            let client = GeminiClient::with_base_url(base_url, api_key, timeout)?;
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = OllamaClient::with_base_url(base_url, timeout)?;
            Ok(Arc::new(client))
        }
    }
}
