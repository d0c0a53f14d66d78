//! External answer delegate.
//!
//! Questions the FAQ corpus cannot answer confidently go to a generative
//! model. The delegate never raises: every outcome is either the model's
//! text or a [`DelegateError`] the matcher turns into a fixed message.

use helpdesk_core::{AppConfig, AppResult};
use helpdesk_llm::{create_client, LlmClient, LlmRequest};
use helpdesk_prompt::{build_prompt, load_prompt_or_default, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a delegate produced no answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DelegateError {
    /// No model is configured (e.g. missing API key)
    #[error("answer delegate is not configured")]
    NotConfigured,

    /// The call succeeded but the model returned no text
    #[error("model returned no content ({reason})")]
    EmptyResponse { reason: String },

    /// Network, auth, quota, HTTP status or decoding failure
    #[error("delegate call failed: {reason}")]
    Failed { reason: String },
}

/// Generates an answer for a question the FAQ corpus did not cover.
#[async_trait::async_trait]
pub trait AnswerDelegate: Send + Sync {
    /// Answer `question`, which is passed exactly as the user typed it.
    async fn generate(&self, question: &str) -> Result<String, DelegateError>;
}

/// User-facing messages substituted for a failed delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMessages {
    /// Shown when no model is configured
    pub not_configured: String,

    /// Shown when the model returned nothing (usually a safety filter)
    pub filtered: String,

    /// Shown on any other failure
    pub unavailable: String,
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            not_configured: "I'm sorry, my connection to the AI model is not configured. I can only answer our standard FAQs.".to_string(),
            filtered: "I'm sorry, I couldn't generate a response for that. It might be due to a safety filter.".to_string(),
            unavailable: "I'm sorry, I'm having trouble connecting to my knowledge base right now.".to_string(),
        }
    }
}

impl FallbackMessages {
    /// The message to show for `error`.
    pub fn for_error(&self, error: &DelegateError) -> &str {
        match error {
            DelegateError::NotConfigured => &self.not_configured,
            DelegateError::EmptyResponse { .. } => &self.filtered,
            DelegateError::Failed { .. } => &self.unavailable,
        }
    }
}

/// Delegate backed by an [`LlmClient`].
///
/// Renders the configured prompt around the question and performs exactly
/// one completion call at a fixed temperature. Without a client it answers
/// every call with [`DelegateError::NotConfigured`].
pub struct LlmDelegate {
    client: Option<Arc<dyn LlmClient>>,
    model: String,
    temperature: f32,
    prompt: PromptDefinition,
}

impl LlmDelegate {
    /// Create a delegate around an existing client.
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        temperature: f32,
        prompt: PromptDefinition,
    ) -> Self {
        Self {
            client: Some(client),
            model: model.into(),
            temperature,
            prompt,
        }
    }

    /// A delegate with no model behind it.
    pub fn disabled() -> Self {
        Self {
            client: None,
            model: String::new(),
            temperature: 0.0,
            prompt: PromptDefinition::default(),
        }
    }

    /// Build the delegate described by `config`.
    ///
    /// A missing API key is not an error: it is logged and the delegate is
    /// disabled so the service keeps answering FAQs. An unreadable prompt
    /// file or an unknown provider is an error.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let prompt = load_prompt_or_default(config.prompt_file.as_deref())?;

        if !config.delegation_enabled() {
            tracing::warn!(
                "No API key configured for provider '{}'; answering from FAQs only",
                config.provider
            );
            return Ok(Self {
                prompt,
                ..Self::disabled()
            });
        }

        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )?;

        tracing::info!(
            "Delegation enabled via {} (model {}, temperature {})",
            client.provider_name(),
            config.model,
            config.temperature
        );

        Ok(Self::new(client, &config.model, config.temperature, prompt))
    }

    /// Whether a model is configured.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn build_request(&self, question: &str) -> Result<LlmRequest, DelegateError> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());

        let built = build_prompt(&self.prompt, variables).map_err(|e| DelegateError::Failed {
            reason: e.to_string(),
        })?;

        let mut request =
            LlmRequest::new(built.user, &self.model).with_temperature(self.temperature);

        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        if let Some(max_tokens) = self.prompt.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        Ok(request)
    }
}

#[async_trait::async_trait]
impl AnswerDelegate for LlmDelegate {
    async fn generate(&self, question: &str) -> Result<String, DelegateError> {
        let client = self.client.as_ref().ok_or(DelegateError::NotConfigured)?;
        let request = self.build_request(question)?;

        let response = match client.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error calling {}: {}", client.provider_name(), e);
                return Err(DelegateError::Failed {
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(
            "Raw {} response: model={}, finish_reason={:?}, tokens={}",
            client.provider_name(),
            response.model,
            response.finish_reason,
            response.usage.total_tokens
        );

        if !response.has_content() {
            let reason = response
                .finish_reason
                .unwrap_or_else(|| "no content".to_string());
            tracing::error!(
                "{} call succeeded but returned no content: {}",
                client.provider_name(),
                reason
            );
            return Err(DelegateError::EmptyResponse { reason });
        }

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::AppError;
    use helpdesk_llm::{LlmResponse, LlmUsage};
    use std::sync::Mutex;

    /// Scripted LLM client that records the requests it receives.
    struct ScriptedClient {
        reply: AppResult<LlmResponse>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl ScriptedClient {
        fn replying(content: &str, finish_reason: Option<&str>) -> Self {
            Self {
                reply: Ok(LlmResponse {
                    content: content.to_string(),
                    model: "scripted".to_string(),
                    usage: LlmUsage::new(5, 5),
                    finish_reason: finish_reason.map(str::to_string),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(AppError::Llm(message.to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedClient {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(response) => Ok(response.clone()),
                Err(e) => Err(AppError::Llm(e.to_string())),
            }
        }
    }

    fn delegate_with(client: Arc<ScriptedClient>) -> LlmDelegate {
        LlmDelegate::new(client, "gemini-1.5-flash-latest", 0.7, PromptDefinition::default())
    }

    #[tokio::test]
    async fn test_disabled_delegate() {
        let delegate = LlmDelegate::disabled();
        assert!(!delegate.is_enabled());
        assert_eq!(
            delegate.generate("tell me a joke").await,
            Err(DelegateError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn test_successful_generation() {
        let client = Arc::new(ScriptedClient::replying("Why did the chicken...", Some("STOP")));
        let delegate = delegate_with(client.clone());

        let answer = delegate.generate("Tell me a joke!").await.unwrap();
        assert_eq!(answer, "Why did the chicken...");

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].prompt,
            "Please provide a concise, friendly answer to the question: Tell me a joke!"
        );
        assert_eq!(requests[0].model, "gemini-1.5-flash-latest");
        assert_eq!(requests[0].temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_empty_content_is_filtered() {
        let client = Arc::new(ScriptedClient::replying("", Some("SAFETY")));
        let delegate = delegate_with(client);

        assert_eq!(
            delegate.generate("something risky").await,
            Err(DelegateError::EmptyResponse {
                reason: "SAFETY".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_client_error_is_failed() {
        let client = Arc::new(ScriptedClient::failing("connection refused"));
        let delegate = delegate_with(client.clone());

        let result = delegate.generate("hello").await;
        match result {
            Err(DelegateError::Failed { reason }) => assert!(reason.contains("connection refused")),
            other => panic!("Expected Failed, got {:?}", other),
        }
        // Exactly one attempt, no retries
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_system_and_max_tokens_forwarded() {
        let client = Arc::new(ScriptedClient::replying("ok", None));
        let prompt = PromptDefinition {
            system: Some("You work for ACME.".to_string()),
            max_tokens: Some(128),
            ..PromptDefinition::default()
        };
        let delegate = LlmDelegate::new(client.clone(), "llama3.2", 0.2, prompt);

        delegate.generate("hi").await.unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].system.as_deref(), Some("You work for ACME."));
        assert_eq!(requests[0].max_tokens, Some(128));
        assert_eq!(requests[0].temperature, Some(0.2));
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let config = AppConfig::default();
        assert!(config.api_key.is_none());

        let delegate = LlmDelegate::from_config(&config).unwrap();
        assert!(!delegate.is_enabled());
    }

    #[test]
    fn test_from_config_with_key_is_enabled() {
        let config = AppConfig {
            api_key: Some("key".to_string()),
            ..AppConfig::default()
        };

        let delegate = LlmDelegate::from_config(&config).unwrap();
        assert!(delegate.is_enabled());
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = AppConfig {
            provider: "mystery".to_string(),
            api_key: Some("key".to_string()),
            ..AppConfig::default()
        };

        assert!(LlmDelegate::from_config(&config).is_err());
    }

    #[test]
    fn test_fallback_messages() {
        let messages = FallbackMessages::default();
        assert!(messages
            .for_error(&DelegateError::NotConfigured)
            .contains("not configured"));
        assert!(messages
            .for_error(&DelegateError::EmptyResponse {
                reason: "SAFETY".to_string()
            })
            .contains("safety filter"));
        assert!(messages
            .for_error(&DelegateError::Failed {
                reason: "timeout".to_string()
            })
            .contains("trouble connecting"));
    }
}
