//! LLM integration crate for the helpdesk service.
//!
//! Provides a provider-agnostic abstraction for asking a Large Language
//! Model for a completion. Questions the FAQ matcher cannot answer are
//! delegated through this trait.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use helpdesk_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key", Duration::from_secs(30))?;
//! let request = LlmRequest::new("Hello, world!", "gemini-1.5-flash-latest");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
pub use types::ProviderType;
