//! Prompt system for the helpdesk delegate.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions (or the built-in default)
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{load_prompt, load_prompt_or_default};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
