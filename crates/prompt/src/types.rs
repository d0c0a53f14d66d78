//! Prompt types for the helpdesk delegate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the built-in delegate prompt.
pub const DEFAULT_PROMPT_ID: &str = "helpdesk.delegate.default";

/// Template used when no prompt file is configured.
pub const DEFAULT_TEMPLATE: &str =
    "Please provide a concise, friendly answer to the question: {{question}}";

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Optional system instruction, also a Handlebars template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Cap on generated tokens
    #[serde(rename = "maxTokens", default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for PromptDefinition {
    fn default() -> Self {
        Self {
            id: DEFAULT_PROMPT_ID.to_string(),
            title: "Concise friendly answer".to_string(),
            api_version: "1.0".to_string(),
            created_by: "helpdesk".to_string(),
            system: None,
            template: DEFAULT_TEMPLATE.to_string(),
            max_tokens: None,
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt_id: String,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                resolved_variables,
            },
        }
    }
}
