//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use helpdesk_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Renders both the user template and the optional system template with
/// the same variables. HTML escaping is disabled: the output goes to a
/// model, not a browser.
///
/// # Example
/// ```
/// use helpdesk_prompt::{build_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "Do you gift wrap?".to_string());
///
/// let built = build_prompt(&PromptDefinition::default(), vars).unwrap();
/// assert!(built.user.ends_with("Do you gift wrap?"));
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let user = render_template(&definition.template, &variables)?;
    let system = definition
        .system
        .as_deref()
        .map(|template| render_template(template, &variables))
        .transpose()?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.id.clone(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(question: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars
    }

    #[test]
    fn test_render_default_template() {
        let built = build_prompt(&PromptDefinition::default(), vars("Can I pay later?")).unwrap();
        assert_eq!(
            built.user,
            "Please provide a concise, friendly answer to the question: Can I pay later?"
        );
        assert!(built.system.is_none());
        assert_eq!(
            built.metadata.resolved_variables.get("question").map(String::as_str),
            Some("Can I pay later?")
        );
    }

    #[test]
    fn test_question_is_not_html_escaped() {
        let built =
            build_prompt(&PromptDefinition::default(), vars("Is <b>this</b> & that ok?")).unwrap();
        assert!(built.user.ends_with("Is <b>this</b> & that ok?"));
    }

    #[test]
    fn test_system_template_rendered() {
        let def = PromptDefinition {
            system: Some("Support agent. Customer asked: {{question}}".to_string()),
            ..PromptDefinition::default()
        };

        let built = build_prompt(&def, vars("Hi")).unwrap();
        assert_eq!(
            built.system.as_deref(),
            Some("Support agent. Customer asked: Hi")
        );
    }

    #[test]
    fn test_render_template_missing_variable() {
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_render_invalid_template() {
        let result = render_template("Question: {{#if}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
