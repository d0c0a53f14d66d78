//! Ask command handler.
//!
//! Answers one question through the same matcher and delegate as the
//! HTTP service.

use clap::Args;
use helpdesk_core::{config::AppConfig, AppResult};

use super::{build_delegate, build_matcher};

/// Answer a single question and exit
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(value_parser = non_blank)]
    pub question: String,

    /// Output as JSON (answer, source, score, matched question)
    #[arg(long)]
    pub json: bool,
}

/// Reject a question that is empty or only whitespace.
fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("Please ask a question.".to_string())
    } else {
        Ok(value.to_string())
    }
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let matcher = build_matcher(config)?;
        let delegate = build_delegate(config)?;

        let answer = matcher.answer(&self.question, &delegate).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            println!("{}", answer.text);
        }

        Ok(())
    }
}
