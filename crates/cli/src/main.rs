//! Helpdesk CLI
//!
//! Main entry point for the helpdesk command-line tool.
//! Serves the FAQ chat endpoint or answers a single question.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use helpdesk_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Helpdesk - FAQ answering service with LLM fallback
#[derive(Parser, Debug)]
#[command(name = "helpdesk")]
#[command(about = "FAQ answering service with LLM fallback", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "HELPDESK_CONFIG")]
    config: Option<PathBuf>,

    /// FAQ file (YAML or JSON) replacing the built-in FAQs
    #[arg(short, long, global = true, env = "HELPDESK_FAQ_FILE")]
    faq_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (gemini, ollama)
    #[arg(short, long, global = true, env = "HELPDESK_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "HELPDESK_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP chat service
    Serve(ServeCommand),

    /// Answer a single question and exit
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let bind = match &cli.command {
        Commands::Serve(cmd) => cmd.bind.clone(),
        Commands::Ask(_) => None,
    };

    // File and environment first, then CLI overrides
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(
        bind,
        cli.faq_file,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    tracing::info!("Helpdesk starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["helpdesk", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        match cli.command {
            Commands::Serve(cmd) => assert_eq!(cmd.bind.as_deref(), Some("0.0.0.0:8080")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "helpdesk",
            "ask",
            "What are your business hours?",
            "--json",
            "--provider",
            "ollama",
            "--faq-file",
            "faqs.yaml",
        ])
        .unwrap();

        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert_eq!(cli.faq_file, Some(PathBuf::from("faqs.yaml")));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "What are your business hours?");
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["helpdesk", "ask"]).is_err());
    }

    #[test]
    fn test_ask_rejects_blank_question() {
        for blank in ["", "   "] {
            let err = Cli::try_parse_from(["helpdesk", "ask", blank]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
            assert!(err.to_string().contains("Please ask a question."));
        }
    }
}
