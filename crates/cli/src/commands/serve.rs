//! Serve command handler.

use clap::Args;
use helpdesk_core::{config::AppConfig, AppResult};
use helpdesk_web::AppState;
use std::sync::Arc;

use super::{build_delegate, build_matcher};

/// Run the HTTP chat service
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on (default: 127.0.0.1:5000)
    #[arg(short, long, env = "HELPDESK_BIND")]
    pub bind: Option<String>,
}

impl ServeCommand {
    /// Execute the serve command.
    ///
    /// The bind address has already been merged into `config`.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let matcher = build_matcher(config)?;
        let delegate = build_delegate(config)?;

        let state = Arc::new(AppState::new(Arc::new(matcher), Arc::new(delegate)));

        helpdesk_web::serve(state, &config.bind).await
    }
}
