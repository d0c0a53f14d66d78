//! Command handlers for the helpdesk CLI.

pub mod ask;
pub mod serve;

pub use ask::AskCommand;
pub use serve::ServeCommand;

use helpdesk_core::{config::AppConfig, AppResult};
use helpdesk_faq::{FaqCorpus, LlmDelegate, Matcher, MatcherConfig};

/// Load the FAQ corpus and fit the matcher described by `config`.
pub fn build_matcher(config: &AppConfig) -> AppResult<Matcher> {
    let corpus = FaqCorpus::load_or_builtin(config.faq_file.as_deref())?;
    Matcher::new(corpus, MatcherConfig::from(config))
}

/// Build the delegate described by `config`.
pub fn build_delegate(config: &AppConfig) -> AppResult<LlmDelegate> {
    LlmDelegate::from_config(config)
}
