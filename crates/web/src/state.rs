//! Shared application state

use helpdesk_faq::{AnswerDelegate, Matcher};
use std::sync::Arc;

/// State shared by every request handler.
///
/// Both members are built once at startup and only read afterwards, so
/// handlers share them without locking.
pub struct AppState {
    /// The fitted FAQ matcher
    pub matcher: Arc<Matcher>,

    /// Where unmatched questions go
    pub delegate: Arc<dyn AnswerDelegate>,
}

impl AppState {
    /// Create the state from a matcher and a delegate
    pub fn new(matcher: Arc<Matcher>, delegate: Arc<dyn AnswerDelegate>) -> Self {
        Self { matcher, delegate }
    }
}
