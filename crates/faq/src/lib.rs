//! FAQ matching for the helpdesk service.
//!
//! Answers a free-text question from a fixed FAQ corpus when a TF-IDF
//! cosine match is confident enough, and hands it to an external
//! answer delegate otherwise.
//!
//! Pipeline: question → [`preprocess`] → [`TfidfVectorizer`] projection →
//! cosine similarity against every FAQ question → threshold → FAQ answer
//! or [`AnswerDelegate`].

pub mod corpus;
pub mod delegate;
pub mod matcher;
pub mod preprocess;
pub mod vectorizer;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use corpus::{FaqCorpus, FaqEntry};
pub use delegate::{AnswerDelegate, DelegateError, FallbackMessages, LlmDelegate};
pub use matcher::{Answer, AnswerSource, MatchOutcome, Matcher, MatcherConfig};
pub use preprocess::{is_stop_word, preprocess};
pub use vectorizer::{cosine_similarity, TfidfVectorizer};
