//! FAQ matcher: decides between a canned FAQ answer and delegation.
//!
//! The matcher is built once at startup from a corpus. It preprocesses every
//! FAQ question, fits the TF-IDF model over them and keeps each question's
//! vector. After construction it is read-only and can be shared across
//! request handlers behind an `Arc`.

use crate::corpus::FaqCorpus;
use crate::delegate::{AnswerDelegate, FallbackMessages};
use crate::preprocess::preprocess;
use crate::vectorizer::{cosine_similarity, TfidfVectorizer};
use helpdesk_core::{AppConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default similarity a match must strictly exceed.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Matcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// A FAQ answer is returned only when the best score is strictly greater
    pub threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl From<&AppConfig> for MatcherConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            threshold: config.threshold,
        }
    }
}

/// Result of scoring a question against the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Index of the best-scoring FAQ entry (first one on ties)
    pub index: usize,

    /// Cosine similarity of that entry, in [0, 1]
    pub score: f64,

    /// Whether `score` clears the threshold
    pub matched: bool,
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// A canned FAQ answer
    Faq,
    /// Text generated by the delegate
    Delegate,
    /// A fixed message standing in for a failed delegation
    Fallback,
}

/// The answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// Text shown to the user
    pub text: String,

    /// Where the text came from
    pub source: AnswerSource,

    /// The FAQ question that matched, for `AnswerSource::Faq`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_question: Option<String>,

    /// Best similarity score against the corpus
    pub score: f64,
}

/// Immutable matching context built once over a FAQ corpus.
#[derive(Debug, Clone)]
pub struct Matcher {
    corpus: FaqCorpus,
    vectorizer: TfidfVectorizer,
    faq_vectors: Vec<Vec<f64>>,
    config: MatcherConfig,
    fallbacks: FallbackMessages,
}

impl Matcher {
    /// Fit the matcher over `corpus`.
    ///
    /// Fails when the threshold is outside [0, 1], when the preprocessed
    /// questions leave nothing to build a vocabulary from, or when some entry
    /// could never be returned for its own question: it has no matchable
    /// term, or it preprocesses to the same text as an earlier entry.
    pub fn new(corpus: FaqCorpus, config: MatcherConfig) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&config.threshold) {
            return Err(AppError::Faq(format!(
                "Similarity threshold must be within [0, 1], got {}",
                config.threshold
            )));
        }

        let processed: Vec<String> = corpus.questions().map(preprocess).collect();
        let (vectorizer, faq_vectors) = TfidfVectorizer::fit_transform(&processed)?;

        // Every entry must be reachable by its own question
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, (entry, vector)) in corpus.entries().iter().zip(&faq_vectors).enumerate() {
            if vector.iter().all(|&weight| weight == 0.0) {
                return Err(AppError::Faq(format!(
                    "FAQ question {:?} has no matchable terms after preprocessing",
                    entry.question
                )));
            }
            if let Some(&earlier) = seen.get(processed[index].as_str()) {
                return Err(AppError::Faq(format!(
                    "FAQ question {:?} is indistinguishable from {:?} after preprocessing",
                    entry.question,
                    corpus.entries()[earlier].question
                )));
            }
            seen.insert(processed[index].as_str(), index);
        }

        tracing::info!(
            "FAQ matcher ready: {} entries, vocabulary size {}, threshold {}",
            corpus.len(),
            vectorizer.vocabulary_len(),
            config.threshold
        );

        Ok(Self {
            corpus,
            vectorizer,
            faq_vectors,
            config,
            fallbacks: FallbackMessages::default(),
        })
    }

    /// Replace the messages used when delegation fails.
    pub fn with_fallbacks(mut self, fallbacks: FallbackMessages) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn corpus(&self) -> &FaqCorpus {
        &self.corpus
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn fallbacks(&self) -> &FallbackMessages {
        &self.fallbacks
    }

    /// Score `question` against every FAQ entry and pick the best one.
    ///
    /// Ties go to the entry that comes first in the corpus. A question with
    /// no known terms scores 0 against everything and matches nothing.
    pub fn best_match(&self, question: &str) -> MatchOutcome {
        let processed = preprocess(question);
        let query = self.vectorizer.transform(&processed);

        let mut index = 0;
        let mut score = f64::MIN;
        for (i, faq_vector) in self.faq_vectors.iter().enumerate() {
            let similarity = cosine_similarity(&query, faq_vector);
            // Strict comparison keeps the earliest entry on ties
            if similarity > score {
                index = i;
                score = similarity;
            }
        }

        let score = score.clamp(0.0, 1.0);
        let matched = score > self.config.threshold;

        tracing::debug!(
            "Best FAQ match for {:?}: entry {} with score {:.4} (matched: {})",
            processed,
            index,
            score,
            matched
        );

        MatchOutcome {
            index,
            score,
            matched,
        }
    }

    /// Answer `question` from the corpus, or through `delegate`.
    ///
    /// The delegate receives the raw question. A failed delegation turns
    /// into one of the configured fallback messages; this never fails.
    pub async fn answer(&self, question: &str, delegate: &dyn AnswerDelegate) -> Answer {
        let outcome = self.best_match(question);

        if outcome.matched {
            if let Some(entry) = self.corpus.get(outcome.index) {
                tracing::info!(
                    "Answered from FAQ {:?} (score {:.3})",
                    entry.question,
                    outcome.score
                );
                return Answer {
                    text: entry.answer.clone(),
                    source: AnswerSource::Faq,
                    matched_question: Some(entry.question.clone()),
                    score: outcome.score,
                };
            }
        }

        tracing::info!(
            "No FAQ above threshold (best score {:.3}); delegating",
            outcome.score
        );

        match delegate.generate(question).await {
            Ok(text) => Answer {
                text,
                source: AnswerSource::Delegate,
                matched_question: None,
                score: outcome.score,
            },
            Err(err) => {
                tracing::warn!("Delegation failed: {}", err);
                Answer {
                    text: self.fallbacks.for_error(&err).to_string(),
                    source: AnswerSource::Fallback,
                    matched_question: None,
                    score: outcome.score,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FaqEntry;
    use crate::delegate::DelegateError;

    struct NoDelegate;

    #[async_trait::async_trait]
    impl AnswerDelegate for NoDelegate {
        async fn generate(&self, _question: &str) -> Result<String, DelegateError> {
            Err(DelegateError::NotConfigured)
        }
    }

    fn small_corpus() -> FaqCorpus {
        FaqCorpus::new(vec![
            FaqEntry::new("Where is my parcel?", "Check the tracking page."),
            FaqEntry::new("Can I change my parcel address?", "Yes, before dispatch."),
            FaqEntry::new("Do you sell gift cards?", "Yes, online only."),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let result = Matcher::new(small_corpus(), MatcherConfig { threshold: 1.2 });
        assert!(matches!(result, Err(AppError::Faq(_))));
    }

    #[test]
    fn test_rejects_corpus_of_stop_words() {
        let corpus = FaqCorpus::new(vec![FaqEntry::new("What is it?", "Nothing.")]).unwrap();
        assert!(Matcher::new(corpus, MatcherConfig::default()).is_err());
    }

    #[test]
    fn test_rejects_question_without_matchable_terms() {
        // Only stop words, and a single-character token
        for question in ["Who are you?", "Is it X?"] {
            let corpus = FaqCorpus::new(vec![
                FaqEntry::new("Do you ship?", "A"),
                FaqEntry::new(question, "B"),
            ])
            .unwrap();

            match Matcher::new(corpus, MatcherConfig::default()) {
                Err(AppError::Faq(message)) => assert!(message.contains(question)),
                other => panic!("Expected FAQ error for {:?}, got {:?}", question, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_rejects_questions_equal_after_preprocessing() {
        let corpus = FaqCorpus::new(vec![
            FaqEntry::new("Do you ship?", "A"),
            FaqEntry::new("Do you ship??", "B"),
        ])
        .unwrap();

        match Matcher::new(corpus, MatcherConfig::default()) {
            Err(AppError::Faq(message)) => assert!(message.contains("indistinguishable")),
            other => panic!("Expected FAQ error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_every_entry_reachable_after_validation() {
        let corpus = small_corpus();
        let matcher = Matcher::new(corpus.clone(), MatcherConfig::default()).unwrap();
        for (i, entry) in corpus.entries().iter().enumerate() {
            assert_eq!(matcher.best_match(&entry.question).index, i);
        }
    }

    #[test]
    fn test_verbatim_question_matches_itself() {
        let matcher = Matcher::new(small_corpus(), MatcherConfig::default()).unwrap();
        for (i, question) in ["Where is my parcel?", "Can I change my parcel address?", "Do you sell gift cards?"]
            .iter()
            .enumerate()
        {
            let outcome = matcher.best_match(question);
            assert_eq!(outcome.index, i);
            assert!(outcome.matched);
            assert!((outcome.score - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_empty_question_scores_zero() {
        let matcher = Matcher::new(small_corpus(), MatcherConfig::default()).unwrap();
        let outcome = matcher.best_match("");
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.score, 0.0);
        assert!(!outcome.matched);
    }

    #[test]
    fn test_threshold_is_strict() {
        // A threshold equal to a perfect score can never be exceeded
        let matcher = Matcher::new(small_corpus(), MatcherConfig { threshold: 1.0 }).unwrap();
        assert!(!matcher.best_match("Do you sell gift cards?").matched);

        let matcher = Matcher::new(small_corpus(), MatcherConfig { threshold: 0.0 }).unwrap();
        assert!(matcher.best_match("gift").matched);
        assert!(!matcher.best_match("unrelated words").matched);
    }

    #[test]
    fn test_shared_term_prefers_shorter_question() {
        let matcher = Matcher::new(small_corpus(), MatcherConfig::default()).unwrap();
        // "parcel" appears in two entries; the one with fewer other terms wins
        let outcome = matcher.best_match("parcel");
        assert_eq!(outcome.index, 0);
    }

    #[test]
    fn test_matcher_config_from_app_config() {
        let app = AppConfig {
            threshold: 0.42,
            ..AppConfig::default()
        };
        assert_eq!(MatcherConfig::from(&app).threshold, 0.42);
    }

    #[tokio::test]
    async fn test_answer_reports_source() {
        let matcher = Matcher::new(small_corpus(), MatcherConfig::default()).unwrap();

        let answer = matcher.answer("Do you sell gift cards?", &NoDelegate).await;
        assert_eq!(answer.source, AnswerSource::Faq);
        assert_eq!(answer.text, "Yes, online only.");
        assert_eq!(
            answer.matched_question.as_deref(),
            Some("Do you sell gift cards?")
        );

        let answer = matcher.answer("What's the weather?", &NoDelegate).await;
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert_eq!(answer.text, matcher.fallbacks().not_configured);
        assert!(answer.matched_question.is_none());
    }

    #[tokio::test]
    async fn test_custom_fallbacks() {
        let fallbacks = FallbackMessages {
            not_configured: "FAQ only, sorry.".to_string(),
            ..FallbackMessages::default()
        };
        let matcher = Matcher::new(small_corpus(), MatcherConfig::default())
            .unwrap()
            .with_fallbacks(fallbacks);

        let answer = matcher.answer("Anything else?", &NoDelegate).await;
        assert_eq!(answer.text, "FAQ only, sorry.");
    }
}
