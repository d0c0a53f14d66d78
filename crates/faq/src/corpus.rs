//! The FAQ corpus: an ordered, immutable list of question/answer pairs.

use helpdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A single FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// The canonical question
    pub question: String,

    /// The canned answer returned on a match
    pub answer: String,
}

impl FaqEntry {
    /// Create a new entry.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The reference FAQ set served when no corpus file is configured.
const BUILTIN_FAQS: &[(&str, &str)] = &[
    (
        "What are your business hours?",
        "Our business hours are from 9 AM to 6 PM, Monday to Friday.",
    ),
    (
        "How can I track my order?",
        "You can track your order by visiting the 'Track Order' page on our website and entering your order ID.",
    ),
    (
        "What is your return policy?",
        "We offer a 30-day return policy for all items in their original condition.",
    ),
    (
        "Do you ship internationally?",
        "Yes, we ship to most countries worldwide.",
    ),
    (
        "How do I contact customer support?",
        "You can contact our customer support team via email at support@example.com.",
    ),
    (
        "What payment methods do you accept?",
        "We accept all major credit cards, PayPal, and Apple Pay.",
    ),
];

/// An ordered, validated, immutable FAQ corpus.
///
/// Entry order is significant: it is the tie-break order of the matcher.
#[derive(Debug, Clone)]
pub struct FaqCorpus {
    entries: Vec<FaqEntry>,
}

impl FaqCorpus {
    /// Build a corpus from entries.
    ///
    /// Rejects an empty list, blank questions or answers, and questions
    /// that appear twice.
    pub fn new(entries: Vec<FaqEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::Faq("FAQ corpus cannot be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.question.trim().is_empty() {
                return Err(AppError::Faq(format!(
                    "FAQ entry {} has an empty question",
                    index
                )));
            }
            if entry.answer.trim().is_empty() {
                return Err(AppError::Faq(format!(
                    "FAQ entry {} ({:?}) has an empty answer",
                    index, entry.question
                )));
            }
            if !seen.insert(entry.question.as_str()) {
                return Err(AppError::Faq(format!(
                    "Duplicate FAQ question: {:?}",
                    entry.question
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The built-in reference corpus.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FAQS
                .iter()
                .map(|(question, answer)| FaqEntry::new(*question, *answer))
                .collect(),
        }
    }

    /// Load a corpus from a YAML or JSON file holding a list of entries.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Faq(format!("Failed to read FAQ file {:?}: {}", path, e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let entries: Vec<FaqEntry> = if is_json {
            serde_json::from_str(&contents).map_err(|e| {
                AppError::Faq(format!("Failed to parse FAQ file {:?}: {}", path, e))
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Faq(format!("Failed to parse FAQ file {:?}: {}", path, e))
            })?
        };

        let corpus = Self::new(entries)?;
        tracing::info!("Loaded {} FAQ entries from {:?}", corpus.len(), path);
        Ok(corpus)
    }

    /// Load from `path` when given, else return the built-in corpus.
    pub fn load_or_builtin(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// All entries in corpus order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&FaqEntry> {
        self.entries.get(index)
    }

    /// Questions in corpus order.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.question.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_corpus() {
        let corpus = FaqCorpus::builtin();
        assert_eq!(corpus.len(), 6);
        assert_eq!(
            corpus.get(0).map(|e| e.question.as_str()),
            Some("What are your business hours?")
        );
        // The built-in set must itself pass validation
        assert!(FaqCorpus::new(corpus.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_rejects_empty_corpus() {
        assert!(matches!(FaqCorpus::new(vec![]), Err(AppError::Faq(_))));
    }

    #[test]
    fn test_rejects_blank_fields() {
        let result = FaqCorpus::new(vec![FaqEntry::new("  ", "answer")]);
        assert!(result.is_err());

        let result = FaqCorpus::new(vec![FaqEntry::new("question?", "")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_questions() {
        let result = FaqCorpus::new(vec![
            FaqEntry::new("Do you ship?", "Yes."),
            FaqEntry::new("Do you ship?", "No."),
        ]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_load_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("faqs.yaml");
        std::fs::write(
            &path,
            r#"
- question: "Do you offer gift cards?"
  answer: "Yes, in any amount from $10."
- question: "Where is your warehouse?"
  answer: "Rotterdam."
"#,
        )
        .unwrap();

        let corpus = FaqCorpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.questions().collect::<Vec<_>>(),
            vec!["Do you offer gift cards?", "Where is your warehouse?"]
        );
    }

    #[test]
    fn test_load_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("faqs.json");
        std::fs::write(
            &path,
            r#"[{"question": "Is there a loyalty program?", "answer": "Yes, it is free."}]"#,
        )
        .unwrap();

        let corpus = FaqCorpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.entries()[0].answer, "Yes, it is free.");
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let temp = TempDir::new().unwrap();
        assert!(FaqCorpus::load(&temp.path().join("missing.yaml")).is_err());

        let path = temp.path().join("bad.yaml");
        std::fs::write(&path, "question: not a list").unwrap();
        assert!(matches!(FaqCorpus::load(&path), Err(AppError::Faq(_))));
    }

    #[test]
    fn test_load_or_builtin() {
        let corpus = FaqCorpus::load_or_builtin(None).unwrap();
        assert_eq!(corpus.len(), 6);
    }
}
