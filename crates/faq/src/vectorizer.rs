//! TF-IDF term weighting over a fixed document set.
//!
//! Weighting follows the common smoothed scheme:
//! - tokens are runs of two or more word characters
//! - term frequency is the raw count in the document
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! - every document vector is L2-normalised
//!
//! The vocabulary is frozen by [`TfidfVectorizer::fit`]. Projecting new text
//! never refits; tokens outside the vocabulary contribute nothing.

use helpdesk_core::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Tokens the vectorizer counts in `text`, lowercased, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A fitted TF-IDF model.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Term → column, columns assigned in lexicographic term order
    vocabulary: BTreeMap<String, usize>,

    /// Inverse document frequency per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and idf weights over `documents`.
    ///
    /// Fails when the documents contain no countable token at all.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> AppResult<Self> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();

        if terms.is_empty() {
            return Err(AppError::Faq(
                "Empty vocabulary: documents contain only stop words or very short tokens"
                    .to_string(),
            ));
        }

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let distinct: BTreeSet<usize> =
                tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for column in distinct {
                document_frequency[column] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        tracing::debug!(
            "Fitted TF-IDF over {} documents, vocabulary size {}",
            documents.len(),
            vocabulary.len()
        );

        Ok(Self { vocabulary, idf })
    }

    /// Fit over `documents` and return the model with each document's vector.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> AppResult<(Self, Vec<Vec<f64>>)> {
        let vectorizer = Self::fit(documents)?;
        let vectors = documents
            .iter()
            .map(|doc| vectorizer.transform(doc.as_ref()))
            .collect();
        Ok((vectorizer, vectors))
    }

    /// Project `text` into the fitted space as an L2-normalised dense vector.
    ///
    /// Text with no in-vocabulary token maps to the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0f64; self.vocabulary.len()];

        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                vector[column] += 1.0;
            }
        }

        for (weight, idf) in vector.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }

    /// Number of distinct terms in the vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `term` is part of the fitted vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// The idf weight of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
