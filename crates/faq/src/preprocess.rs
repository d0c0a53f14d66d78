//! Text normalization applied to FAQ questions and incoming questions alike.
//!
//! Lowercase, drop every character that is neither a word character nor
//! whitespace, split into tokens, remove English stop words, and join the
//! survivors with single spaces.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// English stop words (the NLTK corpus list).
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Run-together words the tokenizer splits in two ("cannot" → "can not").
const SPLIT_CONTRACTIONS: &[(&str, &str, &str)] = &[
    ("cannot", "can", "not"),
    ("gimme", "gim", "me"),
    ("gonna", "gon", "na"),
    ("gotta", "got", "ta"),
    ("lemme", "lem", "me"),
    ("wanna", "wan", "na"),
];

/// Check if a lowercase token is an English stop word.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Split punctuation-free, lowercased text into tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        match SPLIT_CONTRACTIONS.iter().find(|(whole, _, _)| *whole == word) {
            Some((_, head, tail)) => {
                tokens.push(*head);
                tokens.push(*tail);
            }
            None => tokens.push(word),
        }
    }
    tokens
}

/// Normalize raw text into a canonical token string.
///
/// Pure and infallible. Empty input, or input made only of stop words and
/// punctuation, yields an empty string. Applying it twice gives the same
/// result as applying it once.
///
/// # Example
/// ```
/// use helpdesk_faq::preprocess;
///
/// assert_eq!(preprocess("What are your business hours?"), "business hours");
/// assert_eq!(preprocess("...and the?"), "");
/// ```
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");

    tokenize(&stripped)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .collect::<Vec<_>>()
        .join(" ")
}
