//! End-to-end checks of the matching pipeline on the built-in corpus.
