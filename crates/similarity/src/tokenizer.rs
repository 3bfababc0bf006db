//! Text analysis: tokenization, stop-word removal, n-gram generation.
//!
//! A token is a run of two or more word characters (alphanumeric or `_`).
//! Single characters and punctuation are dropped, so "Sci-Fi" yields
//! `sci` and `fi`. Stop-words are removed before n-grams are formed, which
//! means a bigram can join two words that had a stop-word between them.

use crate::stopwords::StopWords;

/// Turns raw signature text into vocabulary terms.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: StopWords,
    /// Inclusive (min_n, max_n)
    ngram_range: (usize, usize),
}

impl Analyzer {
    /// Create an analyzer; n-gram bounds are clamped to at least 1 and
    /// `max_n` is raised to `min_n` if needed.
    pub fn new(stop_words: StopWords, ngram_range: (usize, usize)) -> Self {
        let min_n = ngram_range.0.max(1);
        let max_n = ngram_range.1.max(min_n);
        Self {
            stop_words,
            ngram_range: (min_n, max_n),
        }
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Lower-cased tokens with stop-words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !is_word_char(c))
            .filter(|w| w.chars().count() >= 2)
            .filter(|w| !self.stop_words.contains(w))
            .map(str::to_string)
            .collect()
    }

    /// All terms of the document: every n-gram in the configured range,
    /// space-joined, in document order
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }
        terms
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(StopWords::english(), (1, 2))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
