//
// text.rs
// plagscan
//
// Tokenization with byte offsets into the raw text, stop-word filtering
// and n-gram windows.
//
use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// A normalized word together with the byte range it came from in the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Splits raw text into lowercased words, dropping stop words but keeping
/// the original byte offsets of every word that survives.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn english() -> Self {
        Self::with_stop_words(get(LANGUAGE::English).iter().map(|w| w.to_string()))
    }

    pub fn without_stop_words() -> Self {
        Self::default()
    }

    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Words are maximal runs of alphanumeric characters; punctuation,
    /// underscores and whitespace all separate words.
    pub fn tokenize(&self, raw: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word_start: Option<usize> = None;

        for (idx, ch) in raw.char_indices() {
            match (ch.is_alphanumeric(), word_start) {
                (true, None) => word_start = Some(idx),
                (false, Some(start)) => {
                    self.push_word(raw, start, idx, &mut tokens);
                    word_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = word_start {
            self.push_word(raw, start, raw.len(), &mut tokens);
        }

        tokens
    }

    pub fn words(&self, raw: &str) -> Vec<String> {
        self.tokenize(raw).into_iter().map(|t| t.text).collect()
    }

    fn push_word(&self, raw: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
        let text = raw[start..end].to_lowercase();
        if !self.is_stop_word(&text) {
            tokens.push(Token { text, start, end });
        }
    }
}

/// Contiguous windows of `n` items. Yields nothing when `n` is zero or
/// larger than the input.
pub fn ngrams<T>(tokens: &[T], n: usize) -> impl Iterator<Item = &[T]> {
    let usable = if n == 0 { &tokens[..0] } else { tokens };
    usable.windows(n.max(1))
}
